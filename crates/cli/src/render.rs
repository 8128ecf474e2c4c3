use chrono::FixedOffset;

use taskdeck_core::{Category, Project, Sidebar, Subtask, Task, DEFAULT_PRIORITY};

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn join_prefixed(values: &[&str], prefix: &str) -> String {
    values
        .iter()
        .map(|v| format!("{}{}", prefix, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `[x] #12 Title (due 2026-10-15, High) #tag`
pub fn task_line(task: &Task, offset: &FixedOffset) -> String {
    let mut line = format!("{} #{} {}", checkbox(task.completed), task.id, task.title);

    let mut details = Vec::new();
    if let Some(raw) = task.due_date.as_deref() {
        let due = task
            .due_at(offset)
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.to_string());
        details.push(format!("due {due}"));
    }
    if task.priority != DEFAULT_PRIORITY {
        details.push(task.priority.clone());
    }
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }

    let tags = task.tag_list();
    if !tags.is_empty() {
        line.push(' ');
        line.push_str(&join_prefixed(&tags, "#"));
    }
    line
}

pub fn task_list(heading: &str, tasks: &[&Task], offset: &FixedOffset) -> String {
    let mut out = format!("{heading} ({})\n", tasks.len());
    if tasks.is_empty() {
        out.push_str("  No tasks\n");
        return out;
    }
    for task in tasks {
        out.push_str("  ");
        out.push_str(&task_line(task, offset));
        out.push('\n');
    }
    out
}

pub fn category_view(category: Category, tasks: &[&Task], offset: &FixedOffset) -> String {
    task_list(category.title(), tasks, offset)
}

pub fn project_header(project: &Project) -> String {
    format!("{} ({:.0}% complete)", project.name, project.completion)
}

pub fn sidebar(sidebar: &Sidebar) -> String {
    let mut out = String::new();
    for category in &sidebar.categories {
        out.push_str(&format!("{}\n", category.title()));
    }

    if !sidebar.standalone.is_empty() {
        out.push_str("\nProjects\n");
        for project in &sidebar.standalone {
            out.push_str(&format!("  #{} {}\n", project.id, project_header(project)));
        }
    }

    for group in &sidebar.areas {
        out.push_str(&format!("\n{}\n", group.area.name));
        if group.projects.is_empty() {
            out.push_str("  No projects\n");
        }
        for project in &group.projects {
            out.push_str(&format!("  #{} {}\n", project.id, project_header(project)));
        }
    }
    out
}

pub fn subtasks(task_id: i64, subtasks: &[Subtask]) -> String {
    let mut out = format!("Subtasks of #{task_id} ({})\n", subtasks.len());
    if subtasks.is_empty() {
        out.push_str("  No subtasks\n");
    }
    for subtask in subtasks {
        out.push_str(&format!(
            "  {} #{} {}\n",
            checkbox(subtask.completed),
            subtask.id,
            subtask.title
        ));
    }
    out
}
