use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset};

use taskdeck_core::{
    ApiClient, Category, CompletionToggle, LoadPhase, NewTask, Sidebar, TaskScope, TaskStore,
};

use crate::cli::{AddArgs, CliCommand, DeleteArgs};
use crate::render;

/// Runs one command against the backend, writing its report to `writer`.
/// `now` is the reference time for category views and due dates.
pub async fn execute<W: Write>(
    client: Arc<ApiClient>,
    command: CliCommand,
    now: DateTime<FixedOffset>,
    mut writer: W,
) -> Result<()> {
    match command {
        CliCommand::Tasks(args) => {
            handle_tasks(client, Category::from_key(&args.category), now, &mut writer).await
        }
        CliCommand::Project(args) => handle_project(client, args.id, now, &mut writer).await,
        CliCommand::Sidebar => {
            let sidebar = Sidebar::load(&client)
                .await
                .context("failed to load areas and projects")?;
            write!(writer, "{}", render::sidebar(&sidebar))?;
            Ok(())
        }
        CliCommand::Add(args) => handle_add(&client, args, &mut writer).await,
        CliCommand::Complete(arg) => handle_completion(&client, arg.id, true, &mut writer).await,
        CliCommand::Reopen(arg) => handle_completion(&client, arg.id, false, &mut writer).await,
        CliCommand::Delete(args) => handle_delete(client, &args, &mut writer).await,
        CliCommand::Subtasks(arg) => {
            let items = client
                .list_subtasks(arg.id)
                .await
                .with_context(|| format!("failed to load subtasks of task {}", arg.id))?;
            write!(writer, "{}", render::subtasks(arg.id, &items))?;
            Ok(())
        }
    }
}

async fn load_store(client: Arc<ApiClient>, scope: TaskScope) -> Result<TaskStore> {
    let mut store = TaskStore::new(client, scope);
    store.refresh().await;
    if store.phase() == LoadPhase::Failed {
        return Err(anyhow!(
            "failed to load tasks: {}",
            store.error().unwrap_or("unknown error")
        ));
    }
    Ok(store)
}

async fn handle_tasks<W: Write>(
    client: Arc<ApiClient>,
    category: Category,
    now: DateTime<FixedOffset>,
    mut writer: W,
) -> Result<()> {
    let store = load_store(client, TaskScope::All).await?;
    let tasks = store.filtered(category, now);
    write!(
        writer,
        "{}",
        render::category_view(category, &tasks, now.offset())
    )?;
    Ok(())
}

async fn handle_project<W: Write>(
    client: Arc<ApiClient>,
    id: i64,
    now: DateTime<FixedOffset>,
    mut writer: W,
) -> Result<()> {
    // Only the full listing carries `completion`.
    let listed = client
        .list_projects()
        .await
        .context("failed to load projects")?
        .into_iter()
        .find(|project| project.id == id);
    let project = match listed {
        Some(project) => project,
        None => client
            .get_project(id)
            .await
            .with_context(|| format!("project {id} not found"))?,
    };

    let store = load_store(client, TaskScope::Project(id)).await?;
    let tasks = store.filtered(Category::All, now);
    write!(
        writer,
        "{}",
        render::task_list(&render::project_header(&project), &tasks, now.offset())
    )?;
    Ok(())
}

async fn handle_add<W: Write>(client: &ApiClient, args: AddArgs, mut writer: W) -> Result<()> {
    let task = NewTask::from(args);
    if task.title.trim().is_empty() {
        return Err(anyhow!("task title cannot be empty"));
    }
    let reply = client
        .create_task(&task)
        .await
        .context("failed to create task")?;
    writeln!(
        writer,
        "{}",
        reply.message.as_deref().unwrap_or("Task created")
    )?;
    Ok(())
}

async fn handle_completion<W: Write>(
    client: &ApiClient,
    id: i64,
    completed: bool,
    mut writer: W,
) -> Result<()> {
    let task = client
        .get_task(id)
        .await
        .with_context(|| format!("task {id} not found"))?;
    let state = if completed {
        "completed"
    } else {
        "not completed"
    };
    if task.completed == completed {
        writeln!(writer, "Task #{id} is already {state}")?;
        return Ok(());
    }

    let mut toggle = CompletionToggle::new(&task);
    toggle
        .toggle(client)
        .await
        .with_context(|| format!("failed to mark task {id} as {state}"))?;
    writeln!(writer, "Marked #{} {} as {state}", id, task.title)?;
    Ok(())
}

async fn handle_delete<W: Write>(
    client: Arc<ApiClient>,
    args: &DeleteArgs,
    mut writer: W,
) -> Result<()> {
    let mut store = TaskStore::new(client, TaskScope::All);
    let mut summary = DeleteSummary::default();
    for &id in &args.ids {
        if store.delete_task(id).await {
            summary.deleted += 1;
        } else {
            let reason = store.error().unwrap_or("unknown error").to_string();
            summary.failed.push((id, reason));
        }
    }
    summary.write_to(&mut writer)?;
    Ok(())
}

#[derive(Default)]
struct DeleteSummary {
    deleted: usize,
    failed: Vec<(i64, String)>,
}

impl DeleteSummary {
    fn headline(&self) -> String {
        match self.deleted {
            0 => "No tasks deleted".to_string(),
            1 => "Deleted 1 task".to_string(),
            count => format!("Deleted {count} tasks"),
        }
    }

    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", self.headline())?;
        for (id, reason) in &self.failed {
            writeln!(writer, "Failed to delete #{id}: {reason}")?;
        }
        Ok(())
    }
}
