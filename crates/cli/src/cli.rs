use clap::{value_parser, Args, Parser, Subcommand};

use taskdeck_core::NewTask;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdeck",
    version,
    about = "Browse and update tasks kept by a taskdeck backend.",
    after_help = "Examples:\n  taskdeck                List the inbox (same as `taskdeck tasks`)\n  taskdeck tasks upcoming\n  taskdeck project 3\n  taskdeck complete 12\n  taskdeck --api-url http://localhost:8080 sidebar"
)]
pub struct Cli {
    /// Backend origin (defaults to $TASKDECK_API_URL, then http://127.0.0.1:5000)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (defaults to $TASKDECK_TIMEOUT_SECS, else none)
    #[arg(long, value_name = "SECONDS", global = true, value_parser = value_parser!(u64))]
    pub timeout: Option<u64>,

    /// Tracing filter directive (e.g. "info", "taskdeck_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// List tasks in a view: inbox, today, upcoming, anytime, someday (default command)
    Tasks(TasksArgs),
    /// Show a project with its completion and tasks
    Project(ProjectArgs),
    /// Show categories, standalone projects and areas
    Sidebar,
    /// Create a task
    Add(AddArgs),
    /// Mark a task as completed
    Complete(TaskIdArg),
    /// Mark a completed task as not completed
    Reopen(TaskIdArg),
    /// Delete one or more tasks by id
    Delete(DeleteArgs),
    /// List the subtasks of a task
    Subtasks(TaskIdArg),
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Tasks(TasksArgs::default())
    }
}

#[derive(Args, Debug, Clone)]
pub struct TasksArgs {
    /// View to list; unknown names list every task
    #[arg(value_name = "CATEGORY", default_value = "inbox")]
    pub category: String,
}

impl Default for TasksArgs {
    fn default() -> Self {
        Self {
            category: "inbox".into(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(value_name = "ID", value_parser = value_parser!(i64))]
    pub id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct TaskIdArg {
    #[arg(value_name = "TASK_ID", value_parser = value_parser!(i64))]
    pub id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_name = "TITLE", required = true)]
    pub title: Vec<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Project id; the task lands in the inbox when omitted
    #[arg(long, value_parser = value_parser!(i64))]
    pub project: Option<i64>,

    /// Priority label (High, Medium, Low, Anytime, Someday)
    #[arg(long)]
    pub priority: Option<String>,

    /// Due date (e.g. 2026-10-24 or 2026-10-24T09:00:00)
    #[arg(long = "due", value_name = "DATE")]
    pub due_date: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more task ids to delete
    #[arg(value_name = "ID", required = true, value_parser = value_parser!(i64))]
    pub ids: Vec<i64>,
}

impl From<AddArgs> for NewTask {
    fn from(args: AddArgs) -> Self {
        NewTask {
            title: args.title.join(" "),
            description: args.description,
            priority: args.priority,
            due_date: args.due_date,
            tags: args.tags,
            project_id: args.project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_invocation_lists_inbox() {
        let cli = Cli::try_parse_from(["taskdeck"]).unwrap();
        assert!(cli.command.is_none());
        match cli.command.unwrap_or_default() {
            CliCommand::Tasks(args) => assert_eq!(args.category, "inbox"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "tasks",
            "today",
            "--api-url",
            "http://localhost:8080",
            "--timeout",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.timeout, Some(3));
    }

    #[test]
    fn add_args_build_new_task() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "add",
            "Buy",
            "milk",
            "--project",
            "4",
            "--tags",
            "errand,home",
        ])
        .unwrap();
        let Some(CliCommand::Add(args)) = cli.command else {
            panic!("expected add");
        };
        let task = NewTask::from(args);
        assert_eq!(
            task,
            NewTask {
                title: "Buy milk".into(),
                project_id: Some(4),
                tags: Some("errand,home".into()),
                ..NewTask::default()
            }
        );
    }

    #[test]
    fn delete_requires_numeric_ids() {
        assert!(Cli::try_parse_from(["taskdeck", "delete", "abc"]).is_err());
        assert!(Cli::try_parse_from(["taskdeck", "delete"]).is_err());
        let cli = Cli::try_parse_from(["taskdeck", "delete", "1", "2"]).unwrap();
        let Some(CliCommand::Delete(args)) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(args.ids, vec![1, 2]);
    }
}
