use clap::{Args, Parser, Subcommand};
use taskboard_core::api::TaskStatus;

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Kanban board over the taskboard API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and print the board columns
    Show(ShowArgs),
    /// Move a task to another column or slot
    Move(MoveArgs),
    /// Toggle a checklist item on a task
    Toggle(ToggleArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Only tasks in this column (TODO, IN_PROGRESS, DONE)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    /// Only late tasks
    #[arg(long)]
    pub late: bool,

    /// Only blocked tasks
    #[arg(long)]
    pub blocked: bool,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task to move
    pub task_id: String,

    /// Destination column (TODO, IN_PROGRESS, DONE)
    #[arg(value_parser = parse_status)]
    pub to_status: TaskStatus,

    /// Insert before this task instead of appending to the column
    #[arg(long)]
    pub before: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task owning the checklist item
    pub task_id: String,

    /// Checklist item to toggle
    pub item_id: String,
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(&value.to_uppercase())
        .ok_or_else(|| format!("unknown status '{value}', expected TODO, IN_PROGRESS or DONE"))
}
