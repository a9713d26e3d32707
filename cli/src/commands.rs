use std::sync::Arc;

use anyhow::Context;
use taskboard_core::api::{
    AppConfig, Board, ChecklistItemId, DropTarget, HttpTaskRepository, Task, TaskFilters, TaskId,
    TransitionError,
};

use crate::app::{MoveArgs, ShowArgs, ToggleArgs};

async fn load_board(cfg: &AppConfig, filters: &TaskFilters) -> anyhow::Result<Board> {
    let repo = HttpTaskRepository::from_config(&cfg.api).context("building API client")?;
    let mut board = Board::new(Arc::new(repo));
    let report = board.load(filters).await.context("loading board")?;
    if report.dropped > 0 {
        tracing::warn!(
            target: "taskboard.cli",
            dropped = report.dropped,
            "dropped malformed task records"
        );
    }
    Ok(board)
}

fn print_column(label: &str, tasks: &[Task]) {
    println!("{label} ({})", tasks.len());
    for task in tasks {
        let mut flags = String::new();
        if task.is_blocked {
            flags.push_str(" [blocked]");
        }
        if task.is_late {
            flags.push_str(" [late]");
        }
        println!("  {:>3}. {} {}{}", task.position, task.id, task.title, flags);
    }
}

pub async fn show(cfg: &AppConfig, args: ShowArgs) -> anyhow::Result<()> {
    let filters = TaskFilters {
        status: args.status,
        is_late: args.late.then_some(true),
        is_blocked: args.blocked.then_some(true),
        search: args.search,
        ..TaskFilters::default()
    };
    let board = load_board(cfg, &filters).await?;
    let columns = board.columns();
    print_column("TODO", &columns.todo);
    print_column("IN_PROGRESS", &columns.in_progress);
    print_column("DONE", &columns.done);
    Ok(())
}

pub async fn move_task(cfg: &AppConfig, args: MoveArgs) -> anyhow::Result<()> {
    let mut board = load_board(cfg, &TaskFilters::default()).await?;

    let task_id = TaskId::new(args.task_id);
    if !board.begin_drag(&task_id) {
        anyhow::bail!("task {task_id} is not on the board");
    }

    let target = match args.before {
        Some(before) => DropTarget::Task(TaskId::new(before)),
        None => DropTarget::Column(args.to_status),
    };

    match board.drop_on(Some(target)) {
        Ok(Some(pending)) => match pending.settle().await {
            Ok(task) => {
                println!(
                    "moved {} to {} at position {}",
                    task.id, task.status, task.position
                );
                Ok(())
            }
            // A discarded result is not a failure; the newer change won.
            Err(TransitionError::StaleIntent) => {
                println!("superseded by a newer change to the task");
                Ok(())
            }
            Err(err) => Err(err.into()),
        },
        Ok(None) => {
            println!("nothing to do: task is already there");
            Ok(())
        }
        Err(TransitionError::Blocked(id)) => {
            anyhow::bail!("task {id} is blocked; unblock it before moving")
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn toggle(cfg: &AppConfig, args: ToggleArgs) -> anyhow::Result<()> {
    let board = load_board(cfg, &TaskFilters::default()).await?;

    let task_id = TaskId::new(args.task_id);
    let item_id = ChecklistItemId::new(args.item_id);
    let pending = board.toggle_checklist_item(&task_id, &item_id)?;
    match pending.settle().await {
        Ok(item) => {
            println!(
                "{} is now {}",
                item.id,
                if item.is_completed { "done" } else { "open" }
            );
            Ok(())
        }
        Err(TransitionError::StaleIntent) => {
            println!("superseded by a newer change to the item");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn show_config(cfg: &AppConfig) -> anyhow::Result<()> {
    // Keys stay out of the terminal.
    let mut printable = cfg.clone();
    if !printable.api.api_key.is_empty() {
        printable.api.api_key = "***".to_string();
    }
    println!("{}", toml::to_string_pretty(&printable)?);
    Ok(())
}
