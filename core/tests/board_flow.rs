mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::{task, ScriptedRepository};
use taskboard_core::api::{
    Board, CacheStore, DropTarget, MemoryCache, TaskFilters, TaskId, TaskStatus,
};

#[tokio::test]
async fn load_reports_dropped_records() {
    let repo = Arc::new(ScriptedRepository::with_dropped(
        vec![task("a", TaskStatus::Todo, 0)],
        vec!["bad-1", "bad-2"],
    ));
    let mut board = Board::new(repo);

    let report = board.load(&TaskFilters::default()).await.expect("load");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.dropped, 2);
    assert_eq!(board.columns().total(), 1);
}

#[tokio::test]
async fn refresh_clears_staleness_after_a_commit() {
    let repo = Arc::new(ScriptedRepository::new(vec![
        task("a", TaskStatus::Todo, 0),
        task("b", TaskStatus::InProgress, 0),
    ]));
    let mut board = Board::new(repo.clone());
    board.load(&TaskFilters::default()).await.expect("load");
    assert!(!board.is_stale());

    board.begin_drag(&TaskId::new("a"));
    let pending = board
        .drop_on(Some(DropTarget::Column(TaskStatus::Done)))
        .expect("drop resolves")
        .expect("intent emitted");
    pending.settle().await.expect("commit");
    assert!(board.is_stale());

    board.refresh().await.expect("refresh");
    assert!(!board.is_stale());

    // The refreshed view matches the server's copy.
    let columns = board.columns();
    assert_eq!(columns.done.len(), 1);
    assert_eq!(columns.done[0].id.as_str(), "a");
}

#[tokio::test]
async fn cancelled_drag_emits_nothing() {
    let repo = Arc::new(ScriptedRepository::new(vec![task(
        "a",
        TaskStatus::Todo,
        0,
    )]));
    let mut board = Board::new(repo.clone());
    board.load(&TaskFilters::default()).await.expect("load");

    board.begin_drag(&TaskId::new("a"));
    board.update_hover(DropTarget::Column(TaskStatus::Done));
    assert_eq!(board.hover(), Some(&DropTarget::Column(TaskStatus::Done)));
    board.cancel_drag();

    // A drop after cancellation resolves to nothing.
    let outcome = board.drop_on(Some(DropTarget::Column(TaskStatus::Done)));
    assert!(matches!(outcome, Ok(None)));
    assert_eq!(repo.move_calls(), 0);
    assert_eq!(board.columns().todo.len(), 1);
}

#[tokio::test]
async fn begin_drag_on_unknown_task_is_silent() {
    let repo = Arc::new(ScriptedRepository::new(vec![task(
        "a",
        TaskStatus::Todo,
        0,
    )]));
    let mut board = Board::new(repo);
    board.load(&TaskFilters::default()).await.expect("load");

    assert!(!board.begin_drag(&TaskId::new("ghost")));
    let outcome = board.drop_on(Some(DropTarget::Column(TaskStatus::Done)));
    assert!(matches!(outcome, Ok(None)));
}

#[tokio::test]
async fn fetch_task_commits_when_not_superseded() {
    let repo = Arc::new(ScriptedRepository::new(vec![task(
        "a",
        TaskStatus::Todo,
        0,
    )]));
    let mut board = Board::new(repo);
    board.load(&TaskFilters::default()).await.expect("load");

    let fetched = board
        .fetch_task(&TaskId::new("a"))
        .await
        .expect("fetch")
        .expect("committed");
    assert_eq!(fetched.id.as_str(), "a");
}

#[tokio::test]
async fn optimistic_move_supersedes_in_flight_detail_read() {
    let repo = Arc::new(ScriptedRepository::new(vec![task(
        "a",
        TaskStatus::Todo,
        0,
    )]));
    let cache: Arc<MemoryCache> = Arc::new(MemoryCache::new());
    let mut board = Board::with_cache(repo, cache.clone());
    board.load(&TaskFilters::default()).await.expect("load");

    // A detail read issued before the drop carries this epoch.
    let epoch = cache.fetch_epoch(&TaskId::new("a"));

    board.begin_drag(&TaskId::new("a"));
    let pending = board
        .drop_on(Some(DropTarget::Column(TaskStatus::InProgress)))
        .expect("drop resolves")
        .expect("intent emitted");

    // The stale read completes after the optimistic apply; its commit is
    // refused so it cannot overwrite the optimistic value.
    let stale = task("a", TaskStatus::Todo, 0);
    assert!(!cache.commit_fetch(stale, epoch));
    assert_eq!(
        board.task(&TaskId::new("a")).expect("cached").status,
        TaskStatus::InProgress
    );

    pending.settle().await.expect("commit");
}

#[tokio::test]
async fn empty_board_projects_three_empty_columns() {
    let repo = Arc::new(ScriptedRepository::new(Vec::new()));
    let board = Board::new(repo);

    // Nothing loaded yet: still three (empty) columns, not an error.
    let columns = board.columns();
    for status in TaskStatus::ALL {
        assert!(columns.column(status).is_empty());
    }
    assert!(!board.is_stale());
}
