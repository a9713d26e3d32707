use thiserror::Error;

use crate::model::TaskId;

/// Failure modes of a single board mutation. None of these are fatal;
/// the board stays usable after any of them.
#[derive(Error, Debug)]
pub enum TransitionError {
    /// The task is flagged as blocked; its status and position must not
    /// change until it is unblocked. Rejected before any cache mutation.
    #[error("task {0} is blocked and cannot be moved")]
    Blocked(TaskId),
    /// The remote call was rejected or timed out. The optimistic value
    /// has already been rolled back by the time this is surfaced.
    #[error("remote transition rejected: {0}")]
    RemoteRejected(String),
    /// A newer mutation for the same task (or checklist item) was issued
    /// while this one was in flight; the stale result was discarded.
    #[error("transition superseded by a newer intent")]
    StaleIntent,
    /// The mutation did not resolve to a known task, column, or item.
    #[error("target did not resolve to a known task or column")]
    InvalidTarget,
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("transition failed: {0}")]
    Transition(#[from] TransitionError),
    #[error("repository error: {0}")]
    Repository(#[from] anyhow::Error),
}
