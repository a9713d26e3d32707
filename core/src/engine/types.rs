use chrono::{DateTime, Utc};

use crate::model::{TaskId, TaskStatus};

/// A proposed, not-yet-committed move produced by the drag session
/// controller. Created at drop, consumed synchronously by
/// [`TransitionEngine::begin_transition`], then discarded.
///
/// [`TransitionEngine::begin_transition`]: super::TransitionEngine::begin_transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionIntent {
    pub task_id: TaskId,
    pub from_status: TaskStatus,
    pub to_status: TaskStatus,
    pub to_position: u32,
}

/// Rollback target for one in-flight move: the task's settled status and
/// position immediately before the optimistic apply. Destroyed when the
/// transition settles.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransitionSnapshot {
    pub(crate) status: TaskStatus,
    pub(crate) position: u32,
}

/// Rollback target for one in-flight checklist toggle, scoped to a
/// single item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChecklistSnapshot {
    pub(crate) is_completed: bool,
    pub(crate) completed_at: Option<DateTime<Utc>>,
}
