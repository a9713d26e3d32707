//! Lifecycle of one drag gesture: `Idle -> Dragging -> settled -> Idle`.
//!
//! The session only reads board state. It resolves drop targets into a
//! [`TransitionIntent`] and leaves every cache mutation to the optimistic
//! transition engine; gesture recognition itself lives in whatever UI
//! adapter translates pointer events into these calls.

use crate::engine::TransitionIntent;
use crate::model::{TaskId, TaskStatus};
use crate::projection::BoardColumns;

/// Candidate drop location: a whole column (append at the end) or an
/// existing task (insert before it, in its column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(TaskStatus),
    Task(TaskId),
}

/// What a drop resolved to. `NoOp` and `Cancelled` both end the gesture
/// without emitting an intent, so no redundant network call is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Intent(TransitionIntent),
    NoOp,
    Cancelled,
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Idle,
    Dragging {
        task_id: TaskId,
        origin: (TaskStatus, usize),
        hover: Option<DropTarget>,
    },
}

/// Drag session controller. One gesture at a time; every terminal call
/// (`drop_on`, `cancel`) returns the session to `Idle`.
#[derive(Debug, Default)]
pub struct DragSession {
    state: SessionState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    pub fn active_task(&self) -> Option<&TaskId> {
        match &self.state {
            SessionState::Dragging { task_id, .. } => Some(task_id),
            SessionState::Idle => None,
        }
    }

    /// Current advisory hover target, for rendering only.
    pub fn hover(&self) -> Option<&DropTarget> {
        match &self.state {
            SessionState::Dragging { hover, .. } => hover.as_ref(),
            SessionState::Idle => None,
        }
    }

    /// Starts a gesture, capturing the task's current column and index as
    /// the origin. Stays `Idle` when the id is not on the board.
    pub fn begin_drag(&mut self, task_id: &TaskId, columns: &BoardColumns) -> bool {
        let Some(origin) = columns.locate(task_id) else {
            tracing::debug!(
                target: "taskboard.drag",
                task_id = %task_id,
                "begin_drag ignored: task not on board"
            );
            return false;
        };
        self.state = SessionState::Dragging {
            task_id: task_id.clone(),
            origin,
            hover: None,
        };
        true
    }

    /// Records the candidate target under the pointer. No task state is
    /// touched; ignored while idle.
    pub fn update_hover(&mut self, target: DropTarget) {
        if let SessionState::Dragging { hover, .. } = &mut self.state {
            *hover = Some(target);
        }
    }

    /// Aborts the gesture. Nothing is emitted.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Ends the gesture, resolving `target` against the given columns.
    ///
    /// A column target appends (index = column length); a task target
    /// inserts before that task in its own column; no target, an unknown
    /// target, or an idle session cancels. A target that resolves to the
    /// recorded origin is a no-op.
    pub fn drop_on(&mut self, target: Option<DropTarget>, columns: &BoardColumns) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let SessionState::Dragging {
            task_id, origin, ..
        } = state
        else {
            return DropOutcome::Cancelled;
        };

        let resolved = match target {
            Some(DropTarget::Column(status)) => (status, columns.column(status).len()),
            Some(DropTarget::Task(over_id)) => match columns.locate(&over_id) {
                Some(slot) => slot,
                None => {
                    tracing::debug!(
                        target: "taskboard.drag",
                        task_id = %task_id,
                        over = %over_id,
                        "drop cancelled: target task not on board"
                    );
                    return DropOutcome::Cancelled;
                }
            },
            None => return DropOutcome::Cancelled,
        };

        if resolved == origin {
            tracing::debug!(
                target: "taskboard.drag",
                task_id = %task_id,
                "drop is a no-op, suppressing intent"
            );
            return DropOutcome::NoOp;
        }

        DropOutcome::Intent(TransitionIntent {
            task_id,
            from_status: origin.0,
            to_status: resolved.0,
            to_position: resolved.1 as u32,
        })
    }
}
