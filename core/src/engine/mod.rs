//! Optimistic transition engine.
//!
//! Every board mutation runs the same protocol: guard, snapshot,
//! optimistic cache apply, remote call, then commit the server's
//! authoritative record or roll back exactly one snapshot. The
//! synchronous half lives in `begin_*` (so a projection taken right
//! after already reflects the change); the asynchronous half is the
//! returned pending handle's `settle`.

pub mod checklist;
pub mod transition;
pub mod types;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::CacheStore;
use crate::model::{ChecklistItemId, TaskId};
use crate::repository::TaskRepository;

pub use checklist::PendingToggle;
pub use transition::PendingTransition;
pub use types::TransitionIntent;

/// Per-task / per-item bookkeeping: sequence numbers decide which
/// in-flight completion is current, and the last successfully applied
/// intent backs the idempotence short-circuit.
#[derive(Default)]
pub(crate) struct EngineState {
    pub(crate) task_seq: HashMap<TaskId, u64>,
    pub(crate) item_seq: HashMap<(TaskId, ChecklistItemId), u64>,
    pub(crate) last_applied: HashMap<TaskId, TransitionIntent>,
}

pub(crate) fn lock_state(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The only component allowed to mutate a task's status, position, or
/// checklist fields in the cache.
#[derive(Clone)]
pub struct TransitionEngine {
    pub(crate) cache: Arc<dyn CacheStore>,
    pub(crate) repo: Arc<dyn TaskRepository>,
    pub(crate) state: Arc<Mutex<EngineState>>,
}

impl TransitionEngine {
    pub fn new(cache: Arc<dyn CacheStore>, repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            cache,
            repo,
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, EngineState> {
        lock_state(&self.state)
    }
}
