//! Board facade: the reactive surface consumed by UI adapters.
//!
//! Owns the cache, the transition engine, and one drag session, and
//! wires them together the way a `use_board` hook would: load populates
//! the cache, `columns` projects whatever the cache currently holds
//! (optimistic values included), and every mutation goes through the
//! engine's pending handles.

use std::sync::Arc;

use crate::cache::{CacheStore, MemoryCache};
use crate::drag::{DragSession, DropOutcome, DropTarget};
use crate::engine::{PendingToggle, PendingTransition, TransitionEngine};
use crate::error::{BoardError, TransitionError};
use crate::model::{ChecklistItemId, Task, TaskFilters, TaskId};
use crate::projection::{project, BoardColumns};
use crate::repository::TaskRepository;

/// Outcome of a list load, including decode diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped: usize,
}

struct CurrentList {
    filters: TaskFilters,
    fingerprint: String,
    ids: Vec<TaskId>,
}

pub struct Board {
    cache: Arc<dyn CacheStore>,
    repo: Arc<dyn TaskRepository>,
    engine: TransitionEngine,
    session: DragSession,
    current: Option<CurrentList>,
}

impl Board {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self::with_cache(repo, Arc::new(MemoryCache::new()))
    }

    pub fn with_cache(repo: Arc<dyn TaskRepository>, cache: Arc<dyn CacheStore>) -> Self {
        let engine = TransitionEngine::new(Arc::clone(&cache), Arc::clone(&repo));
        Self {
            cache,
            repo,
            engine,
            session: DragSession::new(),
            current: None,
        }
    }

    /// Fetches the filtered task list and makes it the board's current
    /// view. Malformed records are dropped upstream and counted here.
    pub async fn load(&mut self, filters: &TaskFilters) -> Result<LoadReport, BoardError> {
        let records = self
            .repo
            .list_tasks(filters)
            .await
            .map_err(BoardError::Repository)?;

        let fingerprint = filters.fingerprint();
        let ids: Vec<TaskId> = records.tasks.iter().map(|t| t.id.clone()).collect();
        for task in records.tasks.iter() {
            self.cache.put_task(task.clone());
        }
        self.cache.put_list(&fingerprint, ids.clone());

        let report = LoadReport {
            loaded: records.tasks.len(),
            dropped: records.dropped.len(),
        };
        tracing::debug!(
            target: "taskboard.board",
            fingerprint = %fingerprint,
            loaded = report.loaded,
            dropped = report.dropped,
            "board loaded"
        );
        self.current = Some(CurrentList {
            filters: filters.clone(),
            fingerprint,
            ids,
        });
        Ok(report)
    }

    /// Re-fetches the current filters. No-op when nothing was loaded.
    pub async fn refresh(&mut self) -> Result<Option<LoadReport>, BoardError> {
        match &self.current {
            Some(current) => {
                let filters = current.filters.clone();
                self.load(&filters).await.map(Some)
            }
            None => Ok(None),
        }
    }

    /// Projects the current view from cache. Reflects optimistic values
    /// the moment a drop returns, before the remote call settles.
    pub fn columns(&self) -> BoardColumns {
        let Some(current) = &self.current else {
            return BoardColumns::default();
        };
        let tasks: Vec<Task> = current
            .ids
            .iter()
            .filter_map(|id| self.cache.task(id))
            .collect();
        project(&tasks)
    }

    /// True once a committed transition invalidated the cached list; the
    /// next `refresh` picks up server-side ordering and compaction.
    pub fn is_stale(&self) -> bool {
        match &self.current {
            Some(current) => self.cache.list(&current.fingerprint).is_none(),
            None => false,
        }
    }

    pub fn begin_drag(&mut self, task_id: &TaskId) -> bool {
        let columns = self.columns();
        self.session.begin_drag(task_id, &columns)
    }

    pub fn update_hover(&mut self, target: DropTarget) {
        self.session.update_hover(target);
    }

    pub fn hover(&self) -> Option<&DropTarget> {
        self.session.hover()
    }

    pub fn cancel_drag(&mut self) {
        self.session.cancel();
    }

    /// Ends the active drag. `Ok(None)` means nothing was emitted (no-op
    /// drop or cancellation); `Ok(Some(..))` carries the pending remote
    /// settle, with the optimistic move already visible in `columns`.
    pub fn drop_on(
        &mut self,
        target: Option<DropTarget>,
    ) -> Result<Option<PendingTransition>, TransitionError> {
        let columns = self.columns();
        match self.session.drop_on(target, &columns) {
            DropOutcome::Intent(intent) => self.engine.begin_transition(intent).map(Some),
            DropOutcome::NoOp | DropOutcome::Cancelled => Ok(None),
        }
    }

    pub fn toggle_checklist_item(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> Result<PendingToggle, TransitionError> {
        self.engine.begin_toggle(task_id, item_id)
    }

    /// Epoch-guarded detail read. Returns `Ok(None)` when the response
    /// was superseded by an optimistic mutation while in flight and was
    /// therefore discarded.
    pub async fn fetch_task(&self, id: &TaskId) -> Result<Option<Task>, BoardError> {
        let epoch = self.cache.fetch_epoch(id);
        let task = self
            .repo
            .get_task(id)
            .await
            .map_err(BoardError::Repository)?;
        if self.cache.commit_fetch(task.clone(), epoch) {
            Ok(Some(task))
        } else {
            Ok(None)
        }
    }

    /// Cached copy of a task, optimistic values included.
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.cache.task(id)
    }
}
