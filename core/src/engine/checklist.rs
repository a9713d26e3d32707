use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::TransitionError;
use crate::model::{ChecklistItem, ChecklistItemId, TaskId};
use crate::repository::TaskRepository;

use super::types::ChecklistSnapshot;
use super::{lock_state, EngineState, TransitionEngine};

impl TransitionEngine {
    /// Synchronous half of a checklist toggle: snapshot the item, flip it
    /// optimistically, supersede in-flight detail reads.
    ///
    /// The optimistic write mutates only the addressed item through the
    /// cache's atomic update, so toggles on sibling items in flight at
    /// the same time never clobber each other.
    pub fn begin_toggle(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> Result<PendingToggle, TransitionError> {
        let task = self
            .cache
            .task(task_id)
            .ok_or(TransitionError::InvalidTarget)?;
        let item = task
            .checklist_item(item_id)
            .ok_or(TransitionError::InvalidTarget)?;

        let snapshot = ChecklistSnapshot {
            is_completed: item.is_completed,
            completed_at: item.completed_at,
        };
        let correlation = Uuid::new_v4();
        let seq = {
            let mut state = self.state();
            let seq = state
                .item_seq
                .entry((task_id.clone(), item_id.clone()))
                .or_insert(0);
            *seq += 1;
            *seq
        };

        self.cache.update_task(task_id, &mut |t| {
            if let Some(entry) = t.checklist_items.iter_mut().find(|i| &i.id == item_id) {
                entry.is_completed = !snapshot.is_completed;
                entry.completed_at = if entry.is_completed {
                    Some(Utc::now())
                } else {
                    None
                };
            }
        });
        self.cache.cancel_in_flight(task_id);

        tracing::debug!(
            target: "taskboard.engine",
            correlation = %correlation,
            task_id = %task_id,
            item_id = %item_id,
            is_completed = !snapshot.is_completed,
            seq,
            "optimistic checklist toggle applied"
        );

        Ok(PendingToggle {
            cache: Arc::clone(&self.cache),
            repo: Arc::clone(&self.repo),
            state: Arc::clone(&self.state),
            task_id: task_id.clone(),
            item_id: item_id.clone(),
            snapshot,
            seq,
            correlation,
        })
    }
}

/// Asynchronous half of a checklist toggle: the remote call, then commit
/// of the server's item or rollback of exactly that item.
#[must_use = "a pending toggle does nothing remotely until settled"]
pub struct PendingToggle {
    cache: Arc<dyn CacheStore>,
    repo: Arc<dyn TaskRepository>,
    state: Arc<Mutex<EngineState>>,
    task_id: TaskId,
    item_id: ChecklistItemId,
    snapshot: ChecklistSnapshot,
    seq: u64,
    correlation: Uuid,
}

impl fmt::Debug for PendingToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingToggle")
            .field("task_id", &self.task_id)
            .field("item_id", &self.item_id)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl PendingToggle {
    pub async fn settle(self) -> Result<ChecklistItem, TransitionError> {
        let result = self
            .repo
            .toggle_checklist_item(&self.task_id, &self.item_id)
            .await;

        let key = (self.task_id.clone(), self.item_id.clone());
        let latest = lock_state(&self.state)
            .item_seq
            .get(&key)
            .copied()
            .unwrap_or(0);
        if latest != self.seq {
            tracing::debug!(
                target: "taskboard.engine",
                correlation = %self.correlation,
                task_id = %self.task_id,
                item_id = %self.item_id,
                seq = self.seq,
                latest,
                "discarding superseded toggle result"
            );
            return Err(TransitionError::StaleIntent);
        }

        match result {
            Ok(server_item) => {
                self.cache.update_task(&self.task_id, &mut |t| {
                    if let Some(entry) =
                        t.checklist_items.iter_mut().find(|i| i.id == self.item_id)
                    {
                        *entry = server_item.clone();
                    }
                });
                tracing::debug!(
                    target: "taskboard.engine",
                    correlation = %self.correlation,
                    task_id = %self.task_id,
                    item_id = %server_item.id,
                    is_completed = server_item.is_completed,
                    "checklist toggle committed"
                );
                Ok(server_item)
            }
            Err(err) => {
                let snapshot = self.snapshot;
                self.cache.update_task(&self.task_id, &mut |t| {
                    if let Some(entry) =
                        t.checklist_items.iter_mut().find(|i| i.id == self.item_id)
                    {
                        entry.is_completed = snapshot.is_completed;
                        entry.completed_at = snapshot.completed_at;
                    }
                });
                tracing::warn!(
                    target: "taskboard.engine",
                    correlation = %self.correlation,
                    task_id = %self.task_id,
                    item_id = %self.item_id,
                    error = %err,
                    "checklist toggle rejected, rolled back item"
                );
                Err(TransitionError::RemoteRejected(err.to_string()))
            }
        }
    }
}
