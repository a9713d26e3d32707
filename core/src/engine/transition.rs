use std::fmt;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::TransitionError;
use crate::model::{Task, TransitionRequest};
use crate::repository::TaskRepository;

use super::types::{TransitionIntent, TransitionSnapshot};
use super::{lock_state, EngineState, TransitionEngine};

impl TransitionEngine {
    /// Synchronous half of a move: guard, snapshot, optimistic apply.
    ///
    /// On return the cache already reflects the intent's target status
    /// and position, and any in-flight detail read for the task has been
    /// superseded. No I/O has happened yet; the caller drives the remote
    /// call by settling the returned handle.
    ///
    /// Re-submitting the intent that last settled successfully returns an
    /// already-settled handle without touching the cache or the network.
    pub fn begin_transition(
        &self,
        intent: TransitionIntent,
    ) -> Result<PendingTransition, TransitionError> {
        let task = self
            .cache
            .task(&intent.task_id)
            .ok_or(TransitionError::InvalidTarget)?;
        if task.is_blocked {
            tracing::debug!(
                target: "taskboard.engine",
                task_id = %intent.task_id,
                "transition rejected: task is blocked"
            );
            return Err(TransitionError::Blocked(intent.task_id));
        }

        let correlation = Uuid::new_v4();
        let (snapshot, seq) = {
            let mut state = self.state();
            if state.last_applied.get(&intent.task_id) == Some(&intent) {
                tracing::debug!(
                    target: "taskboard.engine",
                    correlation = %correlation,
                    task_id = %intent.task_id,
                    "intent already applied, skipping"
                );
                return Ok(PendingTransition {
                    inner: Inner::Settled(task),
                });
            }
            let seq = state.task_seq.entry(intent.task_id.clone()).or_insert(0);
            *seq += 1;
            (
                TransitionSnapshot {
                    status: task.status,
                    position: task.position,
                },
                *seq,
            )
        };

        self.cache.update_task(&intent.task_id, &mut |t| {
            t.status = intent.to_status;
            t.position = intent.to_position;
        });
        self.cache.cancel_in_flight(&intent.task_id);

        tracing::debug!(
            target: "taskboard.engine",
            correlation = %correlation,
            task_id = %intent.task_id,
            from = %intent.from_status,
            to = %intent.to_status,
            position = intent.to_position,
            seq,
            "optimistic transition applied"
        );

        Ok(PendingTransition {
            inner: Inner::InFlight {
                cache: Arc::clone(&self.cache),
                repo: Arc::clone(&self.repo),
                state: Arc::clone(&self.state),
                intent,
                snapshot,
                seq,
                correlation,
            },
        })
    }
}

enum Inner {
    /// Nothing left to do; resolves to the cached task.
    Settled(Task),
    InFlight {
        cache: Arc<dyn CacheStore>,
        repo: Arc<dyn TaskRepository>,
        state: Arc<Mutex<EngineState>>,
        intent: TransitionIntent,
        snapshot: TransitionSnapshot,
        seq: u64,
        correlation: Uuid,
    },
}

/// Asynchronous half of a move. Settling performs the remote call and
/// then either commits the server's authoritative task (and invalidates
/// every cached list) or restores the snapshot. A completion superseded
/// by a newer intent for the same task is discarded either way.
#[must_use = "a pending transition does nothing remotely until settled"]
pub struct PendingTransition {
    inner: Inner,
}

impl fmt::Debug for PendingTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("PendingTransition");
        match &self.inner {
            Inner::Settled(task) => out.field("settled", &task.id),
            Inner::InFlight { intent, seq, .. } => out.field("intent", intent).field("seq", seq),
        };
        out.finish_non_exhaustive()
    }
}

impl PendingTransition {
    /// The intent still in flight; `None` once there is nothing to send.
    pub fn intent(&self) -> Option<&TransitionIntent> {
        match &self.inner {
            Inner::Settled(_) => None,
            Inner::InFlight { intent, .. } => Some(intent),
        }
    }

    pub async fn settle(self) -> Result<Task, TransitionError> {
        let (cache, repo, state, intent, snapshot, seq, correlation) = match self.inner {
            Inner::Settled(task) => return Ok(task),
            Inner::InFlight {
                cache,
                repo,
                state,
                intent,
                snapshot,
                seq,
                correlation,
            } => (cache, repo, state, intent, snapshot, seq, correlation),
        };

        let request = TransitionRequest {
            to_status: intent.to_status,
            to_position: Some(intent.to_position),
        };
        let result = repo.transition_task(&intent.task_id, &request).await;

        // Completions apply in completion order, not issuance order: a
        // result for anything but the latest sequence number is dead.
        let latest = lock_state(&state)
            .task_seq
            .get(&intent.task_id)
            .copied()
            .unwrap_or(0);
        if latest != seq {
            tracing::debug!(
                target: "taskboard.engine",
                correlation = %correlation,
                task_id = %intent.task_id,
                seq,
                latest,
                "discarding superseded transition result"
            );
            return Err(TransitionError::StaleIntent);
        }

        match result {
            Ok(server_task) => {
                lock_state(&state)
                    .last_applied
                    .insert(intent.task_id.clone(), intent.clone());
                cache.put_task(server_task.clone());
                cache.invalidate_lists();
                tracing::debug!(
                    target: "taskboard.engine",
                    correlation = %correlation,
                    task_id = %server_task.id,
                    status = %server_task.status,
                    position = server_task.position,
                    "transition committed"
                );
                Ok(server_task)
            }
            Err(err) => {
                cache.update_task(&intent.task_id, &mut |t| {
                    t.status = snapshot.status;
                    t.position = snapshot.position;
                });
                tracing::warn!(
                    target: "taskboard.engine",
                    correlation = %correlation,
                    task_id = %intent.task_id,
                    error = %err,
                    "transition rejected, rolled back to snapshot"
                );
                Err(TransitionError::RemoteRejected(err.to_string()))
            }
        }
    }
}
