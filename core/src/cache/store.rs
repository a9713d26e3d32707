use crate::model::{Task, TaskId};

/// Injected client-side cache port.
///
/// The cache is the single shared mutable resource of the board core.
/// Task bodies live once under their id; list entries hold ids only and
/// are keyed by filter fingerprint. All mutation is synchronous, so the
/// `update_task` read-mutate-write is the engine's transaction primitive:
/// two interleaved mutations of different fields (say, two checklist
/// items) can never clobber each other through a stale whole-task copy.
///
/// In-flight detail reads are superseded with fetch epochs: a reader
/// captures `fetch_epoch` when it issues the request and commits through
/// `commit_fetch`; any `cancel_in_flight` in between makes the commit a
/// discarded no-op.
pub trait CacheStore: Send + Sync {
    /// Point read; returns a detached copy.
    fn task(&self, id: &TaskId) -> Option<Task>;

    /// Point write; replaces the cached body wholesale.
    fn put_task(&self, task: Task);

    /// Atomic read-mutate-write under the store's lock. Returns false if
    /// the task is not cached (nothing ran).
    fn update_task(&self, id: &TaskId, apply: &mut dyn FnMut(&mut Task)) -> bool;

    /// Cached list of task ids for a filter fingerprint.
    fn list(&self, fingerprint: &str) -> Option<Vec<TaskId>>;

    fn put_list(&self, fingerprint: &str, ids: Vec<TaskId>);

    /// Drops every cached list. Any fingerprint could include a task
    /// whose server-confirmed ordering just changed.
    fn invalidate_lists(&self);

    /// Epoch a detail read must present to `commit_fetch`.
    fn fetch_epoch(&self, id: &TaskId) -> u64;

    /// Supersedes every detail read currently in flight for this task.
    /// Returns the new epoch.
    fn cancel_in_flight(&self, id: &TaskId) -> u64;

    /// Commits a completed detail read unless it was superseded.
    /// Returns whether the write happened.
    fn commit_fetch(&self, task: Task, epoch: u64) -> bool;
}
