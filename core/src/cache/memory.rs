use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::model::{Task, TaskId};

use super::store::CacheStore;

const LIST_CACHE_CAPACITY: usize = 64;

/// In-memory [`CacheStore`] adapter. Task bodies and fetch epochs live in
/// plain maps; list fingerprints sit in a bounded LRU so long-lived
/// sessions with many filter combinations do not grow without limit.
pub struct MemoryCache {
    inner: Mutex<Inner>,
}

struct Inner {
    tasks: HashMap<TaskId, Task>,
    epochs: HashMap<TaskId, u64>,
    lists: LruCache<String, Vec<TaskId>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        let capacity =
            NonZeroUsize::new(LIST_CACHE_CAPACITY).expect("list cache capacity is non-zero");
        Self {
            inner: Mutex::new(Inner {
                tasks: HashMap::new(),
                epochs: HashMap::new(),
                lists: LruCache::new(capacity),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Mutations never panic mid-write; recover the guard if a
        // panicking reader poisoned the lock.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCache {
    fn task(&self, id: &TaskId) -> Option<Task> {
        self.lock().tasks.get(id).cloned()
    }

    fn put_task(&self, task: Task) {
        self.lock().tasks.insert(task.id.clone(), task);
    }

    fn update_task(&self, id: &TaskId, apply: &mut dyn FnMut(&mut Task)) -> bool {
        let mut inner = self.lock();
        match inner.tasks.get_mut(id) {
            Some(task) => {
                apply(task);
                true
            }
            None => false,
        }
    }

    fn list(&self, fingerprint: &str) -> Option<Vec<TaskId>> {
        self.lock().lists.get(fingerprint).cloned()
    }

    fn put_list(&self, fingerprint: &str, ids: Vec<TaskId>) {
        self.lock().lists.put(fingerprint.to_string(), ids);
    }

    fn invalidate_lists(&self) {
        self.lock().lists.clear();
    }

    fn fetch_epoch(&self, id: &TaskId) -> u64 {
        self.lock().epochs.get(id).copied().unwrap_or(0)
    }

    fn cancel_in_flight(&self, id: &TaskId) -> u64 {
        let mut inner = self.lock();
        let epoch = inner.epochs.entry(id.clone()).or_insert(0);
        *epoch += 1;
        *epoch
    }

    fn commit_fetch(&self, task: Task, epoch: u64) -> bool {
        let mut inner = self.lock();
        let current = inner.epochs.get(&task.id).copied().unwrap_or(0);
        if current != epoch {
            tracing::debug!(
                target: "taskboard.cache",
                task_id = %task.id,
                stale_epoch = epoch,
                current_epoch = current,
                "discarding superseded detail read"
            );
            return false;
        }
        inner.tasks.insert(task.id.clone(), task);
        true
    }
}
