#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;

use taskboard_core::api::{
    ChecklistItem, ChecklistItemId, Task, TaskFilters, TaskId, TaskPriority, TaskRecords,
    TaskRepository, TaskStatus, TransitionRequest,
};

pub fn task(id: &str, status: TaskStatus, position: u32) -> Task {
    Task {
        id: TaskId::new(id),
        title: format!("task {id}"),
        description: String::new(),
        status,
        position,
        priority: TaskPriority::Medium,
        is_blocked: false,
        blocked_reason: None,
        is_late: false,
        checklist_items: Vec::new(),
        updated_at: Utc::now(),
    }
}

pub fn blocked_task(id: &str, status: TaskStatus, position: u32) -> Task {
    let mut t = task(id, status, position);
    t.is_blocked = true;
    t.blocked_reason = Some("waiting on dependency".to_string());
    t
}

pub fn checklist_item(id: &str, is_completed: bool, order: u32) -> ChecklistItem {
    ChecklistItem {
        id: ChecklistItemId::new(id),
        description: format!("item {id}"),
        is_completed,
        completed_at: is_completed.then(Utc::now),
        order,
    }
}

/// How the scripted repository answers its next move call. Scripts pop
/// in call order; an empty queue answers like the real server would
/// (echo the request back as the authoritative task).
pub enum MoveScript {
    Echo,
    Reject(String),
    Hold(oneshot::Receiver<Result<Task, String>>),
}

pub enum ToggleScript {
    Echo,
    Reject(String),
    Hold(oneshot::Receiver<Result<ChecklistItem, String>>),
}

/// Deterministic in-memory [`TaskRepository`] for integration tests.
/// `Hold` scripts park a call on a oneshot channel so tests control the
/// order in which in-flight mutations settle.
pub struct ScriptedRepository {
    inner: Mutex<Inner>,
}

struct Inner {
    tasks: Vec<Task>,
    dropped: Vec<String>,
    move_scripts: VecDeque<MoveScript>,
    toggle_scripts: VecDeque<ToggleScript>,
    move_calls: Vec<(TaskId, TransitionRequest)>,
    toggle_calls: Vec<(TaskId, ChecklistItemId)>,
}

impl ScriptedRepository {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks,
                dropped: Vec::new(),
                move_scripts: VecDeque::new(),
                toggle_scripts: VecDeque::new(),
                move_calls: Vec::new(),
                toggle_calls: Vec::new(),
            }),
        }
    }

    pub fn with_dropped(tasks: Vec<Task>, dropped: Vec<&str>) -> Self {
        let repo = Self::new(tasks);
        repo.lock().dropped = dropped.into_iter().map(String::from).collect();
        repo
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reject_next_move(&self, reason: &str) {
        self.lock()
            .move_scripts
            .push_back(MoveScript::Reject(reason.to_string()));
    }

    /// Parks the next move call; the returned sender settles it.
    pub fn hold_next_move(&self) -> oneshot::Sender<Result<Task, String>> {
        let (tx, rx) = oneshot::channel();
        self.lock().move_scripts.push_back(MoveScript::Hold(rx));
        tx
    }

    pub fn reject_next_toggle(&self, reason: &str) {
        self.lock()
            .toggle_scripts
            .push_back(ToggleScript::Reject(reason.to_string()));
    }

    pub fn hold_next_toggle(&self) -> oneshot::Sender<Result<ChecklistItem, String>> {
        let (tx, rx) = oneshot::channel();
        self.lock().toggle_scripts.push_back(ToggleScript::Hold(rx));
        tx
    }

    pub fn move_calls(&self) -> usize {
        self.lock().move_calls.len()
    }

    pub fn toggle_calls(&self) -> usize {
        self.lock().toggle_calls.len()
    }

    /// The repository's own (server-side) copy of a task.
    pub fn server_task(&self, id: &TaskId) -> Option<Task> {
        self.lock().tasks.iter().find(|t| &t.id == id).cloned()
    }

    fn apply_move(&self, id: &TaskId, request: &TransitionRequest) -> anyhow::Result<Task> {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| anyhow::anyhow!("no such task: {id}"))?;
        task.status = request.to_status;
        if let Some(position) = request.to_position {
            task.position = position;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    fn apply_toggle(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> anyhow::Result<ChecklistItem> {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| &t.id == task_id)
            .ok_or_else(|| anyhow::anyhow!("no such task: {task_id}"))?;
        let item = task
            .checklist_items
            .iter_mut()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| anyhow::anyhow!("no such item: {item_id}"))?;
        item.is_completed = !item.is_completed;
        item.completed_at = item.is_completed.then(Utc::now);
        Ok(item.clone())
    }
}

#[async_trait]
impl TaskRepository for ScriptedRepository {
    async fn list_tasks(&self, _filters: &TaskFilters) -> anyhow::Result<TaskRecords> {
        let inner = self.lock();
        Ok(TaskRecords {
            tasks: inner.tasks.clone(),
            dropped: inner.dropped.clone(),
        })
    }

    async fn get_task(&self, id: &TaskId) -> anyhow::Result<Task> {
        self.server_task(id)
            .ok_or_else(|| anyhow::anyhow!("no such task: {id}"))
    }

    async fn transition_task(
        &self,
        id: &TaskId,
        request: &TransitionRequest,
    ) -> anyhow::Result<Task> {
        let script = {
            let mut inner = self.lock();
            inner.move_calls.push((id.clone(), request.clone()));
            inner.move_scripts.pop_front()
        };
        match script {
            None | Some(MoveScript::Echo) => self.apply_move(id, request),
            Some(MoveScript::Reject(reason)) => Err(anyhow::anyhow!(reason)),
            Some(MoveScript::Hold(rx)) => {
                let result = rx.await.map_err(|_| anyhow::anyhow!("script dropped"))?;
                match result {
                    Ok(task) => {
                        let mut inner = self.lock();
                        if let Some(stored) = inner.tasks.iter_mut().find(|t| t.id == task.id) {
                            *stored = task.clone();
                        }
                        Ok(task)
                    }
                    Err(reason) => Err(anyhow::anyhow!(reason)),
                }
            }
        }
    }

    async fn toggle_checklist_item(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> anyhow::Result<ChecklistItem> {
        let script = {
            let mut inner = self.lock();
            inner.toggle_calls.push((task_id.clone(), item_id.clone()));
            inner.toggle_scripts.pop_front()
        };
        match script {
            None | Some(ToggleScript::Echo) => self.apply_toggle(task_id, item_id),
            Some(ToggleScript::Reject(reason)) => Err(anyhow::anyhow!(reason)),
            Some(ToggleScript::Hold(rx)) => {
                let result = rx.await.map_err(|_| anyhow::anyhow!("script dropped"))?;
                result.map_err(|reason| anyhow::anyhow!(reason))
            }
        }
    }
}
