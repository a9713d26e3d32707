use async_trait::async_trait;

use crate::model::{ChecklistItem, ChecklistItemId, Task, TaskFilters, TaskId, TransitionRequest};

/// Result of a list fetch. Records whose status failed to parse are not
/// silently placed in a default column; they are dropped at the decode
/// boundary and reported here so callers can surface the fault.
#[derive(Debug, Default)]
pub struct TaskRecords {
    pub tasks: Vec<Task>,
    /// Ids (or `"<unknown>"`) of records dropped as malformed.
    pub dropped: Vec<String>,
}

/// Remote task repository port. The server is the sole authority for
/// final positions and derived fields; every mutation returns the
/// authoritative record.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_tasks(&self, filters: &TaskFilters) -> anyhow::Result<TaskRecords>;

    async fn get_task(&self, id: &TaskId) -> anyhow::Result<Task>;

    async fn transition_task(
        &self,
        id: &TaskId,
        request: &TransitionRequest,
    ) -> anyhow::Result<Task>;

    async fn toggle_checklist_item(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> anyhow::Result<ChecklistItem>;
}
