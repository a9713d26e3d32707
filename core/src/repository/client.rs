use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::model::{ChecklistItem, ChecklistItemId, Task, TaskFilters, TaskId, TransitionRequest};

use super::r#trait::{TaskRecords, TaskRepository};

/// HTTP adapter for the [`TaskRepository`] port.
#[derive(Clone)]
pub struct HttpTaskRepository {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpTaskRepository {
    pub fn new(base_url: String, api_key: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            base_url,
            api_key,
            http,
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(cfg.base_url.clone(), cfg.api_key.clone(), cfg.timeout_ms)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.api_key)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Decodes raw list records, dropping any that fail to parse (malformed
/// status or shape) instead of failing the whole list.
pub fn decode_task_records(values: Vec<Value>) -> TaskRecords {
    let mut records = TaskRecords::default();
    for value in values {
        let raw_id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        match serde_json::from_value::<Task>(value) {
            Ok(task) => records.tasks.push(task),
            Err(err) => {
                tracing::warn!(
                    target: "taskboard.repo",
                    task_id = %raw_id,
                    error = %err,
                    "dropping malformed task record"
                );
                records.dropped.push(raw_id);
            }
        }
    }
    records
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn list_tasks(&self, filters: &TaskFilters) -> anyhow::Result<TaskRecords> {
        let url = self.url("/v1/tasks");
        tracing::debug!(
            target: "taskboard.repo",
            stage = "http.list.in",
            url = %url,
            fingerprint = %filters.fingerprint()
        );
        let req = self.http.get(url).query(&filters.to_query());
        let resp = self.auth(req).send().await?.error_for_status()?;
        let values = resp.json::<Vec<Value>>().await?;
        let records = decode_task_records(values);
        tracing::debug!(
            target: "taskboard.repo",
            stage = "http.list.out",
            tasks = records.tasks.len(),
            dropped = records.dropped.len()
        );
        Ok(records)
    }

    async fn get_task(&self, id: &TaskId) -> anyhow::Result<Task> {
        let url = self.url(&format!("/v1/tasks/{id}"));
        tracing::debug!(target: "taskboard.repo", stage = "http.get.in", url = %url);
        let req = self.http.get(url);
        let resp = self.auth(req).send().await?.error_for_status()?;
        let task = resp.json::<Task>().await?;
        tracing::debug!(target: "taskboard.repo", stage = "http.get.out", task_id = %task.id);
        Ok(task)
    }

    async fn transition_task(
        &self,
        id: &TaskId,
        request: &TransitionRequest,
    ) -> anyhow::Result<Task> {
        let url = self.url(&format!("/v1/tasks/{id}/move"));
        tracing::debug!(
            target: "taskboard.repo",
            stage = "http.move.in",
            url = %url,
            to_status = %request.to_status,
            to_position = ?request.to_position
        );
        let req = self.http.patch(url).json(request);
        let resp = self.auth(req).send().await?.error_for_status()?;
        let task = resp.json::<Task>().await?;
        tracing::debug!(
            target: "taskboard.repo",
            stage = "http.move.out",
            task_id = %task.id,
            status = %task.status,
            position = task.position
        );
        Ok(task)
    }

    async fn toggle_checklist_item(
        &self,
        task_id: &TaskId,
        item_id: &ChecklistItemId,
    ) -> anyhow::Result<ChecklistItem> {
        let url = self.url(&format!("/v1/tasks/{task_id}/checklist/{item_id}/toggle"));
        tracing::debug!(target: "taskboard.repo", stage = "http.toggle.in", url = %url);
        let req = self.http.patch(url.clone());
        let resp = self.auth(req).send().await?.error_for_status()?;
        let item = resp.json::<ChecklistItem>().await?;
        tracing::debug!(
            target: "taskboard.repo",
            stage = "http.toggle.out",
            item_id = %item.id,
            is_completed = item.is_completed
        );
        Ok(item)
    }
}
