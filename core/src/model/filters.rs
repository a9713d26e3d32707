use serde::{Deserialize, Serialize};

use super::task::{TaskPriority, TaskStatus};

/// Server-side list filters. The serialized form doubles as the cache
/// fingerprint for the matching task list, so two filter values compare
/// equal exactly when they address the same cached list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TaskFilters {
    /// Stable key for the cached list this filter set addresses.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Query-string pairs for the list endpoint; only set fields appear.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            let value = serde_json::to_string(&priority).unwrap_or_default();
            query.push(("priority", value.trim_matches('"').to_string()));
        }
        if let Some(id) = &self.responsible_id {
            query.push(("responsibleId", id.clone()));
        }
        if let Some(id) = &self.team_id {
            query.push(("teamId", id.clone()));
        }
        if let Some(late) = self.is_late {
            query.push(("isLate", late.to_string()));
        }
        if let Some(blocked) = self.is_blocked {
            query.push(("isBlocked", blocked.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}
