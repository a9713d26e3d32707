//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `taskboard_core::api` instead of reaching into
//! internal modules.

pub use crate::board::{Board, LoadReport};
pub use crate::cache::{CacheStore, MemoryCache};
pub use crate::config::{load_default, load_from, ApiConfig, AppConfig, LoggingConfig};
pub use crate::drag::{DragSession, DropOutcome, DropTarget};
pub use crate::engine::{PendingToggle, PendingTransition, TransitionEngine, TransitionIntent};
pub use crate::error::{BoardError, TransitionError};
pub use crate::model::{
    ChecklistItem, ChecklistItemId, Task, TaskFilters, TaskId, TaskPriority, TaskStatus,
    TransitionRequest,
};
pub use crate::projection::{project, BoardColumns};
pub use crate::repository::{HttpTaskRepository, TaskRecords, TaskRepository};
