pub mod filters;
pub mod task;

pub use filters::TaskFilters;
pub use task::{
    ChecklistItem, ChecklistItemId, Task, TaskId, TaskPriority, TaskStatus, TransitionRequest,
};
