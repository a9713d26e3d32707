pub mod client;
pub mod r#trait;

pub use client::{decode_task_records, HttpTaskRepository};
pub use r#trait::{TaskRecords, TaskRepository};
