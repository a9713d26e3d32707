//! Pure derivation of the three board columns from the flat task set.

use crate::model::{Task, TaskId, TaskStatus};

/// The three fixed columns, each sorted ascending by `position`. All
/// three always exist, even when empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardColumns {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl BoardColumns {
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Column and index of a task, if present on the board.
    pub fn locate(&self, id: &TaskId) -> Option<(TaskStatus, usize)> {
        for status in TaskStatus::ALL {
            if let Some(index) = self.column(status).iter().position(|t| &t.id == id) {
                return Some((status, index));
            }
        }
        None
    }

    pub fn total(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }
}

/// Groups by status, then stable-sorts each column by `position` so that
/// equal positions keep their fetch order and do not flicker between
/// reads. Pure; never mutates its input.
pub fn project(tasks: &[Task]) -> BoardColumns {
    let mut columns = BoardColumns::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => columns.todo.push(task.clone()),
            TaskStatus::InProgress => columns.in_progress.push(task.clone()),
            TaskStatus::Done => columns.done.push(task.clone()),
        }
    }
    columns.todo.sort_by_key(|t| t.position);
    columns.in_progress.sort_by_key(|t| t.position);
    columns.done.sort_by_key(|t| t.position);
    columns
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::model::{TaskPriority, TaskStatus};

    use super::*;

    fn task(id: &str, status: TaskStatus, position: u32) -> Task {
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

    #[test]
    fn groups_and_sorts_by_position() {
        let tasks = vec![
            task("b", TaskStatus::Todo, 2),
            task("a", TaskStatus::Todo, 1),
            task("c", TaskStatus::Done, 0),
        ];
        let columns = project(&tasks);
        let todo: Vec<&str> = columns.todo.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(todo, vec!["a", "b"]);
        assert_eq!(columns.done.len(), 1);
        assert!(columns.in_progress.is_empty());
    }

    #[test]
    fn position_ties_keep_fetch_order() {
        let tasks = vec![
            task("first", TaskStatus::InProgress, 1),
            task("second", TaskStatus::InProgress, 1),
            task("third", TaskStatus::InProgress, 0),
        ];
        let columns = project(&tasks);
        let order: Vec<&str> = columns.in_progress.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["third", "first", "second"]);
    }

    #[test]
    fn all_columns_exist_when_empty() {
        let columns = project(&[]);
        assert_eq!(columns, BoardColumns::default());
        for status in TaskStatus::ALL {
            assert!(columns.column(status).is_empty());
        }
    }

    #[test]
    fn locate_finds_column_and_index() {
        let tasks = vec![
            task("a", TaskStatus::Todo, 0),
            task("b", TaskStatus::Done, 0),
            task("c", TaskStatus::Done, 1),
        ];
        let columns = project(&tasks);
        assert_eq!(
            columns.locate(&TaskId::new("c")),
            Some((TaskStatus::Done, 1))
        );
        assert_eq!(columns.locate(&TaskId::new("zz")), None);
    }
}
