//! Command dispatch to the task store.

use crate::error::{TaskError, TaskResult};
use crate::store::TaskStore;
use crate::types::{Command, Task, TaskFilter};

/// Outcome of a successfully dispatched command.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Created(Task),
    Listed {
        filter: TaskFilter,
        tasks: Vec<Task>,
    },
    Updated(Task),
    Toggled(Task),
    Deleted(Task),
}

/// Route a command to the matching store operation.
///
/// Required fields are checked first; a failed check short-circuits before
/// the store is touched. Extraction has already fully completed by the time
/// this runs, so a dispatch either applies whole or not at all.
pub fn dispatch(store: &TaskStore, command: &Command) -> TaskResult<Dispatch> {
    match command {
        Command::CreateTask {
            text,
            due_date,
            tags,
        } => {
            if text.trim().is_empty() {
                return Err(TaskError::Validation("Task text is required".to_string()));
            }
            store
                .create(text, "", *due_date, tags.clone())
                .map(Dispatch::Created)
        }
        Command::ListTasks { filter } => Ok(Dispatch::Listed {
            filter: *filter,
            tasks: store.list(*filter),
        }),
        Command::UpdateTask { task_id, updates } => {
            if updates.is_empty() {
                return Err(TaskError::Validation(
                    "No updatable fields found".to_string(),
                ));
            }
            store.update(*task_id, updates).map(Dispatch::Updated)
        }
        Command::ToggleComplete { task_id } => store.toggle(*task_id).map(Dispatch::Toggled),
        Command::DeleteTask { task_id } => store.delete(*task_id).map(Dispatch::Deleted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskUpdates;

    #[test]
    fn empty_create_text_rejected_before_store() {
        let store = TaskStore::new();
        let cmd = Command::CreateTask {
            text: "   ".to_string(),
            due_date: None,
            tags: vec![],
        };
        assert!(matches!(
            dispatch(&store, &cmd),
            Err(TaskError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_updates_rejected_before_store() {
        let store = TaskStore::new();
        let task = store.create("keep me", "", None, vec![]).unwrap();
        let before = store.get(task.id).unwrap().updated_at;

        let cmd = Command::UpdateTask {
            task_id: task.id,
            updates: TaskUpdates::default(),
        };
        assert!(matches!(
            dispatch(&store, &cmd),
            Err(TaskError::Validation(_))
        ));
        assert_eq!(store.get(task.id).unwrap().updated_at, before);
    }

    #[test]
    fn delete_missing_task_is_not_found() {
        let store = TaskStore::new();
        let cmd = Command::DeleteTask { task_id: 5 };
        assert_eq!(dispatch(&store, &cmd).err(), Some(TaskError::NotFound(5)));
    }
}
