//! In-memory task store.
//!
//! The store is the sole owner of task records and the only authority on id
//! allocation. Ids increase monotonically for the lifetime of the store and
//! are never reissued after deletion. All access goes through one mutex so
//! concurrent callers cannot interleave read-modify-write cycles on the same
//! record.

use crate::error::{TaskError, TaskResult};
use crate::types::{Task, TaskCounts, TaskFilter, TaskUpdates};
use crate::validate::{clamp_description, validate_title, DESCRIPTION_MAX_CHARS};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Update stamp that stays strictly increasing even when two mutations land
/// within one clock tick.
fn next_stamp(prev: i64) -> i64 {
    now_ms().max(prev + 1)
}

#[derive(Debug)]
struct StoreInner {
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
}

/// Handle to the shared task store. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct TaskStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl TaskStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                tasks: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a new task. The id is (max ever issued) + 1; deleted ids are
    /// never reissued because the counter only grows.
    pub fn create(
        &self,
        title: &str,
        description: &str,
        due_date: Option<NaiveDate>,
        tags: Vec<String>,
    ) -> TaskResult<Task> {
        validate_title(title)?;
        let (description, truncated) = clamp_description(description);
        if truncated {
            tracing::debug!("description truncated to {DESCRIPTION_MAX_CHARS} characters");
        }

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let now = now_ms();
        let task = Task {
            id,
            title: title.to_string(),
            description,
            completed: false,
            due_date,
            tags,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<Task> {
        let inner = self.inner.lock().unwrap();
        inner.tasks.get(&id).cloned()
    }

    /// List tasks matching the filter, ascending by id. Every read path uses
    /// this one ordering.
    pub fn list(&self, filter: TaskFilter) -> Vec<Task> {
        let inner = self.inner.lock().unwrap();
        inner
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Apply the fields present in `updates`, leaving the rest untouched.
    pub fn update(&self, id: u64, updates: &TaskUpdates) -> TaskResult<Task> {
        if let Some(title) = &updates.title {
            validate_title(title)?;
        }

        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or(TaskError::NotFound(id))?;

        if let Some(title) = &updates.title {
            task.title = title.clone();
        }
        if let Some(description) = &updates.description {
            task.description = clamp_description(description).0;
        }
        if let Some(due_date) = updates.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = &updates.tags {
            task.tags = tags.clone();
        }
        task.updated_at = next_stamp(task.updated_at);
        Ok(task.clone())
    }

    /// Flip the completion flag.
    pub fn toggle(&self, id: u64) -> TaskResult<Task> {
        let mut inner = self.inner.lock().unwrap();
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = !task.completed;
        task.updated_at = next_stamp(task.updated_at);
        Ok(task.clone())
    }

    /// Remove a task. Its id is permanently retired.
    pub fn delete(&self, id: u64) -> TaskResult<Task> {
        let mut inner = self.inner.lock().unwrap();
        inner.tasks.remove(&id).ok_or(TaskError::NotFound(id))
    }

    /// Count total, completed, and pending tasks.
    pub fn counts(&self) -> TaskCounts {
        let inner = self.inner.lock().unwrap();
        let total = inner.tasks.len();
        let completed = inner.tasks.values().filter(|t| t.completed).count();
        TaskCounts {
            total,
            completed,
            pending: total - completed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().tasks.is_empty()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_strictly_increase_within_a_tick() {
        let prev = now_ms() + 1_000_000;
        assert!(next_stamp(prev) > prev);
    }

    #[test]
    fn clone_shares_records() {
        let store = TaskStore::new();
        let handle = store.clone();
        store.create("shared", "", None, vec![]).unwrap();
        assert_eq!(handle.counts().total, 1);
    }
}
