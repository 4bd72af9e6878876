//! Core types for the task chat engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A task record.
///
/// Records are owned exclusively by the [`TaskStore`](crate::store::TaskStore);
/// callers always receive clones and can never mutate storage directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Filter for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.completed,
            TaskFilter::Incomplete => !task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Completed => "completed",
            TaskFilter::Incomplete => "incomplete",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(TaskFilter::All),
            "completed" => Some(TaskFilter::Completed),
            "incomplete" => Some(TaskFilter::Incomplete),
            _ => None,
        }
    }
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskUpdates {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

/// A fully interpreted command: one of the five canonical task operations.
///
/// Serializes to the external wire shape, e.g.
/// `{"action": "create_task", "data": {"text": "...", "due_date": null, "tags": []}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum Command {
    CreateTask {
        text: String,
        due_date: Option<NaiveDate>,
        tags: Vec<String>,
    },
    ListTasks {
        filter: TaskFilter,
    },
    UpdateTask {
        task_id: u64,
        updates: TaskUpdates,
    },
    ToggleComplete {
        task_id: u64,
    },
    DeleteTask {
        task_id: u64,
    },
}

impl Command {
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Wire shape for unclassifiable input.
pub fn invalid_request_wire() -> Value {
    json!({ "error": "invalid_request" })
}

/// Aggregate task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}
