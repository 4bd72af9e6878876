//! Error taxonomy for command processing.
//!
//! All four kinds are recovered into the chat response at the engine
//! boundary; nothing here propagates past [`process_message`](crate::engine::Engine::process_message).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Input text could not be classified into a command.
    #[error("invalid_request")]
    InvalidRequest,

    /// A field failed validation; rejected before any store mutation.
    #[error("{0}")]
    Validation(String),

    /// Referenced task id does not exist.
    #[error("Task {0} not found")]
    NotFound(u64),

    /// Wire command carried an action tag the router does not recognize.
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    /// Oracle transport or protocol failure.
    #[error("oracle: {0}")]
    Oracle(String),
}

impl TaskError {
    /// Stable code for machine-readable responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            TaskError::InvalidRequest => "INVALID_REQUEST",
            TaskError::Validation(_) => "VALIDATION_FAILED",
            TaskError::NotFound(_) => "TASK_NOT_FOUND",
            TaskError::UnsupportedAction(_) => "UNSUPPORTED_ACTION",
            TaskError::Oracle(_) => "ORACLE_ERROR",
        }
    }
}

/// Result type for task operations.
pub type TaskResult<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        assert_eq!(TaskError::NotFound(5).to_string(), "Task 5 not found");
    }

    #[test]
    fn invalid_request_marker() {
        assert_eq!(TaskError::InvalidRequest.to_string(), "invalid_request");
        assert_eq!(TaskError::InvalidRequest.code(), "INVALID_REQUEST");
    }
}
