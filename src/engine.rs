//! Message processing pipeline: extract, dispatch, format.
//!
//! One engine owns one session's store. Messages are processed to
//! completion, one at a time; every error kind is recovered here into a
//! chat response, so callers never see a crash.

use crate::error::{TaskError, TaskResult};
use crate::extract::Extractor;
use crate::format;
use crate::router;
use crate::store::TaskStore;
use serde::Serialize;

/// Reply for one processed message: a human-readable confirmation plus an
/// ordered, machine-auditable action trail.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub actions_performed: Vec<String>,
}

pub struct Engine {
    store: TaskStore,
    extractor: Extractor,
}

impl Engine {
    /// Engine with a fresh, empty store. The store lives as long as the
    /// engine and is discarded with it; there is no durability.
    pub fn new(extractor: Extractor) -> Self {
        Self {
            store: TaskStore::new(),
            extractor,
        }
    }

    pub fn with_store(store: TaskStore, extractor: Extractor) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Process one message to completion.
    ///
    /// Extraction, including any oracle round trip, finishes before the
    /// store is touched, so an oracle failure never leaves a partial
    /// mutation.
    pub async fn process_message(&self, text: &str) -> ChatResponse {
        let today = chrono::Local::now().date_naive();
        match self.try_process(text, today).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(code = err.code(), error = %err, "message rejected");
                error_response(&err)
            }
        }
    }

    async fn try_process(
        &self,
        text: &str,
        today: chrono::NaiveDate,
    ) -> TaskResult<ChatResponse> {
        let command = self.extractor.extract(text, today).await?;
        tracing::debug!(command = ?command, "dispatching");
        let outcome = router::dispatch(&self.store, &command)?;
        Ok(ChatResponse {
            success: true,
            message: format::render(&outcome),
            actions_performed: vec![format::outcome_message(&outcome)],
        })
    }
}

fn error_response(err: &TaskError) -> ChatResponse {
    let message = match err {
        TaskError::InvalidRequest => {
            "Sorry, I couldn't understand that. Try 'add task buy milk' or 'show tasks'."
                .to_string()
        }
        TaskError::NotFound(_) | TaskError::Validation(_) | TaskError::UnsupportedAction(_) => {
            err.to_string()
        }
        // Unexpected internal fault: degrade to a generic retry message.
        TaskError::Oracle(_) => "Sorry, I encountered an error. Please try again.".to_string(),
    };
    ChatResponse {
        success: false,
        message,
        actions_performed: vec![],
    }
}
