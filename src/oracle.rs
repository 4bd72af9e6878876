//! External reasoning oracle boundary.
//!
//! The oracle classifies free text into one of the wire command shapes. It
//! is non-deterministic and untrusted: replies go back through the
//! extractor's grammar before they become commands, so this module only
//! handles the prompt and the transport. Tests inject a deterministic stub
//! through the [`Oracle`] trait instead of an HTTP client.

use crate::config::OracleConfig;
use crate::error::{TaskError, TaskResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Narrow interface to the external classifier.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Classify `text` under the given instruction preamble, returning the
    /// oracle's raw reply. The reply is expected to be one of the JSON
    /// command shapes, optionally wrapped in a fenced code block.
    async fn classify(&self, instructions: &str, text: &str) -> TaskResult<String>;
}

/// Fixed instruction preamble: current date plus the grammar rules the reply
/// must satisfy.
pub fn instruction_preamble(today: NaiveDate) -> String {
    format!(
        r#"You are a task-list command classifier. Today's date is {today}.
Convert the user's message into exactly one JSON object, with no explanation:

{{"action": "create_task", "data": {{"text": "...", "due_date": "YYYY-MM-DD" or null, "tags": ["..."]}}}}
{{"action": "list_tasks", "data": {{"filter": "all" | "completed" | "incomplete"}}}}
{{"action": "update_task", "data": {{"task_id": N, "updates": {{"title"?, "description"?, "due_date"?, "tags"?}}}}}}
{{"action": "toggle_complete", "data": {{"task_id": N}}}}
{{"action": "delete_task", "data": {{"task_id": N}}}}
{{"error": "invalid_request"}}

Rules:
- a task id is the integer after the word "task"
- dates are absolute calendar dates normalized to YYYY-MM-DD; never resolve relative dates like "tomorrow"
- tags are #word tokens with the # removed, case preserved
- for create_task, "text" is the task title with dates and tags removed
- if the message is not a task operation, return {{"error": "invalid_request"}}"#
    )
}

/// OpenAI-compatible chat completion client.
pub struct HttpOracle {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn classify(&self, instructions: &str, text: &str) -> TaskResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TaskError::Oracle(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TaskError::Oracle(format!("API error {status}: {body}")));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| TaskError::Oracle(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TaskError::Oracle("empty response".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_carries_date_and_shapes() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let preamble = instruction_preamble(today);
        assert!(preamble.contains("2025-06-15"));
        assert!(preamble.contains("create_task"));
        assert!(preamble.contains("invalid_request"));
    }
}
