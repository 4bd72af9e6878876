//! Natural-language command extraction.
//!
//! Classification follows a fixed precedence, first match wins: delete,
//! toggle, update, list, then create as the fallback. An optional oracle is
//! consulted for text the grammar cannot confidently place, but its reply is
//! re-normalized through this same grammar before it becomes a trusted
//! command. The oracle is a hint source, never a bypass.

pub mod dates;
pub mod tags;

use crate::error::{TaskError, TaskResult};
use crate::oracle::{instruction_preamble, Oracle};
use crate::types::{Command, TaskFilter, TaskUpdates};
use chrono::NaiveDate;
use regex_lite::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

const DELETE_VERBS: &[&str] = &["delete", "remove"];
const TOGGLE_VERBS: &[&str] = &["mark", "complete", "done", "finish", "finished"];
const UPDATE_VERBS: &[&str] = &["update", "change", "modify", "edit", "rename"];
const LIST_VERBS: &[&str] = &["show", "list", "display", "what", "view"];
const CREATE_VERBS: &[&str] = &["add", "create", "make", "new"];
const DESCRIPTION_KEYWORDS: &[&str] = &["description", "desc", "note", "notes"];

fn task_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\btask\s+#?(\d+)\b").unwrap())
}

fn creation_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:please\s+)?(?:add|create|make|new)\s+(?:a\s+)?(?:new\s+)?(?:task\b\s*)?(?::\s*|to\s+)?")
            .unwrap()
    })
}

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)"|'([^']+)'"#).unwrap())
}

fn after_to_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bto\s+(.+)$").unwrap())
}

fn due_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\bdue(?:\s+(?:on|by))?\s*$").unwrap())
}

fn contains_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == word)
}

fn contains_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| contains_word(lower, w))
}

/// First integer following the literal word "task", with the byte offset
/// just past the match.
fn find_task_id(text: &str) -> Option<(u64, usize)> {
    let caps = task_id_re().captures(text)?;
    let id = caps.get(1)?.as_str().parse().ok()?;
    Some((id, caps.get(0)?.end()))
}

fn remove_range(text: &str, start: usize, end: usize) -> String {
    format!("{} {}", &text[..start], &text[end..])
}

enum Classified {
    /// An explicit rule matched; the oracle is never consulted.
    Definite(Command),
    /// Create-fallback without a creation verb; the oracle may refine, and
    /// the carried result is used when it cannot.
    Ambiguous(TaskResult<Command>),
}

/// Converts raw text into commands.
///
/// Stateless per invocation; the optional oracle is the only collaborator.
#[derive(Default)]
pub struct Extractor {
    oracle: Option<Box<dyn Oracle>>,
}

impl Extractor {
    pub fn new() -> Self {
        Self { oracle: None }
    }

    pub fn with_oracle(mut self, oracle: Box<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Produce exactly one command for `text`, or `InvalidRequest`.
    ///
    /// Any oracle round trip completes here, before the caller touches the
    /// store; an oracle failure degrades to the deterministic result.
    pub async fn extract(&self, text: &str, today: NaiveDate) -> TaskResult<Command> {
        if text.trim().is_empty() {
            return Err(TaskError::InvalidRequest);
        }
        match classify_inner(text, today) {
            Classified::Definite(cmd) => Ok(cmd),
            Classified::Ambiguous(fallback) => {
                if let Some(oracle) = &self.oracle {
                    match consult(oracle.as_ref(), text, today).await {
                        Ok(cmd) => return Ok(cmd),
                        Err(err) => {
                            tracing::warn!(error = %err, "oracle consult failed, using deterministic fallback");
                        }
                    }
                }
                fallback
            }
        }
    }
}

/// Deterministic classification only, no oracle involvement.
pub fn classify(text: &str, today: NaiveDate) -> TaskResult<Command> {
    if text.trim().is_empty() {
        return Err(TaskError::InvalidRequest);
    }
    match classify_inner(text, today) {
        Classified::Definite(cmd) => Ok(cmd),
        Classified::Ambiguous(fallback) => fallback,
    }
}

fn classify_inner(text: &str, today: NaiveDate) -> Classified {
    let lower = text.to_lowercase();
    let task_id = find_task_id(text);

    if let Some((id, id_end)) = task_id {
        if contains_any(&lower, DELETE_VERBS) || lower.contains("get rid") {
            return Classified::Definite(Command::DeleteTask { task_id: id });
        }
        if contains_any(&lower, TOGGLE_VERBS) {
            return Classified::Definite(Command::ToggleComplete { task_id: id });
        }
        if contains_any(&lower, UPDATE_VERBS) {
            return Classified::Definite(Command::UpdateTask {
                task_id: id,
                updates: infer_updates(text, id_end, today),
            });
        }
    }

    let has_task_word = contains_word(&lower, "task") || contains_word(&lower, "tasks");
    if has_task_word && task_id.is_none() && contains_any(&lower, LIST_VERBS) {
        return Classified::Definite(Command::ListTasks {
            filter: infer_filter(&lower),
        });
    }

    let create = build_create(text, today);
    if contains_any(&lower, CREATE_VERBS) {
        match create {
            Ok(cmd) => Classified::Definite(cmd),
            Err(err) => Classified::Ambiguous(Err(err)),
        }
    } else {
        Classified::Ambiguous(create)
    }
}

fn infer_filter(lower: &str) -> TaskFilter {
    if contains_any(lower, &["incomplete", "pending", "unfinished"]) {
        TaskFilter::Incomplete
    } else if contains_any(lower, &["completed", "done", "finished"]) {
        TaskFilter::Completed
    } else {
        TaskFilter::All
    }
}

/// Infer which fields an update command targets from the text around the
/// task id: a quoted segment or a trailing `to <value>` supplies the new
/// title (or description when a description keyword is present); extracted
/// dates and tags become due_date and tags updates.
fn infer_updates(text: &str, id_end: usize, today: NaiveDate) -> TaskUpdates {
    let mut updates = TaskUpdates::default();

    if let Some(dm) = dates::extract_date(text, today) {
        updates.due_date = Some(dm.date);
    }
    let (tag_list, _) = tags::extract_tags(text);
    if !tag_list.is_empty() {
        updates.tags = Some(tag_list);
    }

    let lower = text.to_lowercase();
    let wants_description = contains_any(&lower, DESCRIPTION_KEYWORDS);

    let value = quoted_value(text).or_else(|| value_after_to(&text[id_end..], today));
    if let Some(value) = value {
        if wants_description {
            updates.description = Some(value);
        } else {
            updates.title = Some(value);
        }
    }

    updates
}

fn quoted_value(text: &str) -> Option<String> {
    let caps = quoted_re().captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn value_after_to(tail: &str, today: NaiveDate) -> Option<String> {
    let caps = after_to_re().captures(tail)?;
    let mut value = caps.get(1)?.as_str().to_string();
    if let Some(dm) = dates::extract_date(&value, today) {
        value = remove_range(&value, dm.start, dm.end);
    }
    let (_, rest) = tags::extract_tags(&value);
    let rest = due_suffix_re().replace(&rest, "").trim().to_string();
    (!rest.is_empty()).then_some(rest)
}

/// Create-task payload from the full text: date and tag tokens are pulled
/// out, a leading creation phrase is dropped, and whatever remains is the
/// title. No usable remainder means the input was not a request at all.
fn build_create(text: &str, today: NaiveDate) -> TaskResult<Command> {
    let mut working = text.to_string();
    let mut due_date = None;
    if let Some(dm) = dates::extract_date(&working, today) {
        due_date = Some(dm.date);
        working = remove_range(&working, dm.start, dm.end);
    }

    let (tag_list, remainder) = tags::extract_tags(&working);
    let remainder = due_suffix_re().replace(&remainder, "");
    let remainder = creation_prefix_re().replace(&remainder, "");
    let title = remainder.trim().trim_matches(&['"', '\''][..]).trim();

    if title.is_empty() {
        return Err(TaskError::InvalidRequest);
    }
    Ok(Command::CreateTask {
        text: title.to_string(),
        due_date,
        tags: tag_list,
    })
}

async fn consult(oracle: &dyn Oracle, text: &str, today: NaiveDate) -> TaskResult<Command> {
    let preamble = instruction_preamble(today);
    let reply = oracle.classify(&preamble, text).await?;
    tracing::debug!(reply = %reply, "oracle reply");
    normalize_oracle_reply(&reply, today)
}

/// Re-validate a raw oracle reply into a trusted command.
///
/// The reply may be wrapped in a fenced code block. Every payload field is
/// pushed back through the deterministic grammar: dates re-parse, tags pass
/// the charset rule, create text goes through the same title derivation.
pub fn normalize_oracle_reply(reply: &str, today: NaiveDate) -> TaskResult<Command> {
    let stripped = strip_code_fence(reply);
    let value: Value = serde_json::from_str(stripped)
        .map_err(|e| TaskError::Oracle(format!("malformed reply: {e}")))?;

    if value.get("error").is_some() {
        return Err(TaskError::InvalidRequest);
    }

    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| TaskError::Oracle("reply missing action".to_string()))?;
    let data = value
        .get("data")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    match action {
        "create_task" => {
            #[derive(Deserialize)]
            struct RawCreate {
                text: String,
                #[serde(default)]
                due_date: Option<String>,
                #[serde(default)]
                tags: Vec<String>,
            }
            let raw: RawCreate =
                serde_json::from_value(data).map_err(|e| TaskError::Oracle(e.to_string()))?;
            let mut cmd = build_create(&raw.text, today)?;
            if let Command::CreateTask { due_date, tags, .. } = &mut cmd {
                if let Some(parsed) = raw
                    .due_date
                    .as_deref()
                    .and_then(|s| dates::parse_date_str(s, today))
                {
                    *due_date = Some(parsed);
                }
                let provided = tags::sanitize_tags(raw.tags);
                if !provided.is_empty() {
                    *tags = provided;
                }
            }
            Ok(cmd)
        }
        "list_tasks" => {
            let filter = data
                .get("filter")
                .and_then(Value::as_str)
                .and_then(TaskFilter::from_str)
                .unwrap_or_default();
            Ok(Command::ListTasks { filter })
        }
        "update_task" => {
            #[derive(Default, Deserialize)]
            struct RawUpdates {
                title: Option<String>,
                description: Option<String>,
                due_date: Option<String>,
                tags: Option<Vec<String>>,
            }
            let task_id = require_task_id(&data)?;
            let raw: RawUpdates = match data.get("updates") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| TaskError::Oracle(e.to_string()))?,
                None => RawUpdates::default(),
            };
            let updates = TaskUpdates {
                title: raw.title,
                description: raw.description,
                due_date: raw
                    .due_date
                    .as_deref()
                    .and_then(|s| dates::parse_date_str(s, today)),
                tags: raw.tags.map(tags::sanitize_tags),
            };
            Ok(Command::UpdateTask { task_id, updates })
        }
        "toggle_complete" => Ok(Command::ToggleComplete {
            task_id: require_task_id(&data)?,
        }),
        "delete_task" => Ok(Command::DeleteTask {
            task_id: require_task_id(&data)?,
        }),
        other => Err(TaskError::UnsupportedAction(other.to_string())),
    }
}

fn require_task_id(data: &Value) -> TaskResult<u64> {
    data.get("task_id")
        .and_then(Value::as_u64)
        .ok_or_else(|| TaskError::Validation("task_id is required".to_string()))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
