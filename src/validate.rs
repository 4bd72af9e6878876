//! Field constraint enforcement for task records.
//!
//! The store calls these before every mutation, so commands cannot bypass
//! the limits regardless of where they came from.

use crate::error::{TaskError, TaskResult};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// Maximum description length in characters. Longer input is truncated, not
/// rejected.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validate a task title: required, non-whitespace, at most 200 characters.
pub fn validate_title(title: &str) -> TaskResult<()> {
    if title.is_empty() {
        return Err(TaskError::Validation("Title cannot be empty".to_string()));
    }
    if title.trim().is_empty() {
        return Err(TaskError::Validation(
            "Title cannot be only whitespace".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::Validation(format!(
            "Title is too long (max {TITLE_MAX_CHARS} characters)"
        )));
    }
    Ok(())
}

/// Clamp a description to the field limit.
///
/// Returns the clamped text and whether truncation happened, so callers can
/// surface a non-fatal notice.
pub fn clamp_description(description: &str) -> (String, bool) {
    if description.chars().count() <= DESCRIPTION_MAX_CHARS {
        (description.to_string(), false)
    } else {
        (
            description.chars().take(DESCRIPTION_MAX_CHARS).collect(),
            true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_title() {
        assert!(validate_title("").is_err());
    }

    #[test]
    fn rejects_whitespace_only_title() {
        assert!(validate_title("   \t ").is_err());
    }

    #[test]
    fn rejects_title_over_200_chars() {
        let long = "a".repeat(201);
        assert!(validate_title(&long).is_err());
    }

    #[test]
    fn accepts_title_at_limit() {
        let exact = "a".repeat(200);
        assert!(validate_title(&exact).is_ok());
    }

    #[test]
    fn clamps_description_at_1000_chars() {
        let long = "x".repeat(1001);
        let (clamped, truncated) = clamp_description(&long);
        assert!(truncated);
        assert_eq!(clamped.chars().count(), 1000);
    }

    #[test]
    fn leaves_short_description_alone() {
        let (clamped, truncated) = clamp_description("short");
        assert!(!truncated);
        assert_eq!(clamped, "short");
    }

    #[test]
    fn clamp_counts_characters_not_bytes() {
        let long: String = "é".repeat(1001);
        let (clamped, truncated) = clamp_description(&long);
        assert!(truncated);
        assert_eq!(clamped.chars().count(), 1000);
    }
}
