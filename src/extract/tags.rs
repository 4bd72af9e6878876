//! `#tag` token grammar.
//!
//! A tag is a whitespace-separated token of `#` followed by alphanumerics.
//! The `#` is stripped in the output; case and order are preserved and
//! duplicates are kept. A bare `#` or glued tags like `#a#b` are ignored.

use regex_lite::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([A-Za-z0-9]+)$").unwrap())
}

/// Extract tags from `text`, returning them alongside the remaining text
/// with tag tokens removed (whitespace normalized to single spaces).
pub fn extract_tags(text: &str) -> (Vec<String>, String) {
    let mut tags = Vec::new();
    let mut rest = Vec::new();
    for token in text.split_whitespace() {
        if let Some(caps) = tag_re().captures(token) {
            tags.push(caps[1].to_string());
        } else {
            rest.push(token);
        }
    }
    (tags, rest.join(" "))
}

/// Filter oracle-provided tag strings through the same charset rule,
/// tolerating a leading `#`.
pub fn sanitize_tags(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|t| t.strip_prefix('#').map(String::from).unwrap_or(t))
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_alphanumeric()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tags_preserving_case_and_order() {
        let (tags, rest) = extract_tags("finish report #work #Urgent");
        assert_eq!(tags, vec!["work", "Urgent"]);
        assert_eq!(rest, "finish report");
    }

    #[test]
    fn bare_hash_ignored() {
        let (tags, rest) = extract_tags("do thing #");
        assert!(tags.is_empty());
        assert_eq!(rest, "do thing #");
    }

    #[test]
    fn glued_tags_ignored() {
        let (tags, _) = extract_tags("stuff #a#b");
        assert!(tags.is_empty());
    }

    #[test]
    fn duplicates_kept() {
        let (tags, _) = extract_tags("#work #work");
        assert_eq!(tags, vec!["work", "work"]);
    }

    #[test]
    fn no_tags_yields_empty() {
        let (tags, rest) = extract_tags("plain text");
        assert!(tags.is_empty());
        assert_eq!(rest, "plain text");
    }

    #[test]
    fn sanitize_drops_bad_tokens() {
        let cleaned = sanitize_tags(vec![
            "#work".to_string(),
            "Urgent".to_string(),
            "".to_string(),
            "a#b".to_string(),
            "has space".to_string(),
        ]);
        assert_eq!(cleaned, vec!["work", "Urgent"]);
    }
}
