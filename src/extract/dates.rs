//! Calendar date grammar.
//!
//! Format precedence: ISO `YYYY-MM-DD`, then `Month DD [YYYY]`
//! (case-insensitive month name, current year when omitted), then slash
//! dates. A slash date where both components could be a month is read
//! day-first; month-first is tried only when the day-first reading is not a
//! real calendar date. Relative dates ("today", "tomorrow", weekday names)
//! are never parsed.

use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;
use std::sync::OnceLock;

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap())
}

fn month_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{1,2})(?:st|nd|rd|th)?,?(?:\s+(\d{4}))?\b",
        )
        .unwrap()
    })
}

fn slash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap())
}

/// A date extracted from free text: the parsed value plus the byte range of
/// the matched substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub start: usize,
    pub end: usize,
}

/// Find the first valid date in `text`. `today` supplies the default year
/// for month-name dates without one.
pub fn extract_date(text: &str, today: NaiveDate) -> Option<DateMatch> {
    for caps in iso_re().captures_iter(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            let m = caps.get(0).unwrap();
            return Some(DateMatch {
                date,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    for caps in month_name_re().captures_iter(text) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = match caps.get(3) {
            Some(y) => y.as_str().parse().ok()?,
            None => today.year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            let m = caps.get(0).unwrap();
            return Some(DateMatch {
                date,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    for caps in slash_re().captures_iter(text) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        // Day-first wins; month-first is the fallback for e.g. 12/25/2025.
        let date = NaiveDate::from_ymd_opt(year, second, first)
            .or_else(|| NaiveDate::from_ymd_opt(year, first, second));
        if let Some(date) = date {
            let m = caps.get(0).unwrap();
            return Some(DateMatch {
                date,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    None
}

/// Parse a standalone date string (oracle payloads, update values) under the
/// same grammar. Invalid strings become `None`, never errors.
pub fn parse_date_str(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    extract_date(s.trim(), today).map(|m| m.date)
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
