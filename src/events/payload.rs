//! Payload grammars of the presentation log's `value` column.
//!
//! ```text
//! word      "5 300"          digit  duration          → <END>, 300
//!           "5 gemene 300"   digit  token  duration   → gemene, 300
//! fixation  "FIX 3948"       FIX duration
//! question  "QUESTION 341"   QUESTION code
//! ```
//!
//! All patterns are anchored at the start of the payload only; trailing text
//! is ignored and separators may be empty (`"5300"` reads as `<END>`, 300).
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ReconcileError;

/// Parsed word payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPayload<'a> {
    /// `None` for the sentence-final trigger.
    pub token: Option<&'a str>,
    /// Intended presentation time in ms, as written.
    pub duration: &'a str,
}

fn end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d\s*(\d+)\s*").unwrap())
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d\s*([\w.']+)\s*(\d+)\s*").unwrap())
}

fn fix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^FIX\s*(\d+)\s*").unwrap())
}

fn question_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^QUESTION\s*(\d+)\s*").unwrap())
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.']+$").unwrap())
}

/// Whole-string match of the word token class `[\w.']` used by [`parse_word`].
pub fn is_token(value: &str) -> bool {
    token_re().is_match(value)
}

/// Sentence-final form is tried first, then `digit token duration`.
pub fn parse_word(payload: &str) -> Option<WordPayload<'_>> {
    if let Some(caps) = end_re().captures(payload) {
        return Some(WordPayload { token: None, duration: caps.get(1)?.as_str() });
    }
    let caps = word_re().captures(payload)?;
    Some(WordPayload {
        token: Some(caps.get(1)?.as_str()),
        duration: caps.get(2)?.as_str(),
    })
}

/// Duration digits of a `FIX <duration>` payload.
pub fn parse_fixation(payload: &str) -> Option<&str> {
    fix_re().captures(payload).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Presentation code of a `QUESTION <code>` payload.
pub fn parse_question(payload: &str) -> Option<&str> {
    question_re().captures(payload).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Digits captured from a payload → `f64`.
pub fn parse_duration(digits: &str, index: usize) -> Result<f64, ReconcileError> {
    digits.parse::<f64>().map_err(|_| ReconcileError::InvalidNumber {
        index,
        column: "duration",
        value: digits.to_string(),
    })
}
