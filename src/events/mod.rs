//! MOUS event reconciliation.
//!
//! Two views of the same experiment timeline have to be merged:
//!
//! ```text
//! trigger stream   (sample, code)                      ← hardware pulses
//! presentation log (sample, onset, duration, type, value) ← stimulus software
//!        │
//!        ├─ matcher::nearest        closest trigger for each log row
//!        ├─ classify::classify      code → {block, fixation, ISI, pause,
//!        │                                   question, response, word}
//!        └─ reconcile::reconcile    events table + error table
//! ```
//!
//! # Output format
//!
//! | column            | type   | meaning                                            |
//! |-------------------|--------|----------------------------------------------------|
//! | `sample`          | int    | original sample index (from the log)               |
//! | `onset`           | float  | onset in seconds                                   |
//! | `duration`        | float  | log duration (s) or intended duration from payload |
//! | `type`            | str    | `block` `fixation` `ISI` `pause` `question` `response` `word` |
//! | `value`           | str    | see [`EventType::accepts`]                         |
//! | `sentence`        | bool   | sentence (true) or word list (false)               |
//! | `relative_clause` | bool   | contains a relative clause                         |
//! | `target`          | bool   | target word                                        |
pub mod classify;
pub mod matcher;
pub mod payload;
pub mod reconcile;
pub mod summary;
pub mod trigger;

use serde::Serialize;
use std::fmt;

pub use classify::{classify, Classification};
pub use matcher::{nearest, Match};
pub use reconcile::{reconcile, reconcile_with_config, Reconciliation};
pub use summary::ReconcileSummary;
pub use trigger::{Condition, TriggerCode};

/// Sentinel word value for the sentence-final trigger (no word token).
pub const END_TOKEN: &str = "<END>";

/// Value used for event types that carry no value.
pub const NO_VALUE: &str = "NA";

// ── Inputs ────────────────────────────────────────────────────────────────

/// One decoded trigger pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub sample: i64,
    pub code: i64,
}

impl RawEvent {
    pub fn new(sample: i64, code: i64) -> Self {
        Self { sample, code }
    }
}

/// One row of the presentation log (`*_events.tsv`).
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow {
    /// 0-based row position in the log table.
    pub index: usize,
    pub sample: i64,
    /// Seconds.
    pub onset: f64,
    /// Seconds; NaN when the log leaves it empty.
    pub duration: f64,
    /// The log's `type` column (`Picture`, `Response`, `UDIO001`, …).
    pub kind: String,
    /// The log's `value` column; `None` when missing.
    pub payload: Option<String>,
}

impl LogRow {
    pub fn new(
        index: usize,
        sample: i64,
        onset: f64,
        duration: f64,
        kind: &str,
        payload: Option<&str>,
    ) -> Self {
        Self {
            index,
            sample,
            onset,
            duration,
            kind: kind.to_string(),
            payload: payload.map(str::to_string),
        }
    }
}

// ── Outputs ───────────────────────────────────────────────────────────────

/// Semantic event type of a [`CanonicalEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventType {
    #[serde(rename = "block")]
    Block,
    #[serde(rename = "fixation")]
    Fixation,
    #[serde(rename = "ISI")]
    Isi,
    #[serde(rename = "pause")]
    Pause,
    #[serde(rename = "question")]
    Question,
    #[serde(rename = "response")]
    Response,
    #[serde(rename = "word")]
    Word,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Block,
        EventType::Fixation,
        EventType::Isi,
        EventType::Pause,
        EventType::Question,
        EventType::Response,
        EventType::Word,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Fixation => "fixation",
            Self::Isi => "ISI",
            Self::Pause => "pause",
            Self::Question => "question",
            Self::Response => "response",
            Self::Word => "word",
        }
    }

    /// Whether `value` lies in the domain this type allows.
    ///
    /// * `block`                    → `WOORDEN` / `ZINNEN`
    /// * `fixation`, `ISI`, `pause` → `NA`
    /// * `question`                 → presentation code (digits)
    /// * `response`                 → `1` / `2` / `3`
    /// * `word`                     → a token of `[\w.']` characters, or `<END>`
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Block => matches!(value, "WOORDEN" | "ZINNEN"),
            Self::Fixation | Self::Isi | Self::Pause => value == NO_VALUE,
            Self::Question => !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()),
            Self::Response => matches!(value, "1" | "2" | "3"),
            Self::Word => {
                value == END_TOKEN || payload::is_token(value)
            }
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the reconciled events table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEvent {
    pub sample: i64,
    pub onset: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub value: String,
    pub sentence: bool,
    pub relative_clause: bool,
    pub target: bool,
}

impl CanonicalEvent {
    /// Event at `row`'s position with no condition flags set.
    pub(crate) fn plain(row: &LogRow, duration: f64, kind: EventType, value: &str) -> Self {
        Self::with_condition(row, duration, kind, value, Condition::NONE)
    }

    pub(crate) fn with_condition(
        row: &LogRow,
        duration: f64,
        kind: EventType,
        value: &str,
        cond: Condition,
    ) -> Self {
        Self {
            sample: row.sample,
            onset: row.onset,
            duration,
            kind,
            value: value.to_string(),
            sentence: cond.sentence,
            relative_clause: cond.relative_clause,
            target: cond.target,
        }
    }
}

/// A recoverable finding about one log row.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchRecord {
    /// Nearest trigger is more than `tolerance` samples away.
    SampleDrift {
        index: usize,
        sample: i64,
        onset: f64,
        diff: i64,
    },
    /// The row does not fit the trigger code it was matched to.
    Unclassified {
        index: usize,
        sample: i64,
        onset: f64,
        kind: String,
        payload: String,
        code: i64,
    },
}

impl MismatchRecord {
    pub fn index(&self) -> usize {
        match self {
            Self::SampleDrift { index, .. } | Self::Unclassified { index, .. } => *index,
        }
    }

    pub fn is_drift(&self) -> bool {
        matches!(self, Self::SampleDrift { .. })
    }

    /// Flatten into the shared error-table schema.
    pub fn to_row(&self) -> ErrorRow {
        match self {
            Self::SampleDrift { index, sample, onset, diff } => ErrorRow {
                index: *index,
                onset: *onset,
                sample: *sample,
                kind: "sample_diff".to_string(),
                value: diff.to_string(),
                trigger_value: None,
            },
            Self::Unclassified { index, sample, onset, kind, payload, code } => ErrorRow {
                index: *index,
                onset: *onset,
                sample: *sample,
                kind: kind.clone(),
                value: payload.clone(),
                trigger_value: Some(*code),
            },
        }
    }
}

/// One row of the error table: `index, onset, sample, type, value, trigger_value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRow {
    pub index: usize,
    pub onset: f64,
    pub sample: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub trigger_value: Option<i64>,
}
