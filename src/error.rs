//! Fatal reconciliation errors.
//!
//! Recoverable problems (a log row that does not fit its trigger, or a
//! sample drift beyond tolerance) are never errors: they end up as
//! [`MismatchRecord`](crate::events::MismatchRecord)s in the error table.
//! Everything in [`ReconcileError`] aborts the whole pass.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconcileError {
    /// The trigger stream contains a code outside the known alphabet.
    #[error("log row {index}: unknown trigger value {code}")]
    UnknownTriggerCode { index: usize, code: i64 },

    /// A payload that claims a grammar (digit prefix, `FIX`, `QUESTION`)
    /// but does not follow it.
    #[error("log row {index}: value '{payload}' is not matched (should be of the format {expected})")]
    MalformedPayload {
        index: usize,
        payload: String,
        expected: &'static str,
    },

    /// A numeric column holds something that is not a number.
    #[error("log row {index}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        index: usize,
        column: &'static str,
        value: String,
    },

    /// There is a log row to match but the trigger stream is empty.
    #[error("trigger stream is empty, cannot match log row {index}")]
    NoTriggerEvents { index: usize },

    /// Trigger stream is not sorted ascending by sample.
    #[error("trigger stream is not sorted by sample at position {position} ({previous} > {sample})")]
    UnsortedEvents {
        position: usize,
        previous: i64,
        sample: i64,
    },

    #[error("tolerance must be >= 0, got {0}")]
    NegativeTolerance(i64),
}
