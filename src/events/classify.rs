//! Trigger-code dispatch.
//!
//! Every code maps to a fixed list of matchers. A matcher looks at one log
//! row and either claims it (event or deliberate drop) or passes. Matchers
//! are tried in order and the first claim wins; if nobody claims the row it
//! is a [`Classification::NoMatch`].
//!
//! Codes 1–3 are shared between word onsets and button presses, so they get
//! two independent matchers: word first, then response.
use super::payload::{parse_duration, parse_fixation, parse_question, parse_word};
use super::trigger::TriggerCode;
use super::{CanonicalEvent, EventType, LogRow, END_TOKEN, NO_VALUE};
use crate::error::ReconcileError;

pub const PICTURE: &str = "Picture";
pub const RESPONSE: &str = "Response";
pub const DIGITAL_INPUT: &str = "UDIO001";

/// Result of classifying one log row against its trigger code.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Event(CanonicalEvent),
    /// Row is expected noise for this code; neither event nor error.
    Dropped,
    NoMatch,
}

type Matcher = fn(&LogRow, &str, TriggerCode) -> Result<Classification, ReconcileError>;

const WORD_OR_RESPONSE: &[Matcher] = &[match_word, match_digit_response];
const WORD: &[Matcher] = &[match_word];
const BLOCK: &[Matcher] = &[match_block];
const ISI: &[Matcher] = &[match_isi];
const FIXATION: &[Matcher] = &[match_fixation];
const PAUSE: &[Matcher] = &[match_pause];
const QUESTION: &[Matcher] = &[match_question];
const RESPONSE_ONE: &[Matcher] = &[match_response_one];
const RESPONSE_TWO: &[Matcher] = &[match_response_two];
const DIGITAL: &[Matcher] = &[match_digital_input];

/// Matchers registered for `code`, in the order they are tried.
fn matchers(code: TriggerCode) -> &'static [Matcher] {
    match code {
        TriggerCode::Word(1..=3) => WORD_OR_RESPONSE,
        TriggerCode::Word(_) => WORD,
        TriggerCode::Block => BLOCK,
        TriggerCode::Isi => ISI,
        TriggerCode::Fixation => FIXATION,
        TriggerCode::Pause => PAUSE,
        TriggerCode::Question => QUESTION,
        TriggerCode::ResponseOne => RESPONSE_ONE,
        TriggerCode::ResponseTwo => RESPONSE_TWO,
        TriggerCode::DigitalInput => DIGITAL,
    }
}

/// Classify `row` against the trigger `code` it was matched to.
///
/// # Errors
///
/// * [`ReconcileError::UnknownTriggerCode`] if `code` is outside the alphabet.
/// * [`ReconcileError::MalformedPayload`] if the payload starts like a
///   grammar (word digit, `FIX`, `QUESTION`) but does not follow it.
pub fn classify(row: &LogRow, code: i64) -> Result<Classification, ReconcileError> {
    let tc = TriggerCode::resolve(code, row.index)?;
    let Some(payload) = row.payload.as_deref() else {
        return Ok(Classification::NoMatch);
    };
    for matcher in matchers(tc) {
        match matcher(row, payload, tc)? {
            Classification::NoMatch => continue,
            claimed => return Ok(claimed),
        }
    }
    Ok(Classification::NoMatch)
}

fn starts_with_digit(payload: &str, tc: TriggerCode) -> bool {
    match tc.leading_digit() {
        Some(d) => payload.starts_with(d),
        None => false,
    }
}

fn event(ev: CanonicalEvent) -> Result<Classification, ReconcileError> {
    Ok(Classification::Event(ev))
}

// ── Word / response ───────────────────────────────────────────────────────

fn match_word(row: &LogRow, payload: &str, tc: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind != PICTURE || !starts_with_digit(payload, tc) {
        return Ok(Classification::NoMatch);
    }
    let word = parse_word(payload).ok_or_else(|| ReconcileError::MalformedPayload {
        index: row.index,
        payload: payload.to_string(),
        expected: "digit word duration",
    })?;
    let duration = parse_duration(word.duration, row.index)?;
    let value = word.token.unwrap_or(END_TOKEN);
    event(CanonicalEvent::with_condition(row, duration, EventType::Word, value, tc.condition()))
}

fn match_digit_response(
    row: &LogRow,
    payload: &str,
    tc: TriggerCode,
) -> Result<Classification, ReconcileError> {
    if row.kind != RESPONSE || !starts_with_digit(payload, tc) {
        return Ok(Classification::NoMatch);
    }
    let value = tc.code().to_string();
    event(CanonicalEvent::plain(row, row.duration, EventType::Response, &value))
}

fn match_response_one(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    match_exact_response(row, payload, "1")
}

fn match_response_two(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    match_exact_response(row, payload, "2")
}

fn match_exact_response(row: &LogRow, payload: &str, button: &str) -> Result<Classification, ReconcileError> {
    if row.kind == RESPONSE && payload == button {
        event(CanonicalEvent::plain(row, row.duration, EventType::Response, button))
    } else {
        Ok(Classification::NoMatch)
    }
}

// ── Presentation markers ──────────────────────────────────────────────────

fn match_block(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind == PICTURE && matches!(payload, "WOORDEN" | "ZINNEN") {
        event(CanonicalEvent::plain(row, row.duration, EventType::Block, payload))
    } else {
        Ok(Classification::NoMatch)
    }
}

fn match_isi(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind == PICTURE && payload == "ISI" {
        event(CanonicalEvent::plain(row, row.duration, EventType::Isi, NO_VALUE))
    } else {
        Ok(Classification::NoMatch)
    }
}

fn match_pause(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind == PICTURE && payload == "pause" {
        event(CanonicalEvent::plain(row, row.duration, EventType::Pause, NO_VALUE))
    } else {
        Ok(Classification::NoMatch)
    }
}

fn match_fixation(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind != PICTURE || !payload.starts_with("FIX") {
        return Ok(Classification::NoMatch);
    }
    let digits = parse_fixation(payload).ok_or_else(|| ReconcileError::MalformedPayload {
        index: row.index,
        payload: payload.to_string(),
        expected: "FIX duration",
    })?;
    let duration = parse_duration(digits, row.index)?;
    event(CanonicalEvent::plain(row, duration, EventType::Fixation, NO_VALUE))
}

fn match_question(row: &LogRow, payload: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind != PICTURE || !payload.starts_with("QUESTION") {
        return Ok(Classification::NoMatch);
    }
    let code = parse_question(payload).ok_or_else(|| ReconcileError::MalformedPayload {
        index: row.index,
        payload: payload.to_string(),
        expected: "QUESTION code",
    })?;
    event(CanonicalEvent::plain(row, row.duration, EventType::Question, code))
}

fn match_digital_input(row: &LogRow, _: &str, _: TriggerCode) -> Result<Classification, ReconcileError> {
    if row.kind == DIGITAL_INPUT {
        Ok(Classification::Dropped)
    } else {
        Ok(Classification::NoMatch)
    }
}
