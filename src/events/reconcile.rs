//! The reconciliation pass: presentation log × trigger stream → two tables.
//!
//! # Algorithm
//! For every log row, in log order:
//! 1. Skip rows without a payload, housekeeping kinds and blank screens.
//! 2. Match the nearest trigger by sample ([`nearest`]).
//! 3. Note a `sample_diff` finding if the match is more than `tolerance` away.
//! 4. Classify the row against the trigger code ([`classify`]).
//! 5. Event → events table. No match → one `Unclassified` record, which
//!    supersedes the drift finding of the same row. Drift findings of rows
//!    that classified (or were dropped) go to the error table as-is.
//!
//! Output is accumulated locally and only returned once every row has been
//! processed; a fatal error yields no tables at all.
use tracing::{debug, info, warn};

use super::classify::{classify, Classification};
use super::matcher::{check_sorted, nearest};
use super::summary::ReconcileSummary;
use super::{CanonicalEvent, ErrorRow, LogRow, MismatchRecord, RawEvent};
use crate::config::ReconcileConfig;
use crate::error::ReconcileError;

/// Output of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub events: Vec<CanonicalEvent>,
    pub errors: Vec<MismatchRecord>,
    pub summary: ReconcileSummary,
}

impl Reconciliation {
    pub fn drift_records(&self) -> impl Iterator<Item = &MismatchRecord> {
        self.errors.iter().filter(|r| r.is_drift())
    }

    pub fn failures(&self) -> impl Iterator<Item = &MismatchRecord> {
        self.errors.iter().filter(|r| !r.is_drift())
    }

    /// Errors in the flat table layout.
    pub fn error_rows(&self) -> Vec<ErrorRow> {
        self.errors.iter().map(MismatchRecord::to_row).collect()
    }
}

/// Reconcile with the default configuration and the given `tolerance`.
///
/// # Examples
///
/// ```
/// use mous::events::{reconcile, LogRow, RawEvent, EventType};
///
/// let triggers = vec![RawEvent::new(1000, 10), RawEvent::new(1500, 5)];
/// let log = vec![
///     LogRow::new(0, 1000, 1.0, 0.0, "Picture", Some("ZINNEN")),
///     LogRow::new(1, 1501, 1.5, 0.0, "Picture", Some("5 gemene 300")),
/// ];
/// let out = reconcile(&triggers, &log, 2).unwrap();
/// assert_eq!(out.events[0].kind, EventType::Block);
/// assert_eq!(out.events[1].value, "gemene");
/// assert!(out.errors.is_empty());
/// ```
pub fn reconcile(
    raw_events: &[RawEvent],
    log: &[LogRow],
    tolerance: i64,
) -> Result<Reconciliation, ReconcileError> {
    reconcile_with_config(raw_events, log, &ReconcileConfig::with_tolerance(tolerance))
}

/// Reconcile `log` against `raw_events` under `cfg`.
///
/// # Errors
///
/// * [`ReconcileError::NegativeTolerance`] if `cfg.tolerance < 0`.
/// * [`ReconcileError::UnsortedEvents`] if the trigger stream is not sorted.
/// * [`ReconcileError::NoTriggerEvents`] if a row needs a match but there
///   are no triggers.
/// * [`ReconcileError::UnknownTriggerCode`] / [`ReconcileError::MalformedPayload`]
///   from classification.
pub fn reconcile_with_config(
    raw_events: &[RawEvent],
    log: &[LogRow],
    cfg: &ReconcileConfig,
) -> Result<Reconciliation, ReconcileError> {
    if cfg.tolerance < 0 {
        return Err(ReconcileError::NegativeTolerance(cfg.tolerance));
    }
    check_sorted(raw_events)?;

    let mut events = Vec::new();
    let mut errors = Vec::new();
    let mut summary = ReconcileSummary::default();

    for row in log {
        summary.rows += 1;

        let payload = match row.payload.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => {
                summary.skipped += 1;
                continue;
            }
        };
        if cfg.is_ignored_kind(&row.kind) || payload == cfg.blank_marker {
            summary.skipped += 1;
            continue;
        }

        let m = nearest(raw_events, row.sample)
            .ok_or(ReconcileError::NoTriggerEvents { index: row.index })?;

        let drift = (m.diff > cfg.tolerance).then(|| MismatchRecord::SampleDrift {
            index: row.index,
            sample: row.sample,
            onset: row.onset,
            diff: m.diff,
        });

        match classify(row, m.event.code)? {
            Classification::Event(ev) => {
                if let Some(d) = drift {
                    debug!(index = row.index, sample = row.sample, diff = m.diff, "sample drift");
                    summary.drift += 1;
                    errors.push(d);
                }
                summary.record_event(ev.kind);
                events.push(ev);
            }
            Classification::Dropped => {
                if let Some(d) = drift {
                    debug!(index = row.index, sample = row.sample, diff = m.diff, "sample drift");
                    summary.drift += 1;
                    errors.push(d);
                }
                summary.dropped += 1;
            }
            Classification::NoMatch => {
                debug!(
                    index = row.index,
                    kind = %row.kind,
                    payload,
                    code = m.event.code,
                    "log row does not match trigger"
                );
                if drift.is_some() {
                    summary.drift_superseded += 1;
                }
                summary.unclassified += 1;
                errors.push(MismatchRecord::Unclassified {
                    index: row.index,
                    sample: row.sample,
                    onset: row.onset,
                    kind: row.kind.clone(),
                    payload: payload.to_string(),
                    code: m.event.code,
                });
            }
        }
    }

    if summary.drift > 0 {
        warn!(count = summary.drift, tolerance = cfg.tolerance, "log rows drift from their triggers");
    }
    info!(
        rows = summary.rows,
        events = summary.n_events(),
        unclassified = summary.unclassified,
        "reconciliation done"
    );

    Ok(Reconciliation { events, errors, summary })
}
