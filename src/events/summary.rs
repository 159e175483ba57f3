//! Per-run bookkeeping for data-quality reports.
use std::collections::BTreeMap;
use std::fmt;

use super::EventType;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Log rows seen.
    pub rows: usize,
    /// Rows skipped before matching (no payload, housekeeping kind, blank).
    pub skipped: usize,
    /// Events emitted, per type.
    pub events: BTreeMap<EventType, usize>,
    /// Rows silently dropped by their classifier (`UDIO001` echoes).
    pub dropped: usize,
    /// Classification failures.
    pub unclassified: usize,
    /// `sample_diff` records emitted.
    pub drift: usize,
    /// Drifting rows whose drift record gave way to a classification failure.
    pub drift_superseded: usize,
}

impl ReconcileSummary {
    pub fn n_events(&self) -> usize {
        self.events.values().sum()
    }

    /// Rows that reached the classifier.
    pub fn n_classified(&self) -> usize {
        self.n_events() + self.dropped + self.unclassified
    }

    pub(crate) fn record_event(&mut self, kind: EventType) {
        *self.events.entry(kind).or_insert(0) += 1;
    }
}

impl fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} events, {} unclassified, {} dropped, {} skipped, {} sample_diff",
            self.rows,
            self.n_events(),
            self.unclassified,
            self.dropped,
            self.skipped,
            self.drift,
        )?;
        for (kind, n) in &self.events {
            write!(f, "\n  {kind:<9} {n}")?;
        }
        Ok(())
    }
}
