//! Nearest-neighbour search over the sorted trigger stream.
use super::RawEvent;
use crate::error::ReconcileError;

/// Trigger matched to a log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Position in the trigger stream.
    pub position: usize,
    pub event: RawEvent,
    /// `|event.sample - row.sample|`.
    pub diff: i64,
}

/// Find the trigger closest to `sample`.
///
/// `events` must be sorted ascending by sample. Ties resolve to the lowest
/// position, the same as a linear `argmin` over `|events.sample - sample|`.
/// Returns `None` only for an empty stream.
pub fn nearest(events: &[RawEvent], sample: i64) -> Option<Match> {
    if events.is_empty() {
        return None;
    }
    // First position with events[i].sample >= sample.
    let upper = events.partition_point(|e| e.sample < sample);

    let mut best = if upper < events.len() { upper } else { events.len() - 1 };
    if upper > 0 {
        let lower = upper - 1;
        let d_lower = events[lower].sample.abs_diff(sample);
        let d_best = events[best].sample.abs_diff(sample);
        if d_lower <= d_best {
            // Walk back over duplicates so the lowest position wins.
            let s = events[lower].sample;
            best = events[..=lower].partition_point(|e| e.sample < s);
        }
    }

    let event = events[best];
    // Saturates only when the nearest trigger is more than i64::MAX away.
    let diff = i64::try_from(event.sample.abs_diff(sample)).unwrap_or(i64::MAX);
    Some(Match { position: best, event, diff })
}

/// Verify the stream is sorted ascending by sample.
pub fn check_sorted(events: &[RawEvent]) -> Result<(), ReconcileError> {
    for (i, pair) in events.windows(2).enumerate() {
        if pair[1].sample < pair[0].sample {
            return Err(ReconcileError::UnsortedEvents {
                position: i + 1,
                previous: pair[0].sample,
                sample: pair[1].sample,
            });
        }
    }
    Ok(())
}
