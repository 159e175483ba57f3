//! Trigger decoding from a stimulus channel.
//!
//! Matches `mne.find_events(raw, consecutive='increasing')` for a single
//! stim channel: an event is emitted at every sample where the channel steps
//! **up** to a non-zero value. Steps back down (including returns to zero)
//! are offsets and are not reported.
//!
//! `stim`: [T]  →  `Vec<RawEvent>` with `sample = first_samp + t`
use ndarray::ArrayView1;

use crate::events::RawEvent;

/// Decode trigger onsets from `stim`.
///
/// Channel values are rounded to the nearest integer before comparison, so
/// float noise in a stored stim channel does not create spurious steps.
/// The first sample is never an onset (there is no preceding value).
pub fn find_events(stim: ArrayView1<'_, f64>, first_samp: i64) -> Vec<RawEvent> {
    let mut out = Vec::new();
    let mut prev: Option<i64> = None;
    for (t, &v) in stim.iter().enumerate() {
        let code = v.round() as i64;
        if let Some(p) = prev {
            if code != 0 && code > p {
                out.push(RawEvent::new(first_samp + t as i64, code));
            }
        }
        prev = Some(code);
    }
    out
}
