//! # mous — trigger/log event reconciliation for the MOUS dataset
//!
//! The *Mother of Unification Study* (MOUS) MEG recordings come with two
//! records of what happened on screen:
//!
//! * the **trigger stream** decoded from the stim channel
//!   (`mne.find_events` → `(sample, code)`), and
//! * the **presentation log** (`sub-*_task-visual_events.tsv`) written by
//!   the stimulus software.
//!
//! Neither is complete on its own: trigger codes are overloaded and carry no
//! word identity, while the log mixes real stimuli with housekeeping lines
//! and encodes everything in free text. `mous` merges the two into a single
//! typed event table and a table of everything that did not line up.
//!
//! ## Pipeline overview
//!
//! ```text
//! visual_events.safetensors / .eve      sub-*_events.tsv
//!   │                                     │
//!   ├─ io::read_trigger_events()          ├─ io::read_log_tsv()
//!   │    (stim::find_events for raw stim) │
//!   └──────────────┬──────────────────────┘
//!                  ├─ events::reconcile()   nearest trigger → classify → tables
//!                  │
//!                  ├─→ events table   sample onset duration type value
//!                  │                  sentence relative_clause target
//!                  └─→ error table    index onset sample type value trigger_value
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use mous::{reconcile_files, ReconcileConfig};
//! use std::path::Path;
//!
//! let out = reconcile_files(
//!     Path::new("data/visual_events.eve"),
//!     Path::new("data/sub-V1001_task-visual_events.tsv"),
//!     &ReconcileConfig::default(),
//! ).unwrap();
//!
//! println!("{}", out.summary);
//! for ev in out.events.iter().take(5) {
//!     println!("{} {} {}", ev.sample, ev.kind, ev.value);
//! }
//! ```
//!
//! ## In-memory use
//!
//! ```
//! use mous::events::{reconcile, LogRow, RawEvent};
//!
//! let triggers = [RawEvent::new(2400, 20)];
//! let log = [LogRow::new(0, 2401, 2.0, f64::NAN, "Picture", Some("FIX 3948"))];
//!
//! let out = reconcile(&triggers, &log, 2).unwrap();
//! assert_eq!(out.events[0].value, "NA");
//! assert_eq!(out.events[0].duration, 3948.0);
//! ```
//!
//! ## Diagnostics
//!
//! The library never prints. Mismatches are returned as data and also
//! reported through [`tracing`] (`debug` per row, `info`/`warn` per run);
//! install whichever subscriber you like.

pub mod config;
pub mod error;
pub mod events;
pub mod io;
pub mod stim;

use anyhow::{Context, Result};
use std::path::Path;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use config::ReconcileConfig;
pub use error::ReconcileError;

pub use events::{
    classify, nearest, reconcile, reconcile_with_config,
    CanonicalEvent, Classification, Condition, ErrorRow, EventType, LogRow, Match,
    MismatchRecord, RawEvent, ReconcileSummary, Reconciliation, TriggerCode,
};

pub use io::{
    read_log, read_log_tsv, read_trigger_events, write_errors_tsv, write_events_tsv,
};

pub use stim::find_events;

/// Load both inputs from disk and reconcile them.
///
/// `events_path` is read with [`io::read_trigger_events`] (text event file
/// or safetensors), `log_path` with [`io::read_log_tsv`].
///
/// # Errors
///
/// Any I/O or parse failure of either file, or a fatal
/// [`ReconcileError`] from the reconciliation pass.
pub fn reconcile_files(
    events_path: &Path,
    log_path: &Path,
    cfg: &ReconcileConfig,
) -> Result<Reconciliation> {
    let triggers = io::read_trigger_events(events_path)?;
    tracing::debug!(n = triggers.len(), path = %events_path.display(), "loaded trigger stream");
    let log = io::read_log_tsv(log_path)?;
    tracing::debug!(n = log.len(), path = %log_path.display(), "loaded presentation log");

    reconcile_with_config(&triggers, &log, cfg)
        .with_context(|| format!("reconciling {}", log_path.display()))
}
