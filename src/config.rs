//! Reconciliation configuration.
//!
//! [`ReconcileConfig`] holds the tunables of the reconciliation pass. The
//! defaults reproduce the settings used for the MOUS visual task.

/// Log kinds that never have a trigger counterpart.
pub const DEFAULT_IGNORED_KINDS: [&str; 4] = ["trial", "frontpanel trigger", "UPPT001", "UPPT002"];

/// Configuration for [`reconcile_with_config`](crate::events::reconcile_with_config).
///
/// All fields are `pub`, so struct-update syntax works:
///
/// ```
/// use mous::ReconcileConfig;
///
/// let cfg = ReconcileConfig {
///     tolerance: 5,   // allow 5 samples of trigger/log drift
///     ..ReconcileConfig::default()
/// };
/// assert!(cfg.is_ignored_kind("UPPT001"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    /// Largest tolerated `|trigger.sample - log.sample|`, in samples.
    ///
    /// Rows further away than this still get classified, but also produce
    /// a `sample_diff` record in the error table.
    ///
    /// Default: `2`.
    pub tolerance: i64,

    /// Log `type` values skipped before matching (housekeeping lines).
    ///
    /// Default: `trial`, `frontpanel trigger`, `UPPT001`, `UPPT002`.
    pub ignored_kinds: Vec<String>,

    /// Payload marking an empty screen; such rows are skipped.
    ///
    /// Default: `"blank"`.
    pub blank_marker: String,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: 2,
            ignored_kinds: DEFAULT_IGNORED_KINDS.iter().map(|s| s.to_string()).collect(),
            blank_marker: "blank".to_string(),
        }
    }
}

impl ReconcileConfig {
    /// Default configuration with a different tolerance.
    pub fn with_tolerance(tolerance: i64) -> Self {
        Self { tolerance, ..Self::default() }
    }

    pub fn is_ignored_kind(&self, kind: &str) -> bool {
        self.ignored_kinds.iter().any(|k| k == kind)
    }
}
