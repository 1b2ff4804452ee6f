//! Metrics collection for reconciliation passes

/// Counters collected across reconciliation passes.
///
/// A single pass fills the record/artifact counters; a caller running
/// many passes (the background worker, the CLI) merges per-pass metrics
/// and tracks pass outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileMetrics {
    /// Metadata records applied (non-blank origin, broadcast attempted)
    pub records_applied: usize,

    /// Metadata records skipped for a blank origin coordinate
    pub records_skipped: usize,

    /// Individual artifacts annotated across all broadcasts
    pub artifacts_annotated: usize,

    /// Passes that completed successfully
    pub passes_succeeded: usize,

    /// Passes that ended in FAILURE
    pub passes_failed: usize,

    /// Passes skipped because the repository was not PENDING
    pub passes_skipped: usize,
}

impl ReconcileMetrics {
    /// Create empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one applied metadata record and how many artifacts it reached.
    pub fn record_applied(&mut self, artifacts: usize) {
        self.records_applied += 1;
        self.artifacts_annotated += artifacts;
    }

    /// Record one record skipped for a blank origin.
    pub fn record_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Fold another metrics value into this one.
    pub fn merge(&mut self, other: ReconcileMetrics) {
        self.records_applied += other.records_applied;
        self.records_skipped += other.records_skipped;
        self.artifacts_annotated += other.artifacts_annotated;
        self.passes_succeeded += other.passes_succeeded;
        self.passes_failed += other.passes_failed;
        self.passes_skipped += other.passes_skipped;
    }

    /// Total passes observed, whatever their outcome.
    pub fn total_passes(&self) -> usize {
        self.passes_succeeded + self.passes_failed + self.passes_skipped
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report.
    pub fn summary(&self) -> String {
        [
            "Reconciliation Metrics Summary".to_string(),
            "==============================".to_string(),
            format!(
                "Passes: {} succeeded, {} failed, {} skipped",
                self.passes_succeeded, self.passes_failed, self.passes_skipped
            ),
            format!(
                "Records: {} applied, {} skipped (blank origin)",
                self.records_applied, self.records_skipped
            ),
            format!("Artifacts annotated: {}", self.artifacts_annotated),
        ]
        .join("\n")
    }
}
