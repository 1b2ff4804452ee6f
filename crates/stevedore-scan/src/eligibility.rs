//! The should-scan decision

use crate::TimestampFormat;

/// Pure decision: should an artifact be (re-)scanned now?
///
/// If the artifact's last-modified time is newer than the recorded scan
/// time, or there is no record of a scan, it should be scanned - unless a
/// cutoff is configured and the artifact was last modified before it.
///
/// Both timestamp texts are fail-open: an unparsable cutoff behaves as if
/// no cutoff were configured, and an unparsable recorded scan time (the
/// format may have changed since it was written) behaves as "never
/// scanned", so the rescan overwrites the stale value.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    format: TimestampFormat,
    cutoff: Option<String>,
}

impl EligibilityPolicy {
    /// Create a policy from a timestamp format and an optional cutoff text.
    pub fn new(format: TimestampFormat, cutoff: Option<String>) -> Self {
        Self { format, cutoff }
    }

    /// Decide whether an artifact should be scanned now.
    ///
    /// `last_modified` is the artifact's last-modified time in epoch
    /// milliseconds; `last_recorded_scan` is the persisted scan-time
    /// property text, if any. All inputs are injected; the decision does
    /// no I/O.
    pub fn should_scan(&self, last_modified: i64, last_recorded_scan: Option<&str>) -> bool {
        if let Some(cutoff_text) = &self.cutoff {
            match self.format.parse(cutoff_text) {
                Ok(cutoff) => {
                    if last_modified < cutoff {
                        tracing::warn!(
                            "artifact not scanned: cutoff is set and the artifact is too old"
                        );
                        return false;
                    }
                }
                Err(e) => {
                    // Fail open: a misconfigured cutoff must not freeze all scanning
                    tracing::error!("artifact cutoff is unusable, continuing without one: {}", e);
                }
            }
        }

        let Some(recorded) = last_recorded_scan else {
            return true;
        };

        match self.format.parse(recorded) {
            Ok(last_scan) => last_modified >= last_scan,
            Err(e) => {
                // Most likely the timestamp format changed since the property
                // was written; rescan and let the next write heal it
                tracing::error!("recorded scan time did not parse, rescanning: {}", e);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(cutoff: Option<&str>) -> EligibilityPolicy {
        EligibilityPolicy::new(TimestampFormat::default(), cutoff.map(str::to_string))
    }

    fn text(millis: i64) -> String {
        TimestampFormat::default().format(millis)
    }

    #[test]
    fn test_never_scanned_is_eligible() {
        assert!(policy(None).should_scan(100, None));
    }

    #[test]
    fn test_cutoff_blocks_older_artifacts() {
        let cutoff = text(50);
        assert!(policy(Some(&cutoff)).should_scan(100, None));
        assert!(!policy(Some(&cutoff)).should_scan(40, None));
    }

    #[test]
    fn test_cutoff_boundary_is_inclusive() {
        let cutoff = text(50);
        assert!(policy(Some(&cutoff)).should_scan(50, None));
    }

    #[test]
    fn test_unparsable_cutoff_fails_open() {
        assert!(policy(Some("not a timestamp")).should_scan(40, None));
    }

    #[test]
    fn test_modified_since_last_scan() {
        let last_scan = text(90);
        assert!(policy(None).should_scan(100, Some(&last_scan)));
        assert!(!policy(None).should_scan(80, Some(&last_scan)));
    }

    #[test]
    fn test_modified_at_last_scan_rescans() {
        let last_scan = text(90);
        assert!(policy(None).should_scan(90, Some(&last_scan)));
    }

    #[test]
    fn test_unparsable_last_scan_fails_open() {
        assert!(policy(None).should_scan(80, Some("2019-06-01 08:00")));
        let cutoff = text(50);
        assert!(policy(Some(&cutoff)).should_scan(80, Some("garbage")));
    }

    #[test]
    fn test_cutoff_wins_over_unparsable_last_scan() {
        // Rule order: the cutoff is checked before the scan record
        let cutoff = text(50);
        assert!(!policy(Some(&cutoff)).should_scan(40, Some("garbage")));
    }
}
