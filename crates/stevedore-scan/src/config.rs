//! Configuration for the scan module

use serde::{Deserialize, Serialize};

use crate::time::DEFAULT_PATTERN;
use crate::{EligibilityPolicy, TimestampFormat};

/// Configuration for locating scan candidates.
///
/// # Examples
///
/// ```
/// use stevedore_scan::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.repos.is_empty());
/// assert_eq!(config.name_patterns, vec!["*".to_string()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Repository keys to consider for scanning.
    /// Empty means nothing is scanned (deliberate; scanning is opt-in).
    #[serde(default)]
    pub repos: Vec<String>,

    /// Artifact file-name patterns to scan, OR-ed together.
    /// Default: every artifact (`*`).
    #[serde(default = "default_name_patterns")]
    pub name_patterns: Vec<String>,

    /// Artifacts last modified before this timestamp are never scanned.
    /// Interpreted against `date_time_pattern`; an unparsable value is
    /// treated as no cutoff.
    #[serde(default)]
    pub artifact_cutoff_date: Option<String>,

    /// chrono pattern for the cutoff and the persisted scan-time property.
    #[serde(default = "default_date_time_pattern")]
    pub date_time_pattern: String,
}

fn default_name_patterns() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_date_time_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            name_patterns: default_name_patterns(),
            artifact_cutoff_date: None,
            date_time_pattern: default_date_time_pattern(),
        }
    }
}

impl ScanConfig {
    /// The timestamp format both the cutoff and scan-time properties use.
    pub fn timestamp_format(&self) -> TimestampFormat {
        TimestampFormat::new(self.date_time_pattern.clone())
    }

    /// The eligibility policy derived from this configuration.
    pub fn eligibility_policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::new(self.timestamp_format(), self.artifact_cutoff_date.clone())
    }
}
