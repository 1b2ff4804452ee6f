//! Configuration for the inspection module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for reconciliation passes.
///
/// # Examples
///
/// ```
/// use stevedore_inspect::InspectConfig;
///
/// let config = InspectConfig::default();
/// assert_eq!(config.reconcile_interval_minutes, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Repository keys to reconcile.
    /// Empty means the worker has nothing to do.
    #[serde(default)]
    pub repos: Vec<String>,

    /// How often the background worker attempts a pass per repository
    /// (in minutes). Passes for repositories that are not PENDING are
    /// cheap no-ops, so a short interval is fine.
    #[serde(default = "default_reconcile_interval_minutes")]
    pub reconcile_interval_minutes: u64,
}

fn default_reconcile_interval_minutes() -> u64 {
    5
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            reconcile_interval_minutes: default_reconcile_interval_minutes(),
        }
    }
}

impl InspectConfig {
    /// Get the reconcile interval as a Duration.
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_minutes * 60)
    }
}
