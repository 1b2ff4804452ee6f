//! Candidate enumeration across configured repositories

use std::collections::BTreeSet;
use std::sync::Arc;

use stevedore_domain::traits::ArtifactStore;
use stevedore_domain::{ArtifactLocator, ArtifactProperty};

use crate::{EligibilityPolicy, ScanConfig, ScanError, TimestampFormat};

/// Enumerates scan candidates and filters them by eligibility.
///
/// Candidate enumeration (name-pattern search across the configured
/// repositories) and eligibility filtering are separate steps: filtering
/// needs per-artifact storage reads (last-modified, recorded scan time),
/// which callers may want to batch differently.
pub struct ArtifactLocatorService<S> {
    store: Arc<S>,
    config: ScanConfig,
    policy: EligibilityPolicy,
    format: TimestampFormat,
}

impl<S> ArtifactLocatorService<S>
where
    S: ArtifactStore,
    S::Error: std::fmt::Display,
{
    /// Create a service over a store with the given configuration.
    pub fn new(store: Arc<S>, config: ScanConfig) -> Self {
        let policy = config.eligibility_policy();
        let format = config.timestamp_format();
        Self {
            store,
            config,
            policy,
            format,
        }
    }

    /// Enumerate all artifacts matching any configured name pattern in any
    /// configured repository.
    ///
    /// An empty repository list yields an empty set and a warning: no
    /// artifact is ever scanned without explicit repository configuration.
    /// Repositories that do not exist in the store are skipped with a
    /// warning rather than failing the whole enumeration.
    pub fn search_repo_paths(&self) -> Result<BTreeSet<ArtifactLocator>, ScanError> {
        let mut found = BTreeSet::new();

        if self.config.repos.is_empty() {
            tracing::warn!("no repositories configured for scanning; nothing to do");
            return Ok(found);
        }

        for repo_key in &self.config.repos {
            let exists = self
                .store
                .repository_exists(repo_key)
                .map_err(|e| ScanError::Store(e.to_string()))?;
            if !exists {
                tracing::warn!("repository '{}' was not found, skipping it", repo_key);
                continue;
            }

            for pattern in &self.config.name_patterns {
                let matches = self
                    .store
                    .artifacts_by_name(repo_key, pattern)
                    .map_err(|e| ScanError::Store(e.to_string()))?;
                tracing::debug!(
                    "found {} artifacts matching pattern [{}] in {}",
                    matches.len(),
                    pattern,
                    repo_key
                );
                found.extend(matches);
            }
        }

        tracing::debug!(
            "patterns: {}, repos: {}, candidates: {}",
            self.config.name_patterns.len(),
            self.config.repos.len(),
            found.len()
        );
        Ok(found)
    }

    /// Whether one artifact should be scanned now.
    pub fn should_scan_now(&self, locator: &ArtifactLocator) -> Result<bool, ScanError> {
        let last_modified = self
            .store
            .last_modified(locator)
            .map_err(|e| ScanError::Store(e.to_string()))?;
        let recorded = self
            .store
            .get_property(locator, ArtifactProperty::ScanTime.name())
            .map_err(|e| ScanError::Store(e.to_string()))?;
        Ok(self.policy.should_scan(last_modified, recorded.as_deref()))
    }

    /// Enumerate candidates and keep only the ones due for scanning.
    pub fn eligible_paths(&self) -> Result<BTreeSet<ArtifactLocator>, ScanError> {
        let mut eligible = BTreeSet::new();
        for locator in self.search_repo_paths()? {
            if self.should_scan_now(&locator)? {
                eligible.insert(locator);
            } else {
                tracing::debug!("{} is not due for scanning", locator);
            }
        }
        Ok(eligible)
    }

    /// Record a successful scan of an artifact at the given time
    /// (epoch millis). Called after the external scanner finishes;
    /// subsequent eligibility checks compare against this value.
    pub fn record_scan_time(
        &self,
        locator: &ArtifactLocator,
        epoch_millis: i64,
    ) -> Result<(), ScanError> {
        self.store
            .set_property(
                locator,
                ArtifactProperty::ScanTime.name(),
                &self.format.format(epoch_millis),
            )
            .map_err(|e| ScanError::Store(e.to_string()))
    }
}
