//! Per-repository inspection status tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stevedore_domain::traits::ArtifactStore;
use stevedore_domain::{ArtifactLocator, ArtifactProperty, InspectionStatus};

use crate::InspectError;

/// Owns the per-repository inspection state machine.
///
/// The status lives as a property on the repository root. `assert_status`
/// is a read-only guard; `set_status` is an unconditional write - the
/// caller enforces the PENDING → SUCCESS/FAILURE discipline. To keep
/// guard-then-transition atomic under concurrent triggers, callers hold
/// the [`transition_guard`](StatusTracker::transition_guard) for the
/// repository key across both steps.
pub struct StatusTracker<S> {
    store: Arc<S>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S> StatusTracker<S>
where
    S: ArtifactStore,
    S::Error: std::fmt::Display,
{
    /// Create a tracker over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The mutex serializing status transitions for one repository key.
    ///
    /// Transitions for different keys are independent and may run in
    /// parallel.
    pub fn transition_guard(&self, repo_key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(repo_key.to_string()).or_default().clone()
    }

    /// Whether the repository's persisted status equals `expected`.
    ///
    /// A missing or unreadable status is never equal to `expected`:
    /// reconciliation is skipped rather than assumed safe to run.
    pub fn assert_status(&self, repo_key: &str, expected: InspectionStatus) -> bool {
        let root = ArtifactLocator::repository(repo_key);
        match self
            .store
            .get_property(&root, ArtifactProperty::InspectionStatus.name())
        {
            Ok(Some(text)) => InspectionStatus::parse(&text) == Some(expected),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("could not read inspection status of {}: {}", repo_key, e);
                false
            }
        }
    }

    /// Read the persisted status, `None` when absent or unrecognized.
    pub fn status(&self, repo_key: &str) -> Result<Option<InspectionStatus>, InspectError> {
        let root = ArtifactLocator::repository(repo_key);
        let text = self
            .store
            .get_property(&root, ArtifactProperty::InspectionStatus.name())
            .map_err(|e| InspectError::Store(e.to_string()))?;
        Ok(text.as_deref().and_then(InspectionStatus::parse))
    }

    /// Unconditionally write a status on a locator (repository root or
    /// individual artifact).
    pub fn set_status(
        &self,
        locator: &ArtifactLocator,
        status: InspectionStatus,
    ) -> Result<(), InspectError> {
        self.store
            .set_property(
                locator,
                ArtifactProperty::InspectionStatus.name(),
                status.as_str(),
            )
            .map_err(|e| InspectError::Store(e.to_string()))?;
        tracing::debug!("set inspection status of {} to {}", locator, status.as_str());
        Ok(())
    }

    /// Re-arm a repository for reconciliation (the external reset trigger).
    pub fn reset(&self, repo_key: &str) -> Result<(), InspectError> {
        self.set_status(
            &ArtifactLocator::repository(repo_key),
            InspectionStatus::Pending,
        )
    }

    /// Project name used when querying the scanning service for this
    /// repository; defaults to the repository key when unset.
    pub fn project_name(&self, repo_key: &str) -> Result<String, InspectError> {
        let root = ArtifactLocator::repository(repo_key);
        let name = self
            .store
            .get_property(&root, ArtifactProperty::ProjectName.name())
            .map_err(|e| InspectError::Store(e.to_string()))?;
        Ok(name.unwrap_or_else(|| repo_key.to_string()))
    }

    /// Project version name for this repository; defaults to `INSPECTION`.
    pub fn project_version(&self, repo_key: &str) -> Result<String, InspectError> {
        let root = ArtifactLocator::repository(repo_key);
        let version = self
            .store
            .get_property(&root, ArtifactProperty::ProjectVersionName.name())
            .map_err(|e| InspectError::Store(e.to_string()))?;
        Ok(version.unwrap_or_else(|| "INSPECTION".to_string()))
    }
}
