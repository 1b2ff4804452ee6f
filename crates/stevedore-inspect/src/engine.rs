//! Metadata reconciliation engine

use std::sync::Arc;

use stevedore_domain::traits::{ArtifactStore, ScanClient};
use stevedore_domain::{
    ArtifactLocator, ArtifactMetadataRecord, BomComponentHandle, ComponentVersionHandle,
    InspectionStatus, VulnerabilityAggregate,
};

use crate::{InspectError, OriginBroadcaster, ReconcileMetrics, StatusTracker};

/// Outcome of one reconciliation pass.
///
/// Pass errors are recorded as FAILURE status and logged, never
/// propagated; the outcome lets callers report without handling them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The repository was not PENDING; nothing was done
    Skipped,
    /// The pass completed and the repository is now SUCCESS
    Succeeded(ReconcileMetrics),
    /// The pass failed and the repository is now FAILURE
    Failed,
}

/// Orchestrates metadata reconciliation for repositories.
///
/// Holds the storage and scanning collaborators plus the status tracker
/// and broadcaster built over the same store.
pub struct ReconciliationEngine<S, C> {
    client: Arc<C>,
    tracker: StatusTracker<S>,
    broadcaster: OriginBroadcaster<S>,
}

impl<S, C> ReconciliationEngine<S, C>
where
    S: ArtifactStore,
    S::Error: std::fmt::Display,
    C: ScanClient,
    C::Error: std::fmt::Display,
{
    /// Create an engine over a shared store and scanning client.
    pub fn new(store: Arc<S>, client: Arc<C>) -> Self {
        Self {
            client,
            tracker: StatusTracker::new(store.clone()),
            broadcaster: OriginBroadcaster::new(store),
        }
    }

    /// The engine's status tracker (shared with callers that need status
    /// reads or the external PENDING reset).
    pub fn tracker(&self) -> &StatusTracker<S> {
        &self.tracker
    }

    /// Run one reconciliation pass for a repository.
    ///
    /// A no-op unless the repository's status is PENDING. On any error
    /// during the pass the status becomes FAILURE and annotations already
    /// written stay in place; there is no rollback. On a clean pass the
    /// status becomes SUCCESS.
    pub fn reconcile(&self, repo_key: &str) -> ReconcileOutcome {
        // Guard-check and final status write are serialized per key
        let guard = self.tracker.transition_guard(repo_key);
        let _held = guard.lock().unwrap();

        if !self.tracker.assert_status(repo_key, InspectionStatus::Pending) {
            tracing::debug!("repository {} is not pending inspection, skipping", repo_key);
            return ReconcileOutcome::Skipped;
        }

        tracing::debug!("populating metadata on repository {}", repo_key);
        let root = ArtifactLocator::repository(repo_key);
        match self.reconcile_pending(repo_key, &root) {
            Ok(mut metrics) => {
                metrics.passes_succeeded = 1;
                ReconcileOutcome::Succeeded(metrics)
            }
            Err(e) => {
                tracing::error!(
                    "encountered a problem while populating artifact metadata in repository {}",
                    repo_key
                );
                tracing::debug!("reconciliation failure detail: {}", e);
                if let Err(write_err) = self.tracker.set_status(&root, InspectionStatus::Failure) {
                    tracing::error!(
                        "could not record FAILURE status for {}: {}",
                        repo_key,
                        write_err
                    );
                }
                ReconcileOutcome::Failed
            }
        }
    }

    fn reconcile_pending(
        &self,
        repo_key: &str,
        root: &ArtifactLocator,
    ) -> Result<ReconcileMetrics, InspectError> {
        let project_name = self.tracker.project_name(repo_key)?;
        let project_version = self.tracker.project_version(repo_key)?;

        let records = self
            .client
            .fetch_metadata(repo_key, &project_name, &project_version)
            .map_err(|e| InspectError::Scan(e.to_string()))?;

        let metrics = self.apply_records(repo_key, &records)?;
        self.tracker.set_status(root, InspectionStatus::Success)?;
        Ok(metrics)
    }

    /// Broadcast a batch of metadata records to their matching artifacts.
    ///
    /// Records with a blank origin coordinate cannot be matched to
    /// artifacts and are skipped without error.
    pub fn apply_records(
        &self,
        repo_key: &str,
        records: &[ArtifactMetadataRecord],
    ) -> Result<ReconcileMetrics, InspectError> {
        let mut metrics = ReconcileMetrics::new();
        for record in records {
            if !record.has_origin() {
                tracing::debug!("skipping metadata record with blank origin coordinate");
                metrics.record_skipped();
                continue;
            }
            let annotated = self.broadcaster.broadcast(
                repo_key,
                &record.origin_id,
                &record.forge,
                &record.aggregate(),
                record.policy_status,
                record.component_version_link.as_deref(),
            )?;
            metrics.record_applied(annotated);
        }
        Ok(metrics)
    }

    /// Annotate a single artifact from an externally-received notification.
    ///
    /// Fetches the component's vulnerabilities, aggregates them, writes
    /// the annotation properties, and unconditionally marks the artifact
    /// SUCCESS. Notification-driven updates are assumed independently
    /// authorized by the caller, so there is no PENDING guard here.
    pub fn apply_result(
        &self,
        locator: &ArtifactLocator,
        component: &ComponentVersionHandle,
        bom: &BomComponentHandle,
    ) -> Result<(), InspectError> {
        let vulnerabilities = self
            .client
            .fetch_vulnerabilities(component)
            .map_err(|e| InspectError::Scan(e.to_string()))?;
        let aggregate =
            VulnerabilityAggregate::aggregate_texts(vulnerabilities.iter().map(|v| &v.severity));

        self.broadcaster.annotate(
            locator,
            &aggregate,
            bom.policy_status,
            component.href.as_deref(),
        )?;
        self.tracker.set_status(locator, InspectionStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stevedore_domain::traits::PropertyFilter;
    use stevedore_domain::{ArtifactProperty, PolicyStatus, VulnerabilityRecord};
    use stevedore_store::{MemoryStore, StoreError};

    // Scan client stub returning canned records, or failing outright
    struct StubClient {
        records: Vec<ArtifactMetadataRecord>,
        vulnerabilities: Vec<VulnerabilityRecord>,
        fail: bool,
    }

    impl StubClient {
        fn with_records(records: Vec<ArtifactMetadataRecord>) -> Self {
            Self {
                records,
                vulnerabilities: Vec::new(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                records: Vec::new(),
                vulnerabilities: Vec::new(),
                fail: true,
            }
        }
    }

    impl ScanClient for StubClient {
        type Error = String;

        fn fetch_metadata(
            &self,
            _repo_key: &str,
            _project_name: &str,
            _project_version_name: &str,
        ) -> Result<Vec<ArtifactMetadataRecord>, Self::Error> {
            if self.fail {
                Err("scan service unreachable".to_string())
            } else {
                Ok(self.records.clone())
            }
        }

        fn fetch_vulnerabilities(
            &self,
            _component: &ComponentVersionHandle,
        ) -> Result<Vec<VulnerabilityRecord>, Self::Error> {
            if self.fail {
                Err("scan service unreachable".to_string())
            } else {
                Ok(self.vulnerabilities.clone())
            }
        }
    }

    // Store wrapper that fails property writes on one path, for
    // exercising the mid-pass failure contract
    struct FaultyStore {
        inner: MemoryStore,
        fail_on_path: String,
    }

    impl ArtifactStore for FaultyStore {
        type Error = StoreError;

        fn repository_exists(&self, repo_key: &str) -> Result<bool, Self::Error> {
            self.inner.repository_exists(repo_key)
        }

        fn artifact_count(&self, repo_keys: &[String]) -> Result<u64, Self::Error> {
            self.inner.artifact_count(repo_keys)
        }

        fn last_modified(&self, locator: &ArtifactLocator) -> Result<i64, Self::Error> {
            self.inner.last_modified(locator)
        }

        fn artifacts_by_name(
            &self,
            repo_key: &str,
            pattern: &str,
        ) -> Result<Vec<ArtifactLocator>, Self::Error> {
            self.inner.artifacts_by_name(repo_key, pattern)
        }

        fn artifacts_by_properties(
            &self,
            filter: &PropertyFilter,
            repo_keys: &[String],
        ) -> Result<Vec<ArtifactLocator>, Self::Error> {
            self.inner.artifacts_by_properties(filter, repo_keys)
        }

        fn get_property(
            &self,
            locator: &ArtifactLocator,
            name: &str,
        ) -> Result<Option<String>, Self::Error> {
            self.inner.get_property(locator, name)
        }

        fn set_property(
            &self,
            locator: &ArtifactLocator,
            name: &str,
            value: &str,
        ) -> Result<(), Self::Error> {
            if locator.path() == self.fail_on_path {
                return Err(StoreError::UnknownArtifact(locator.clone()));
            }
            self.inner.set_property(locator, name, value)
        }

        fn delete_property(&self, locator: &ArtifactLocator, name: &str) -> Result<(), Self::Error> {
            self.inner.delete_property(locator, name)
        }
    }

    fn record(origin_id: &str, forge: &str, high: u64) -> ArtifactMetadataRecord {
        ArtifactMetadataRecord {
            origin_id: origin_id.to_string(),
            forge: forge.to_string(),
            high_severity_count: high,
            medium_severity_count: 0,
            low_severity_count: 0,
            policy_status: PolicyStatus::NotInViolation,
            component_version_link: None,
        }
    }

    fn tagged_store(paths_by_origin: &[(&str, &str, &str)]) -> MemoryStore {
        let store = MemoryStore::new();
        store.add_repository("npm-local");
        for (path, origin, forge) in paths_by_origin {
            store.add_artifact("npm-local", path, 0);
            let locator = ArtifactLocator::new("npm-local", *path);
            store
                .set_property(&locator, ArtifactProperty::OriginId.name(), origin)
                .unwrap();
            store
                .set_property(&locator, ArtifactProperty::Forge.name(), forge)
                .unwrap();
        }
        store
    }

    fn annotation_snapshot(store: &impl ArtifactStore<Error = StoreError>, locator: &ArtifactLocator) -> Vec<Option<String>> {
        ArtifactProperty::all()
            .iter()
            .map(|p| store.get_property(locator, p.name()).unwrap())
            .collect()
    }

    #[test]
    fn test_reconcile_skips_unless_pending() {
        let store = Arc::new(tagged_store(&[("a.tgz", "pkg:npm/a", "npm")]));
        let client = Arc::new(StubClient::with_records(vec![record("pkg:npm/a", "npm", 1)]));
        let engine = ReconciliationEngine::new(store.clone(), client);

        // No status at all
        assert_eq!(engine.reconcile("npm-local"), ReconcileOutcome::Skipped);

        // Terminal status
        engine
            .tracker()
            .set_status(
                &ArtifactLocator::repository("npm-local"),
                InspectionStatus::Success,
            )
            .unwrap();
        assert_eq!(engine.reconcile("npm-local"), ReconcileOutcome::Skipped);

        // Nothing was written to the artifact either way
        let locator = ArtifactLocator::new("npm-local", "a.tgz");
        assert_eq!(
            store
                .get_property(&locator, ArtifactProperty::HighVulnerabilities.name())
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_reconcile_success_path() {
        let store = Arc::new(tagged_store(&[
            ("left-pad/left-pad-1.3.0.tgz", "pkg:npm/left-pad", "npm"),
            ("cache/left-pad-1.3.0.tgz", "pkg:npm/left-pad", "npm"),
        ]));
        let client = Arc::new(StubClient::with_records(vec![
            record("pkg:npm/left-pad", "npm", 2),
            record("", "", 9), // blank origin, must be skipped silently
        ]));
        let engine = ReconciliationEngine::new(store.clone(), client);
        engine.tracker().reset("npm-local").unwrap();

        let outcome = engine.reconcile("npm-local");
        let ReconcileOutcome::Succeeded(metrics) = outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert_eq!(metrics.records_applied, 1);
        assert_eq!(metrics.records_skipped, 1);
        assert_eq!(metrics.artifacts_annotated, 2);
        assert_eq!(
            engine.tracker().status("npm-local").unwrap(),
            Some(InspectionStatus::Success)
        );
    }

    #[test]
    fn test_reconcile_failure_sets_failure_status() {
        let store = Arc::new(tagged_store(&[("a.tgz", "pkg:npm/a", "npm")]));
        let client = Arc::new(StubClient::failing());
        let engine = ReconciliationEngine::new(store, client);
        engine.tracker().reset("npm-local").unwrap();

        assert_eq!(engine.reconcile("npm-local"), ReconcileOutcome::Failed);
        assert_eq!(
            engine.tracker().status("npm-local").unwrap(),
            Some(InspectionStatus::Failure)
        );

        // Terminal until externally reset
        assert_eq!(engine.reconcile("npm-local"), ReconcileOutcome::Skipped);
    }

    #[test]
    fn test_mid_pass_failure_keeps_earlier_annotations() {
        let inner = tagged_store(&[
            ("a.tgz", "pkg:npm/a", "npm"),
            ("broken.tgz", "pkg:npm/broken", "npm"),
        ]);
        let store = Arc::new(FaultyStore {
            inner,
            fail_on_path: "broken.tgz".to_string(),
        });
        // Record order matters: the good record lands first, then the bad
        // one fails its first property write
        let client = Arc::new(StubClient::with_records(vec![
            record("pkg:npm/a", "npm", 7),
            record("pkg:npm/broken", "npm", 1),
        ]));
        let engine = ReconciliationEngine::new(store.clone(), client);
        engine.tracker().reset("npm-local").unwrap();

        assert_eq!(engine.reconcile("npm-local"), ReconcileOutcome::Failed);
        assert_eq!(
            engine.tracker().status("npm-local").unwrap(),
            Some(InspectionStatus::Failure)
        );

        // No rollback: the first record's annotations survived the failure
        let good = ArtifactLocator::new("npm-local", "a.tgz");
        assert_eq!(
            store
                .get_property(&good, ArtifactProperty::HighVulnerabilities.name())
                .unwrap(),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_reconcile_is_idempotent_across_reset() {
        let store = Arc::new(tagged_store(&[
            ("left-pad/left-pad-1.3.0.tgz", "pkg:npm/left-pad", "npm"),
        ]));
        let client = Arc::new(StubClient::with_records(vec![record(
            "pkg:npm/left-pad",
            "npm",
            5,
        )]));
        let engine = ReconciliationEngine::new(store.clone(), client);
        let locator = ArtifactLocator::new("npm-local", "left-pad/left-pad-1.3.0.tgz");

        engine.tracker().reset("npm-local").unwrap();
        assert!(matches!(
            engine.reconcile("npm-local"),
            ReconcileOutcome::Succeeded(_)
        ));
        let first = annotation_snapshot(store.as_ref(), &locator);

        // External trigger re-arms the repository; same inputs, same bytes
        engine.tracker().reset("npm-local").unwrap();
        assert!(matches!(
            engine.reconcile("npm-local"),
            ReconcileOutcome::Succeeded(_)
        ));
        let second = annotation_snapshot(store.as_ref(), &locator);

        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_result_annotates_one_artifact_without_guard() {
        let store = Arc::new(tagged_store(&[("a.tgz", "pkg:npm/a", "npm")]));
        let client = Arc::new(StubClient {
            records: Vec::new(),
            vulnerabilities: vec![
                VulnerabilityRecord {
                    severity: "HIGH".to_string(),
                },
                VulnerabilityRecord {
                    severity: "LOW".to_string(),
                },
                VulnerabilityRecord {
                    severity: "unscored".to_string(),
                },
            ],
            fail: false,
        });
        let engine = ReconciliationEngine::new(store.clone(), client);

        let locator = ArtifactLocator::new("npm-local", "a.tgz");
        let component = ComponentVersionHandle {
            component_name: "a".to_string(),
            component_version: "1.0".to_string(),
            href: Some("https://scan.example/components/a/1.0".to_string()),
        };
        let bom = BomComponentHandle {
            policy_status: PolicyStatus::InViolation,
        };

        // Note: no PENDING status anywhere; the notification path ignores the guard
        engine.apply_result(&locator, &component, &bom).unwrap();

        assert_eq!(
            store
                .get_property(&locator, ArtifactProperty::HighVulnerabilities.name())
                .unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            store
                .get_property(&locator, ArtifactProperty::LowVulnerabilities.name())
                .unwrap(),
            Some("1".to_string())
        );
        assert_eq!(
            store
                .get_property(&locator, ArtifactProperty::ComponentVersionUrl.name())
                .unwrap(),
            Some("https://scan.example/components/a/1.0".to_string())
        );
        assert_eq!(
            store
                .get_property(&locator, ArtifactProperty::InspectionStatus.name())
                .unwrap(),
            Some("SUCCESS".to_string())
        );
    }
}
