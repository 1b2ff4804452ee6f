//! Origin-identity fan-out of scan annotations

use std::sync::Arc;

use stevedore_domain::traits::{ArtifactStore, PropertyFilter};
use stevedore_domain::{
    ArtifactLocator, ArtifactProperty, InspectionStatus, PolicyStatus, VulnerabilityAggregate,
};

use crate::InspectError;

/// Value written for the component version link when the scanning service
/// did not provide one. The property is always present on an annotated
/// artifact, never omitted.
pub const LINK_UNAVAILABLE: &str = "Unavailable";

/// Applies one component's scan annotations to every artifact copy
/// carrying its origin coordinate.
///
/// The scanning service resolves results per logical component, but one
/// published component may be physically duplicated across many paths in
/// a repository. Broadcasting annotates every copy identically without
/// re-querying the service per copy. Matching is conjunctive: an artifact
/// must carry both the origin id AND the forge value.
pub struct OriginBroadcaster<S> {
    store: Arc<S>,
}

impl<S> OriginBroadcaster<S>
where
    S: ArtifactStore,
    S::Error: std::fmt::Display,
{
    /// Create a broadcaster over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Annotate every artifact in `repo_key` tagged with `(origin_id, forge)`.
    ///
    /// Returns the number of artifacts annotated. Writes to individual
    /// artifacts are idempotent and order-independent.
    pub fn broadcast(
        &self,
        repo_key: &str,
        origin_id: &str,
        forge: &str,
        aggregate: &VulnerabilityAggregate,
        policy_status: PolicyStatus,
        component_version_link: Option<&str>,
    ) -> Result<usize, InspectError> {
        let filter = PropertyFilter::new()
            .with(ArtifactProperty::OriginId.name(), origin_id)
            .with(ArtifactProperty::Forge.name(), forge);
        let matches = self
            .store
            .artifacts_by_properties(&filter, &[repo_key.to_string()])
            .map_err(|e| InspectError::Store(e.to_string()))?;

        for locator in &matches {
            self.annotate(locator, aggregate, policy_status, component_version_link)?;
            // Each annotated copy is individually marked inspected
            self.store
                .set_property(
                    locator,
                    ArtifactProperty::InspectionStatus.name(),
                    InspectionStatus::Success.as_str(),
                )
                .map_err(|e| InspectError::Store(e.to_string()))?;
        }

        tracing::debug!(
            "annotated {} artifacts with origin {}:{} in {}",
            matches.len(),
            forge,
            origin_id,
            repo_key
        );
        Ok(matches.len())
    }

    /// Write the four annotation properties on one artifact.
    pub fn annotate(
        &self,
        locator: &ArtifactLocator,
        aggregate: &VulnerabilityAggregate,
        policy_status: PolicyStatus,
        component_version_link: Option<&str>,
    ) -> Result<(), InspectError> {
        let link = component_version_link.unwrap_or(LINK_UNAVAILABLE);
        let writes = [
            (
                ArtifactProperty::HighVulnerabilities,
                aggregate.high.to_string(),
            ),
            (
                ArtifactProperty::MediumVulnerabilities,
                aggregate.medium.to_string(),
            ),
            (
                ArtifactProperty::LowVulnerabilities,
                aggregate.low.to_string(),
            ),
            (
                ArtifactProperty::PolicyStatus,
                policy_status.as_str().to_string(),
            ),
            (ArtifactProperty::ComponentVersionUrl, link.to_string()),
        ];
        for (property, value) in writes {
            self.store
                .set_property(locator, property.name(), &value)
                .map_err(|e| InspectError::Store(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stevedore_store::MemoryStore;

    fn tag(store: &MemoryStore, locator: &ArtifactLocator, origin_id: &str, forge: &str) {
        store
            .set_property(locator, ArtifactProperty::OriginId.name(), origin_id)
            .unwrap();
        store
            .set_property(locator, ArtifactProperty::Forge.name(), forge)
            .unwrap();
    }

    fn get(store: &MemoryStore, locator: &ArtifactLocator, property: ArtifactProperty) -> Option<String> {
        store.get_property(locator, property.name()).unwrap()
    }

    #[test]
    fn test_broadcast_annotates_all_copies_identically() {
        let store = Arc::new(MemoryStore::new());
        let copies = [
            ArtifactLocator::new("npm-local", "left-pad/1.3.0/left-pad-1.3.0.tgz"),
            ArtifactLocator::new("npm-local", "cache/left-pad-1.3.0.tgz"),
            ArtifactLocator::new("npm-local", "mirror/left-pad-1.3.0.tgz"),
        ];
        for copy in &copies {
            store.add_artifact(copy.repo_key(), copy.path(), 0);
            tag(&store, copy, "pkg:npm/left-pad", "npm");
        }
        // An unrelated artifact must stay untouched
        let other = ArtifactLocator::new("npm-local", "lodash/lodash-4.17.21.tgz");
        store.add_artifact(other.repo_key(), other.path(), 0);
        tag(&store, &other, "pkg:npm/lodash", "npm");

        let broadcaster = OriginBroadcaster::new(store.clone());
        let aggregate = VulnerabilityAggregate::new(3, 1, 4);
        let annotated = broadcaster
            .broadcast(
                "npm-local",
                "pkg:npm/left-pad",
                "npm",
                &aggregate,
                PolicyStatus::InViolation,
                None,
            )
            .unwrap();

        assert_eq!(annotated, 3);
        for copy in &copies {
            assert_eq!(
                get(&store, copy, ArtifactProperty::HighVulnerabilities),
                Some("3".to_string())
            );
            assert_eq!(
                get(&store, copy, ArtifactProperty::MediumVulnerabilities),
                Some("1".to_string())
            );
            assert_eq!(
                get(&store, copy, ArtifactProperty::LowVulnerabilities),
                Some("4".to_string())
            );
            assert_eq!(
                get(&store, copy, ArtifactProperty::PolicyStatus),
                Some("IN_VIOLATION".to_string())
            );
            assert_eq!(
                get(&store, copy, ArtifactProperty::ComponentVersionUrl),
                Some("Unavailable".to_string())
            );
            assert_eq!(
                get(&store, copy, ArtifactProperty::InspectionStatus),
                Some("SUCCESS".to_string())
            );
        }
        assert_eq!(get(&store, &other, ArtifactProperty::HighVulnerabilities), None);
    }

    #[test]
    fn test_match_is_conjunctive_on_origin_and_forge() {
        let store = Arc::new(MemoryStore::new());
        let same_origin_other_forge = ArtifactLocator::new("npm-local", "a.tgz");
        store.add_artifact("npm-local", "a.tgz", 0);
        tag(&store, &same_origin_other_forge, "pkg:npm/left-pad", "github");

        let broadcaster = OriginBroadcaster::new(store.clone());
        let annotated = broadcaster
            .broadcast(
                "npm-local",
                "pkg:npm/left-pad",
                "npm",
                &VulnerabilityAggregate::default(),
                PolicyStatus::Unknown,
                None,
            )
            .unwrap();

        assert_eq!(annotated, 0);
    }

    #[test]
    fn test_link_is_written_when_present() {
        let store = Arc::new(MemoryStore::new());
        let locator = ArtifactLocator::new("npm-local", "a.tgz");
        store.add_artifact("npm-local", "a.tgz", 0);
        tag(&store, &locator, "pkg:npm/a", "npm");

        let broadcaster = OriginBroadcaster::new(store.clone());
        broadcaster
            .broadcast(
                "npm-local",
                "pkg:npm/a",
                "npm",
                &VulnerabilityAggregate::default(),
                PolicyStatus::NotInViolation,
                Some("https://scan.example/components/a/1.0"),
            )
            .unwrap();

        assert_eq!(
            get(&store, &locator, ArtifactProperty::ComponentVersionUrl),
            Some("https://scan.example/components/a/1.0".to_string())
        );
    }
}
