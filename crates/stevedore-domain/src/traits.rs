//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. The storage backend (stevedore-store) and the scanning
//! service client (stevedore-client) implement them; the engine crates
//! depend only on the traits.

use std::collections::{BTreeMap, BTreeSet};

use crate::{ArtifactLocator, ArtifactMetadataRecord, ComponentVersionHandle, VulnerabilityRecord};

/// Conjunctive property filter for artifact searches.
///
/// An artifact matches when, for every entry, its value for the property
/// name is one of the entry's values. Entries are conjunctive across
/// names; values within one name are alternatives.
///
/// # Examples
///
/// ```
/// use stevedore_domain::traits::PropertyFilter;
///
/// let filter = PropertyFilter::new()
///     .with("stevedore.originId", "pkg:npm/left-pad")
///     .with("stevedore.forge", "npm");
/// assert_eq!(filter.entries().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    values_by_name: BTreeMap<String, BTreeSet<String>>,
}

impl PropertyFilter {
    /// Create an empty filter (matches every artifact).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted value for a property name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values_by_name
            .entry(name.into())
            .or_default()
            .insert(value.into());
        self
    }

    /// Iterate the filter's (name, accepted values) entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.values_by_name.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the filter has no entries.
    pub fn is_empty(&self) -> bool {
        self.values_by_name.is_empty()
    }

    /// Evaluate the filter against one artifact's property lookup.
    ///
    /// `lookup` returns the artifact's value for a property name, or
    /// `None` when the artifact does not carry the property.
    pub fn matches<'a, F>(&self, mut lookup: F) -> bool
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        self.entries().all(|(name, accepted)| {
            lookup(name).is_some_and(|value| accepted.contains(value))
        })
    }
}

/// Storage and search capabilities of the artifact repository manager.
///
/// Implemented by the infrastructure layer (stevedore-store). All
/// persistence the engine performs goes through this key/value property
/// interface; property names and values are plain strings.
pub trait ArtifactStore {
    /// Error type for store operations
    type Error;

    /// Whether a repository with this key exists.
    fn repository_exists(&self, repo_key: &str) -> Result<bool, Self::Error>;

    /// Number of artifacts across the given repositories.
    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64, Self::Error>;

    /// Last-modified time of an artifact, milliseconds since the Unix epoch.
    fn last_modified(&self, locator: &ArtifactLocator) -> Result<i64, Self::Error>;

    /// Artifacts in a repository whose file name matches a wildcard pattern.
    fn artifacts_by_name(
        &self,
        repo_key: &str,
        pattern: &str,
    ) -> Result<Vec<ArtifactLocator>, Self::Error>;

    /// Artifacts in the given repositories matching a conjunctive property filter.
    fn artifacts_by_properties(
        &self,
        filter: &PropertyFilter,
        repo_keys: &[String],
    ) -> Result<Vec<ArtifactLocator>, Self::Error>;

    /// Read a property value, `None` when absent.
    fn get_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
    ) -> Result<Option<String>, Self::Error>;

    /// Write a property value, replacing any previous value.
    fn set_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error>;

    /// Remove a property if present.
    fn delete_property(&self, locator: &ArtifactLocator, name: &str) -> Result<(), Self::Error>;
}

/// Client capabilities of the external scanning service.
///
/// Implemented by the infrastructure layer (stevedore-client).
pub trait ScanClient {
    /// Error type for client operations
    type Error;

    /// Fetch the scan metadata records for one repository's project version.
    fn fetch_metadata(
        &self,
        repo_key: &str,
        project_name: &str,
        project_version_name: &str,
    ) -> Result<Vec<ArtifactMetadataRecord>, Self::Error>;

    /// Fetch the vulnerability findings for one component version.
    fn fetch_vulnerabilities(
        &self,
        component: &ComponentVersionHandle,
    ) -> Result<Vec<VulnerabilityRecord>, Self::Error>;
}
