//! In-memory property store for tests and demos

use std::collections::HashMap;
use std::sync::RwLock;

use stevedore_domain::traits::{ArtifactStore, PropertyFilter};
use stevedore_domain::ArtifactLocator;

use crate::{pattern, StoreError};

#[derive(Debug, Default)]
struct ArtifactEntry {
    last_modified: i64,
    properties: HashMap<String, String>,
}

type Repository = HashMap<String, ArtifactEntry>;

/// In-memory implementation of [`ArtifactStore`].
///
/// Backed by a `RwLock`ed map of repositories, each mapping artifact paths
/// to their last-modified time and property map. The repository root is
/// the entry with an empty path; it holds repository-level properties and
/// is excluded from artifact searches and counts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    repositories: RwLock<HashMap<String, Repository>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository (idempotent). Creates the root entry its
    /// repository-level properties live on.
    pub fn add_repository(&self, repo_key: &str) {
        let mut repositories = self.repositories.write().unwrap();
        repositories
            .entry(repo_key.to_string())
            .or_default()
            .entry(String::new())
            .or_default();
    }

    /// Add an artifact with the given last-modified time (epoch millis).
    /// The owning repository is created if absent.
    pub fn add_artifact(&self, repo_key: &str, path: &str, last_modified: i64) {
        let mut repositories = self.repositories.write().unwrap();
        let repository = repositories.entry(repo_key.to_string()).or_default();
        repository.entry(String::new()).or_default();
        repository.insert(
            path.to_string(),
            ArtifactEntry {
                last_modified,
                ..Default::default()
            },
        );
    }
}

impl ArtifactStore for MemoryStore {
    type Error = StoreError;

    fn repository_exists(&self, repo_key: &str) -> Result<bool, Self::Error> {
        Ok(self.repositories.read().unwrap().contains_key(repo_key))
    }

    fn artifact_count(&self, repo_keys: &[String]) -> Result<u64, Self::Error> {
        let repositories = self.repositories.read().unwrap();
        let mut count = 0u64;
        for repo_key in repo_keys {
            if let Some(repository) = repositories.get(repo_key) {
                count += repository.keys().filter(|path| !path.is_empty()).count() as u64;
            }
        }
        Ok(count)
    }

    fn last_modified(&self, locator: &ArtifactLocator) -> Result<i64, Self::Error> {
        let repositories = self.repositories.read().unwrap();
        repositories
            .get(locator.repo_key())
            .and_then(|repository| repository.get(locator.path()))
            .map(|entry| entry.last_modified)
            .ok_or_else(|| StoreError::UnknownArtifact(locator.clone()))
    }

    fn artifacts_by_name(
        &self,
        repo_key: &str,
        pattern: &str,
    ) -> Result<Vec<ArtifactLocator>, Self::Error> {
        let matcher = pattern::compile(pattern)?;
        let repositories = self.repositories.read().unwrap();
        let repository = repositories
            .get(repo_key)
            .ok_or_else(|| StoreError::UnknownRepository(repo_key.to_string()))?;

        let mut found: Vec<ArtifactLocator> = repository
            .keys()
            .filter(|path| !path.is_empty())
            .filter(|path| matcher.is_match(pattern::file_name(path)))
            .map(|path| ArtifactLocator::new(repo_key, path.clone()))
            .collect();
        found.sort();
        Ok(found)
    }

    fn artifacts_by_properties(
        &self,
        filter: &PropertyFilter,
        repo_keys: &[String],
    ) -> Result<Vec<ArtifactLocator>, Self::Error> {
        let repositories = self.repositories.read().unwrap();
        let mut found = Vec::new();
        for repo_key in repo_keys {
            let Some(repository) = repositories.get(repo_key) else {
                continue;
            };
            for (path, entry) in repository {
                if path.is_empty() {
                    continue;
                }
                if filter.matches(|name| entry.properties.get(name).map(String::as_str)) {
                    found.push(ArtifactLocator::new(repo_key, path.clone()));
                }
            }
        }
        found.sort();
        Ok(found)
    }

    fn get_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
    ) -> Result<Option<String>, Self::Error> {
        let repositories = self.repositories.read().unwrap();
        Ok(repositories
            .get(locator.repo_key())
            .and_then(|repository| repository.get(locator.path()))
            .and_then(|entry| entry.properties.get(name))
            .cloned())
    }

    fn set_property(
        &self,
        locator: &ArtifactLocator,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Error> {
        let mut repositories = self.repositories.write().unwrap();
        let entry = repositories
            .get_mut(locator.repo_key())
            .and_then(|repository| repository.get_mut(locator.path()))
            .ok_or_else(|| StoreError::UnknownArtifact(locator.clone()))?;
        entry.properties.insert(name.to_string(), value.to_string());
        tracing::debug!("set property {} to {} on {}", name, value, locator);
        Ok(())
    }

    fn delete_property(&self, locator: &ArtifactLocator, name: &str) -> Result<(), Self::Error> {
        let mut repositories = self.repositories.write().unwrap();
        if let Some(entry) = repositories
            .get_mut(locator.repo_key())
            .and_then(|repository| repository.get_mut(locator.path()))
        {
            entry.properties.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_artifact("npm-local", "left-pad/left-pad-1.3.0.tgz", 100);
        store.add_artifact("npm-local", "lodash/lodash-4.17.21.tgz", 200);
        store.add_artifact("npm-local", "readme.md", 300);
        store
    }

    #[test]
    fn test_repository_exists() {
        let store = seeded();
        assert!(store.repository_exists("npm-local").unwrap());
        assert!(!store.repository_exists("maven-local").unwrap());
    }

    #[test]
    fn test_artifacts_by_name_matches_file_names() {
        let store = seeded();
        let found = store.artifacts_by_name("npm-local", "*.tgz").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|locator| locator.path().ends_with(".tgz")));
    }

    #[test]
    fn test_artifacts_by_name_unknown_repository() {
        let store = seeded();
        let err = store.artifacts_by_name("maven-local", "*").unwrap_err();
        assert!(matches!(err, StoreError::UnknownRepository(_)));
    }

    #[test]
    fn test_property_round_trip() {
        let store = seeded();
        let locator = ArtifactLocator::new("npm-local", "readme.md");

        assert_eq!(store.get_property(&locator, "k").unwrap(), None);
        store.set_property(&locator, "k", "v").unwrap();
        assert_eq!(store.get_property(&locator, "k").unwrap(), Some("v".to_string()));
        store.delete_property(&locator, "k").unwrap();
        assert_eq!(store.get_property(&locator, "k").unwrap(), None);
    }

    #[test]
    fn test_set_property_on_unknown_artifact_fails() {
        let store = seeded();
        let locator = ArtifactLocator::new("npm-local", "missing.tgz");
        let err = store.set_property(&locator, "k", "v").unwrap_err();
        assert!(matches!(err, StoreError::UnknownArtifact(_)));
    }

    #[test]
    fn test_repository_root_properties() {
        let store = seeded();
        let root = ArtifactLocator::repository("npm-local");
        store.set_property(&root, "status", "PENDING").unwrap();
        assert_eq!(
            store.get_property(&root, "status").unwrap(),
            Some("PENDING".to_string())
        );

        // The root never shows up as an artifact
        assert_eq!(store.artifact_count(&["npm-local".to_string()]).unwrap(), 3);
        let all = store.artifacts_by_name("npm-local", "*").unwrap();
        assert!(all.iter().all(|locator| !locator.is_repository_root()));
    }

    #[test]
    fn test_artifacts_by_properties_is_conjunctive() {
        let store = seeded();
        let a = ArtifactLocator::new("npm-local", "left-pad/left-pad-1.3.0.tgz");
        let b = ArtifactLocator::new("npm-local", "lodash/lodash-4.17.21.tgz");
        store.set_property(&a, "origin", "pkg:npm/left-pad").unwrap();
        store.set_property(&a, "forge", "npm").unwrap();
        store.set_property(&b, "origin", "pkg:npm/lodash").unwrap();
        store.set_property(&b, "forge", "npm").unwrap();

        let filter = PropertyFilter::new()
            .with("origin", "pkg:npm/left-pad")
            .with("forge", "npm");
        let found = store
            .artifacts_by_properties(&filter, &["npm-local".to_string()])
            .unwrap();
        assert_eq!(found, vec![a]);
    }
}
