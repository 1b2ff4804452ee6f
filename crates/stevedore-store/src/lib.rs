//! Stevedore Storage Layer
//!
//! Implementations of the [`ArtifactStore`] trait: an embedded SQLite
//! property store for persistent deployments and an in-memory store for
//! tests and demos.
//!
//! Both stores model the same thing the repository manager exposes: a set
//! of repositories, each holding artifacts addressed by path, with a
//! plain-string property map per artifact (and per repository root).
//!
//! # Examples
//!
//! ```
//! use stevedore_domain::traits::ArtifactStore;
//! use stevedore_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! store.add_repository("npm-local");
//! store.add_artifact("npm-local", "left-pad/left-pad-1.3.0.tgz", 1_700_000_000_000);
//!
//! let found = store.artifacts_by_name("npm-local", "*.tgz").unwrap();
//! assert_eq!(found.len(), 1);
//! ```

#![warn(missing_docs)]

use thiserror::Error;

use stevedore_domain::ArtifactLocator;

mod memory;
mod pattern;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub use stevedore_domain::traits::ArtifactStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Repository key does not exist in the store
    #[error("Repository not found: {0}")]
    UnknownRepository(String),

    /// Artifact path does not exist in the store
    #[error("Artifact not found: {0}")]
    UnknownArtifact(ArtifactLocator),

    /// Name pattern could not be compiled
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Compilation failure reported by globset
        #[source]
        source: globset::Error,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
