//! Wildcard name-pattern matching shared by the store implementations

use globset::{Glob, GlobMatcher};

use crate::StoreError;

/// Compile a wildcard pattern (`*.jar`, `left-pad-*`) into a matcher.
pub(crate) fn compile(pattern: &str) -> Result<GlobMatcher, StoreError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// The file name portion of an artifact path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
