//! Error types for the scan module

use thiserror::Error;

/// Errors that can occur while locating scan candidates
#[derive(Error, Debug)]
pub enum ScanError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}
