//! Error types for the inspection module

use thiserror::Error;

/// Errors that can occur during a reconciliation pass
#[derive(Error, Debug)]
pub enum InspectError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Scanning service error
    #[error("Scanning service error: {0}")]
    Scan(String),
}
