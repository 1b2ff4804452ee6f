//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] stevedore_store::StoreError),

    /// Scan module error
    #[error("Scan error: {0}")]
    Scan(#[from] stevedore_scan::ScanError),

    /// Inspection module error
    #[error("Inspection error: {0}")]
    Inspect(#[from] stevedore_inspect::InspectError),

    /// Scanning service client error
    #[error("Scanning service error: {0}")]
    Client(#[from] stevedore_client::ClientError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
