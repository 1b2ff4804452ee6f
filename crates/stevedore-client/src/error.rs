//! Error types for the scanning service client

use thiserror::Error;

/// Errors that can occur talking to the scanning service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Scanning service returned {status} for {url}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Request URL
        url: String,
    },

    /// A component version handle carried no link to follow
    #[error("Component {0} has no version link to fetch vulnerabilities from")]
    MissingLink(String),
}
