//! Pattern-based timestamp parsing and formatting
//!
//! Timestamps cross two boundaries as text: the configured artifact
//! cutoff, and the scan-time property persisted on artifacts. Both are
//! interpreted against a single configurable chrono pattern, in UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// A timestamp did not match the configured pattern.
#[derive(Error, Debug)]
#[error("timestamp '{text}' does not match pattern '{pattern}'")]
pub struct TimeParseError {
    pattern: String,
    text: String,
    #[source]
    source: chrono::ParseError,
}

/// Parses and formats timestamps against one configured chrono pattern.
///
/// # Examples
///
/// ```
/// use stevedore_scan::TimestampFormat;
///
/// let format = TimestampFormat::default();
/// let millis = format.parse("2024-01-15T10:30:00.000").unwrap();
/// assert_eq!(format.format(millis), "2024-01-15T10:30:00.000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
}

/// Default pattern for persisted and configured timestamps.
pub(crate) const DEFAULT_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3f";

impl TimestampFormat {
    /// Create a format from a chrono pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The configured pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a timestamp into milliseconds since the Unix epoch (UTC).
    pub fn parse(&self, text: &str) -> Result<i64, TimeParseError> {
        NaiveDateTime::parse_from_str(text.trim(), &self.pattern)
            .map(|naive| naive.and_utc().timestamp_millis())
            .map_err(|source| TimeParseError {
                pattern: self.pattern.clone(),
                text: text.to_string(),
                source,
            })
    }

    /// Format milliseconds since the Unix epoch (UTC) with the pattern.
    ///
    /// Out-of-range inputs fall back to the epoch itself rather than
    /// failing; the value is only ever compared by re-parsing.
    pub fn format(&self, epoch_millis: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(epoch_millis)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .naive_utc()
            .format(&self.pattern)
            .to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}
