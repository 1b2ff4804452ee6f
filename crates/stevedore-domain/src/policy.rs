//! Policy status - the outcome of evaluating organizational rules against a component

use serde::{Deserialize, Serialize};

/// Result of evaluating organizational policy rules against a component's
/// known vulnerabilities and license.
///
/// Persisted in its canonical text form (`IN_VIOLATION`, `NOT_IN_VIOLATION`,
/// `UNKNOWN`) as an artifact property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    /// At least one policy rule is violated
    InViolation,
    /// No policy rule is violated
    NotInViolation,
    /// The scanning service could not determine a policy outcome
    Unknown,
}

impl PolicyStatus {
    /// Get the status in its canonical text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::InViolation => "IN_VIOLATION",
            PolicyStatus::NotInViolation => "NOT_IN_VIOLATION",
            PolicyStatus::Unknown => "UNKNOWN",
        }
    }

    /// Parse a status from its canonical text form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "IN_VIOLATION" => Some(PolicyStatus::InViolation),
            "NOT_IN_VIOLATION" => Some(PolicyStatus::NotInViolation),
            "UNKNOWN" => Some(PolicyStatus::Unknown),
            _ => None,
        }
    }
}

impl std::str::FromStr for PolicyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid policy status: {}", s))
    }
}
