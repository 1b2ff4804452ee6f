//! Inspection status - the per-repository reconciliation state machine

use serde::{Deserialize, Serialize};

/// State of metadata reconciliation for one repository.
///
/// The lifecycle is PENDING → SUCCESS | FAILURE. PENDING is set by
/// whatever places a repository under inspection; a reconciliation pass
/// moves it to SUCCESS only if the whole pass completes cleanly, and to
/// FAILURE on any error. Both outcomes are terminal until an external
/// trigger resets the repository to PENDING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    /// Reconciliation has not run (or was externally re-armed)
    Pending,
    /// The last reconciliation pass completed without error
    Success,
    /// The last reconciliation pass failed
    Failure,
}

impl InspectionStatus {
    /// Get the status in its canonical text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "PENDING",
            InspectionStatus::Success => "SUCCESS",
            InspectionStatus::Failure => "FAILURE",
        }
    }

    /// Parse a status from its canonical text form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "PENDING" => Some(InspectionStatus::Pending),
            "SUCCESS" => Some(InspectionStatus::Success),
            "FAILURE" => Some(InspectionStatus::Failure),
            _ => None,
        }
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid inspection status: {}", s))
    }
}
