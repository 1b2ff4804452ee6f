//! Scan result records and handles received from the scanning service

use crate::{PolicyStatus, VulnerabilityAggregate};

/// External scan result for one logical component in one repository.
///
/// Produced once per reconciliation pass and consumed immediately; records
/// are never persisted. A record is only actionable when both `origin_id`
/// and `forge` are non-blank - without an origin coordinate there is no
/// way to match it to stored artifacts, so blank-origin records are
/// silently skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadataRecord {
    /// Identifier of the component origin (may be empty)
    pub origin_id: String,
    /// Ecosystem/namespace the origin identifier belongs to (may be empty)
    pub forge: String,
    /// Number of high severity vulnerabilities
    pub high_severity_count: u64,
    /// Number of medium severity vulnerabilities
    pub medium_severity_count: u64,
    /// Number of low severity vulnerabilities
    pub low_severity_count: u64,
    /// Policy evaluation outcome for the component
    pub policy_status: PolicyStatus,
    /// Link to the component version in the scanning service, if known
    pub component_version_link: Option<String>,
}

impl ArtifactMetadataRecord {
    /// Whether this record carries a usable origin coordinate.
    ///
    /// Whitespace-only values count as blank.
    pub fn has_origin(&self) -> bool {
        !self.origin_id.trim().is_empty() && !self.forge.trim().is_empty()
    }

    /// The record's severity counts as an aggregate value.
    pub fn aggregate(&self) -> VulnerabilityAggregate {
        VulnerabilityAggregate::new(
            self.high_severity_count,
            self.medium_severity_count,
            self.low_severity_count,
        )
    }
}

/// One severity-tagged vulnerability finding, as delivered by the
/// scanning service. The severity is kept as raw text; unrecognized
/// severities are skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnerabilityRecord {
    /// Severity of the finding as reported by the service
    pub severity: String,
}

/// Handle to a component version in the scanning service, delivered with
/// an external notification. Carries enough to fetch the component's
/// vulnerabilities and to link annotations back to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentVersionHandle {
    /// Component name as known to the scanning service
    pub component_name: String,
    /// Component version as known to the scanning service
    pub component_version: String,
    /// Link to the component version resource, if the service provided one
    pub href: Option<String>,
}

/// Handle to a component's entry in a project version's bill of materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomComponentHandle {
    /// Policy evaluation outcome recorded in the bill of materials
    pub policy_status: PolicyStatus,
}
