//! Wire types for the scanning service REST API

use serde::Deserialize;

use stevedore_domain::{ArtifactMetadataRecord, PolicyStatus, VulnerabilityRecord};

/// One component entry in a project version's component listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ComponentDto {
    #[serde(default)]
    pub origin_id: String,
    #[serde(default)]
    pub forge: String,
    #[serde(default)]
    pub high_severity_count: u64,
    #[serde(default)]
    pub medium_severity_count: u64,
    #[serde(default)]
    pub low_severity_count: u64,
    #[serde(default)]
    pub policy_status: Option<String>,
    #[serde(default)]
    pub component_version_url: Option<String>,
}

impl ComponentDto {
    /// Convert to the domain record. An absent or unrecognized policy
    /// status maps to UNKNOWN rather than failing the whole fetch.
    pub(crate) fn into_record(self) -> ArtifactMetadataRecord {
        let policy_status = self
            .policy_status
            .as_deref()
            .and_then(PolicyStatus::parse)
            .unwrap_or(PolicyStatus::Unknown);
        ArtifactMetadataRecord {
            origin_id: self.origin_id,
            forge: self.forge,
            high_severity_count: self.high_severity_count,
            medium_severity_count: self.medium_severity_count,
            low_severity_count: self.low_severity_count,
            policy_status,
            component_version_link: self.component_version_url,
        }
    }
}

/// One vulnerability entry for a component version.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VulnerabilityDto {
    #[serde(default)]
    pub severity: String,
}

impl VulnerabilityDto {
    pub(crate) fn into_record(self) -> VulnerabilityRecord {
        VulnerabilityRecord {
            severity: self.severity,
        }
    }
}
