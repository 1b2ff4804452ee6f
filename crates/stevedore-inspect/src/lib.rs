//! Stevedore Inspection Module
//!
//! Reconciles externally-produced scan metadata onto stored artifacts.
//!
//! # Overview
//!
//! A reconciliation pass for a repository:
//! 1. checks the repository's inspection status is PENDING (skips otherwise),
//! 2. resolves the repository's project/version scan context,
//! 3. fetches metadata records from the scanning service,
//! 4. broadcasts each record's annotations to every artifact copy sharing
//!    its `(originId, forge)` origin coordinate,
//! 5. finalizes the status: SUCCESS on a clean pass, FAILURE on any error.
//!
//! Passes are idempotent: rerunning with the same inputs rewrites the
//! same property values. There is no rollback - annotations written
//! before a failure reflect real scan results and are left in place.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use stevedore_inspect::ReconciliationEngine;
//! use stevedore_store::SqliteStore;
//! # use stevedore_domain::traits::ScanClient;
//! # use stevedore_domain::{ArtifactMetadataRecord, ComponentVersionHandle, VulnerabilityRecord};
//! # struct NoopClient;
//! # impl ScanClient for NoopClient {
//! #     type Error = String;
//! #     fn fetch_metadata(&self, _: &str, _: &str, _: &str) -> Result<Vec<ArtifactMetadataRecord>, String> { Ok(vec![]) }
//! #     fn fetch_vulnerabilities(&self, _: &ComponentVersionHandle) -> Result<Vec<VulnerabilityRecord>, String> { Ok(vec![]) }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::open(":memory:")?);
//! let client = Arc::new(NoopClient);
//! let engine = ReconciliationEngine::new(store, client);
//!
//! let outcome = engine.reconcile("npm-local");
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod broadcast;
mod config;
mod engine;
mod error;
mod metrics;
mod status;
mod worker;

pub use broadcast::OriginBroadcaster;
pub use config::InspectConfig;
pub use engine::{ReconcileOutcome, ReconciliationEngine};
pub use error::InspectError;
pub use metrics::ReconcileMetrics;
pub use status::StatusTracker;
pub use worker::InspectionWorker;
