//! Stevedore Scanning Service Client
//!
//! HTTP implementation of the [`ScanClient`] trait against the scanning
//! service's REST API. The engine crates only see the trait; this crate
//! owns the wire format.

#![warn(missing_docs)]

mod client;
mod config;
mod dto;
mod error;

pub use client::HttpScanClient;
pub use config::ClientConfig;
pub use error::ClientError;

pub use stevedore_domain::traits::ScanClient;
