//! Stevedore CLI library
//!
//! Command-line surface for the stevedore engine: scan candidate
//! listing, reconciliation, status inspection, and property maintenance.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
