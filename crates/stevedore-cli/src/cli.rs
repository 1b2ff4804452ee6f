//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Stevedore CLI - annotate repository artifacts with scan metadata.
#[derive(Debug, Parser)]
#[command(name = "stevedore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List artifacts due for scanning
    Scan(ScanArgs),

    /// Run a reconciliation pass for one or all configured repositories
    Reconcile(ReconcileArgs),

    /// Run reconciliation continuously on the configured interval
    Watch,

    /// Show the inspection status of the configured repositories
    Status,

    /// Re-arm a repository for reconciliation (set status PENDING)
    Reset(ResetArgs),

    /// Read, write, or delete stevedore properties on an artifact
    Properties(PropertiesArgs),
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Record the listed artifacts as scanned now
    /// (run after handing them to the external scanner)
    #[arg(long)]
    pub stamp: bool,
}

/// Arguments for the reconcile command.
#[derive(Debug, Parser)]
pub struct ReconcileArgs {
    /// Repository to reconcile; all configured repositories when omitted
    pub repo: Option<String>,
}

/// Arguments for the reset command.
#[derive(Debug, Parser)]
pub struct ResetArgs {
    /// Repository to re-arm
    pub repo: String,
}

/// Arguments for property maintenance.
#[derive(Debug, Parser)]
pub struct PropertiesArgs {
    #[command(subcommand)]
    pub action: PropertiesAction,
}

/// Property maintenance actions.
#[derive(Debug, Subcommand)]
pub enum PropertiesAction {
    /// Show stevedore properties on an artifact
    Get {
        /// Repository key
        repo: String,
        /// Artifact path (omit for the repository root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Set a stevedore property on an artifact
    Set {
        /// Repository key
        repo: String,
        /// Artifact path
        path: String,
        /// Property name (e.g. stevedore.originId)
        name: String,
        /// Property value
        value: String,
    },

    /// Delete stevedore properties from an artifact
    Delete {
        /// Repository key
        repo: String,
        /// Artifact path
        path: String,
        /// Property name; all stevedore properties when omitted
        name: Option<String>,
    },
}
