//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use stevedore_client::ClientConfig;
use stevedore_inspect::InspectConfig;
use stevedore_scan::ScanConfig;

/// CLI configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan candidate selection
    #[serde(default)]
    pub scan: ScanConfig,

    /// Reconciliation settings
    #[serde(default)]
    pub inspect: InspectConfig,

    /// Scanning service connection
    #[serde(default)]
    pub client: ClientConfig,

    /// Local storage settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Settings for the embedded property database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file path; defaults to `~/.stevedore/stevedore.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".stevedore").join("config.toml"))
    }

    /// Load configuration from the given path, or the default path, or
    /// fall back to defaults when no file exists.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// The database path to open, explicit or defaulted.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.store.database_path {
            Some(path) => Ok(path.clone()),
            None => {
                let home = dirs::home_dir()
                    .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
                Ok(home.join(".stevedore").join("stevedore.db"))
            }
        }
    }
}
