//! Startup configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read once at startup. Every key is optional in the TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiatLifeConfig {
    /// Directory holding the database file.
    pub data_dir: PathBuf,

    /// Database file name inside `data_dir`.
    pub database_name: String,

    /// Keep everything in memory (tests, previews).
    pub in_memory: bool,

    /// Upper bound on one relay pull, in seconds.
    pub sync_timeout_secs: u64,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Relay the host's relay client connects to. Not read by the core.
    pub relay_url: Option<String>,

    /// Blossom server the host's blob client uploads to. Not read by the core.
    pub blossom_server_url: Option<String>,
}

impl Default for FiatLifeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            database_name: "fiatlife_db".to_string(),
            in_memory: false,
            sync_timeout_secs: 30,
            log_filter: "info".to_string(),
            relay_url: None,
            blossom_server_url: None,
        }
    }
}

impl FiatLifeConfig {
    /// Config backed by an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            in_memory: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid FiatLife config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_name)
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs)
    }
}
