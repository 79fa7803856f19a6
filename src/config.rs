//! App configuration, read from `config.toml` in the data directory

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::FileStorage;
use crate::sync::SyncTimings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL of the web server (http backend)
    pub url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncProvider {
    #[default]
    None,
    Folder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    pub provider: SyncProvider,
    /// Shared directory used by the folder provider
    pub folder: Option<PathBuf>,
    pub debounce_ms: u64,
    pub poll_interval_secs: u64,
    pub quiet_period_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let timings = SyncTimings::default();
        Self {
            provider: SyncProvider::None,
            folder: None,
            debounce_ms: timings.debounce.as_millis() as u64,
            poll_interval_secs: timings.poll_interval.as_secs(),
            quiet_period_ms: timings.quiet_period.as_millis() as u64,
        }
    }
}

impl SyncConfig {
    pub fn timings(&self) -> SyncTimings {
        SyncTimings {
            debounce: Duration::from_millis(self.debounce_ms),
            // A zero interval would make the poll timer panic
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            quiet_period: Duration::from_millis(self.quiet_period_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    /// Directory holding the data file, falling back to the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStorage::default_data_dir().map_err(|_| ConfigError::DataDirNotFound),
        }
    }
}

pub fn get_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load a config file; a missing file means all defaults
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        log::debug!("No config at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load `config.toml` from the platform data directory
pub fn load_default_config() -> Result<AppConfig> {
    let data_dir = FileStorage::default_data_dir().map_err(|_| ConfigError::DataDirNotFound)?;
    load_config(&get_config_path(&data_dir))
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
