//! # Configuration
//!
//! Loaded with [`confique`] from two layers, highest priority first:
//!
//! 1. **Environment variables**: `PORTICO_REMOTE_URL`, `PORTICO_PAGE_SIZE`, ...
//! 2. **Config file**: `portico.toml` in the OS config directory (via
//!    `directories`), or the path in `PORTICO_CONFIG`.
//!
//! Anything unset falls back to the compiled defaults below.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `remote_url` | none | Base URL of the hosted backend |
//! | `remote_key` | none | API key sent as `apikey` and bearer token |
//! | `remote_table` | `projects` | Table name |
//! | `mirror_dir` | OS data dir | Directory of the local mirror |
//! | `featured_minimum` | `6` | Featured floor enforced on toggles |
//! | `featured_slots` | `6` | Homepage selection size |
//! | `page_size` | `3` | Projects per gallery row |
//! | `related_limit` | `3` | Related projects per page |
//! | `cache_ttl_secs` | `300` | Query cache lifetime |
//! | `poll_interval_secs` | `30` | `watch` polling interval |
//! | `request_timeout_secs` | `10` | HTTP timeout |

use crate::error::{PorticoError, Result};
use crate::repository::RepositoryOptions;
use crate::store::rest::RestSettings;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "portico.toml";
pub const CONFIG_PATH_ENV: &str = "PORTICO_CONFIG";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PorticoConfig {
    #[config(env = "PORTICO_REMOTE_URL")]
    pub remote_url: Option<String>,

    #[config(env = "PORTICO_REMOTE_KEY")]
    pub remote_key: Option<String>,

    #[config(env = "PORTICO_REMOTE_TABLE", default = "projects")]
    pub remote_table: String,

    #[config(env = "PORTICO_MIRROR_DIR")]
    pub mirror_dir: Option<PathBuf>,

    #[config(env = "PORTICO_FEATURED_MINIMUM", default = 6)]
    pub featured_minimum: usize,

    #[config(env = "PORTICO_FEATURED_SLOTS", default = 6)]
    pub featured_slots: usize,

    #[config(env = "PORTICO_PAGE_SIZE", default = 3)]
    pub page_size: usize,

    #[config(env = "PORTICO_RELATED_LIMIT", default = 3)]
    pub related_limit: usize,

    #[config(env = "PORTICO_CACHE_TTL_SECS", default = 300)]
    pub cache_ttl_secs: u64,

    #[config(env = "PORTICO_POLL_INTERVAL_SECS", default = 30)]
    pub poll_interval_secs: u64,

    #[config(env = "PORTICO_REQUEST_TIMEOUT_SECS", default = 10)]
    pub request_timeout_secs: u64,
}

impl Default for PorticoConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_key: None,
            remote_table: "projects".to_string(),
            mirror_dir: None,
            featured_minimum: 6,
            featured_slots: 6,
            page_size: 3,
            related_limit: 3,
            cache_ttl_secs: 300,
            poll_interval_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

impl PorticoConfig {
    /// Environment plus the config file, if one exists.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path())
    }

    pub fn load_from(file: Option<PathBuf>) -> Result<Self> {
        let mut builder = PorticoConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder
            .load()
            .map_err(|e| PorticoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PorticoError::Config("page_size must be at least 1".into()));
        }
        if self.featured_slots == 0 {
            return Err(PorticoError::Config(
                "featured_slots must be at least 1".into(),
            ));
        }
        if self.remote_table.trim().is_empty() {
            return Err(PorticoError::Config("remote_table cannot be empty".into()));
        }
        Ok(())
    }

    /// Configured mirror directory, else the OS data directory, else
    /// `.portico` in the working directory.
    pub fn mirror_dir(&self) -> PathBuf {
        if let Some(dir) = &self.mirror_dir {
            return dir.clone();
        }
        ProjectDirs::from("", "", "portico")
            .map(|dirs| dirs.data_dir().join("mirror"))
            .unwrap_or_else(|| PathBuf::from(".portico"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn rest_settings(&self) -> Result<RestSettings> {
        let base_url = self.remote_url.clone().ok_or_else(|| {
            PorticoError::Config("remote_url is not set (PORTICO_REMOTE_URL)".into())
        })?;
        let api_key = self.remote_key.clone().ok_or_else(|| {
            PorticoError::Config("remote_key is not set (PORTICO_REMOTE_KEY)".into())
        })?;
        Ok(RestSettings {
            base_url,
            api_key,
            table: self.remote_table.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

impl From<&PorticoConfig> for RepositoryOptions {
    fn from(config: &PorticoConfig) -> Self {
        Self {
            featured_minimum: config.featured_minimum,
            featured_slots: config.featured_slots,
            page_size: config.page_size,
            related_limit: config.related_limit,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }
}

/// `PORTICO_CONFIG` if set, else `portico.toml` in the OS config directory.
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "portico").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}
