//! Configuration file support for Quay.
//!
//! Quay reads two configuration file locations:
//! - Global: `~/.quay/config.toml` - User-wide defaults
//! - Project: `.quay/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sources::fetcher::{DEFAULT_RETRIES, DEFAULT_TIMEOUT};
use crate::util::fs::read_to_string;

/// Quay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network settings
    pub net: NetConfig,

    /// Artifact fetch settings
    pub fetch: FetchConfig,

    /// Artifact store settings
    pub store: StoreConfig,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NetConfig {
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Retries after a failed request
    pub retries: Option<u32>,

    /// Offline mode (never download, only use the artifact store)
    pub offline: Option<bool>,
}

/// Fetch-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Parallel downloads (None = one per CPU)
    pub jobs: Option<usize>,
}

/// Artifact store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store location (default: per-user cache directory). A relative path
    /// is relative to the directory of the config file that sets it.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if let (Some(dir), Some(base)) = (config.store.dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }

        Ok(config)
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.net.timeout_secs.is_some() {
            self.net.timeout_secs = other.net.timeout_secs;
        }
        if other.net.retries.is_some() {
            self.net.retries = other.net.retries;
        }
        if other.net.offline.is_some() {
            self.net.offline = other.net.offline;
        }

        if other.fetch.jobs.is_some() {
            self.fetch.jobs = other.fetch.jobs;
        }

        if other.store.dir.is_some() {
            self.store.dir = other.store.dir;
        }
    }

    pub fn timeout(&self) -> Duration {
        self.net
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn retries(&self) -> u32 {
        self.net.retries.unwrap_or(DEFAULT_RETRIES)
    }

    pub fn offline(&self) -> bool {
        self.net.offline.unwrap_or(false)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.quay/config.toml)
/// 2. Global config (~/.quay/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: Option<&Path>) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if let Some(project_path) = project_path.filter(|p| p.exists()) {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
