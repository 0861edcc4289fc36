//! Global context for Quay operations.
//!
//! Provides centralized access to the working directory, the per-user
//! directories.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

use crate::core::workspace::{find_manifest as ws_find_manifest, LocateError};

/// Project directories for Quay
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "quay", "quay"));

/// Global context containing the working directory and per-user paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Quay settings (~/.quay/)
    home: PathBuf,

    /// Per-user cache directory
    cache: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = BaseDirs::new()
            .map(|b| b.home_dir().join(".quay"))
            .unwrap_or_else(|| PathBuf::from(".quay"));

        let cache = match PROJECT_DIRS.as_ref() {
            Some(dirs) => dirs.cache_dir().to_path_buf(),
            None => home.join("cache"),
        };

        Ok(GlobalContext {
            cwd,
            home,
            cache,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The Quay home directory (~/.quay/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Default artifact store location.
    pub fn default_store_dir(&self) -> PathBuf {
        self.cache.join("artifacts")
    }

    /// Global configuration file (~/.quay/config.toml).
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Find `Quay.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, LocateError> {
        let mut current = self.cwd.clone();
        loop {
            match ws_find_manifest(&current) {
                Ok(path) => return Ok(path),
                Err(LocateError::NotFound { .. }) => {
                    if !current.pop() {
                        return Err(LocateError::NotFound {
                            dir: self.cwd.clone(),
                        });
                    }
                }
            }
        }
    }
}
