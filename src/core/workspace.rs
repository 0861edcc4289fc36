//! Workspace - the loaded manifest and its project paths.
//!
//! A Workspace holds both the manifest template as written and the manifest
//! with the selected profile applied. Everything downstream operates on the
//! profile-applied manifest.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;

use crate::core::Manifest;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Quay.toml";

/// Project-local state directory name.
pub const PROJECT_DIR_NAME: &str = ".quay";

/// Error locating a manifest on disk.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no manifest found: could not find Quay.toml in {} or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },
}

/// Look for `Quay.toml` directly inside `dir`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, LocateError> {
    let candidate = dir.join(MANIFEST_NAME);
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(LocateError::NotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// Project-local state directory of the package rooted at `root`.
pub fn project_dir(root: &Path) -> PathBuf {
    root.join(PROJECT_DIR_NAME)
}

/// Project configuration file of the package rooted at `root`.
pub fn project_config_path(root: &Path) -> PathBuf {
    project_dir(root).join("config.toml")
}

/// A loaded manifest with its profile applied.
#[derive(Debug)]
pub struct Workspace {
    /// Manifest as written
    template: Manifest,

    /// Manifest with the selected profile applied
    manifest: Manifest,

    /// Directory containing the manifest
    root: PathBuf,

    /// Path of the manifest file
    manifest_path: PathBuf,
}

impl Workspace {
    /// Load a workspace from a manifest path, applying `profile` (or the
    /// package's default profile when `None`).
    pub fn new(manifest_path: &Path, profile: Option<&str>) -> Result<Self> {
        let template = Manifest::load(manifest_path)?;
        let manifest = template.select_profile(profile)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        tracing::debug!(
            "loaded {} ({} target(s), profile: {})",
            manifest_path.display(),
            manifest.targets.len(),
            manifest.active_profile.as_deref().unwrap_or("<none>")
        );

        Ok(Workspace {
            template,
            manifest,
            root,
            manifest_path: manifest_path.to_path_buf(),
        })
    }

    /// The manifest with the selected profile applied.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The manifest as written, before any profile.
    pub fn template(&self) -> &Manifest {
        &self.template
    }

    /// Name of the applied profile, if any.
    pub fn profile(&self) -> Option<&str> {
        self.manifest.active_profile.as_deref()
    }

    /// Directory containing the manifest.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Project configuration file (.quay/config.toml).
    pub fn config_path(&self) -> PathBuf {
        project_config_path(&self.root)
    }
}
