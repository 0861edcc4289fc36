//! Manifest profiles.
//!
//! A profile is a named set of overrides applied on top of the manifest
//! template: replacement platform minimums, excluded targets, and
//! alternative locations for binary artifacts.
//!
//! ```toml
//! [profiles.legacy]
//! platforms = [{ name = "ios", min-version = "12.0" }]
//! exclude = ["ThreeDS_SDK"]
//!
//! [profiles.remote.artifacts.WalleeTestSdk]
//! url = "https://example.com/WalleeTestSdk.xcframework.zip"
//! checksum = "…"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::core::manifest::{artifact_location, normalize_checksum, Manifest};
use crate::core::platform::PlatformConstraint;
use crate::core::target::Target;

/// Overrides applied to the manifest template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Profile {
    /// Shown by `quay profiles`
    #[serde(default)]
    pub description: Option<String>,

    /// Replace (or add) the constraint for each listed platform
    #[serde(default)]
    pub platforms: Vec<PlatformConstraint>,

    /// Targets removed from the manifest and from every product
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Alternative locations for binary targets, keyed by target name
    #[serde(default)]
    pub artifacts: BTreeMap<String, ArtifactOverride>,
}

/// Replacement location for a binary target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactOverride {
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub checksum: Option<String>,
}

impl Profile {
    /// Apply this profile to `manifest` in place.
    ///
    /// Artifact overrides are applied before exclusions. Exclusions strip the
    /// excluded names from product export lists but leave dependency lists
    /// untouched, so a dangling dependency is caught by validation.
    pub fn apply(&self, manifest: &mut Manifest) -> Result<()> {
        for constraint in &self.platforms {
            match manifest
                .platforms
                .iter_mut()
                .find(|c| c.platform == constraint.platform)
            {
                Some(existing) => existing.minimum_version = constraint.minimum_version.clone(),
                None => manifest.platforms.push(constraint.clone()),
            }
        }

        for (name, over) in &self.artifacts {
            let artifact = manifest.targets.iter_mut().find_map(|t| match t {
                Target::Binary(a) if a.name == *name => Some(a),
                _ => None,
            });
            let Some(artifact) = artifact else {
                bail!("artifact override for `{}` does not match a binary target", name);
            };

            artifact.location = artifact_location(name, over.path.clone(), over.url.as_deref())?;
            artifact.checksum = over.checksum.as_deref().map(normalize_checksum);
        }

        for name in &self.exclude {
            if !manifest.targets.iter().any(|t| t.name() == name) {
                bail!("cannot exclude `{}`: no such target", name);
            }
        }

        if !self.exclude.is_empty() {
            manifest
                .targets
                .retain(|t| !self.exclude.iter().any(|e| e == t.name()));
            for product in &mut manifest.products {
                product.targets.retain(|t| !self.exclude.contains(t));
            }
        }

        Ok(())
    }
}
