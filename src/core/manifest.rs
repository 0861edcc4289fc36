//! Quay.toml manifest parsing and schema.
//!
//! The manifest is a single template describing platforms, products and
//! targets, plus named profiles that adjust the template (see
//! [`crate::core::profile`]). Targets and products are arrays of tables so
//! that declaration order is kept and duplicate names reach validation
//! instead of being rejected by the TOML parser.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::platform::PlatformConstraint;
use crate::core::product::Product;
use crate::core::profile::Profile;
use crate::core::target::{
    default_source_path, ArtifactLocation, ArtifactReference, Resource, ResourceMode,
    SourceTarget, Target, TargetKind,
};
use crate::util::diagnostic::suggestions;

/// Package metadata from the [package] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageMetadata {
    /// Package name
    pub name: String,

    /// Package description
    #[serde(default)]
    pub description: Option<String>,

    /// Profile applied when none is selected explicitly
    #[serde(default)]
    pub default_profile: Option<String>,
}

/// The parsed Quay.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub package: PackageMetadata,

    /// Minimum platform versions
    pub platforms: Vec<PlatformConstraint>,

    /// Exported products
    pub products: Vec<Product>,

    /// Declared targets, in declaration order
    pub targets: Vec<Target>,

    /// Named profiles
    pub profiles: BTreeMap<String, Profile>,

    /// Profile that has been applied to this manifest, if any
    pub active_profile: Option<String>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    package: PackageMetadata,

    #[serde(default)]
    platforms: Vec<PlatformConstraint>,

    #[serde(default)]
    products: Vec<Product>,

    #[serde(default)]
    targets: Vec<RawTarget>,

    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

/// Raw target from TOML (before processing).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawTarget {
    name: String,

    kind: TargetKind,

    #[serde(default)]
    path: Option<PathBuf>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    checksum: Option<String>,

    #[serde(default)]
    sources: Vec<PathBuf>,

    #[serde(default)]
    dependencies: Vec<String>,

    #[serde(default)]
    resources: Vec<RawResource>,
}

/// A resource is either a bare path (processed) or a table with a mode.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResource {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        mode: ResourceMode,
    },
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let targets = raw
            .targets
            .into_iter()
            .map(Self::convert_target)
            .collect::<Result<Vec<_>>>()?;

        if let Some(ref default) = raw.package.default_profile {
            if !raw.profiles.contains_key(default) {
                bail!(
                    "default-profile `{}` is not defined in [profiles] of {}",
                    default,
                    path.display()
                );
            }
        }

        Ok(Manifest {
            package: raw.package,
            platforms: raw.platforms,
            products: raw.products,
            targets,
            profiles: raw.profiles,
            active_profile: None,
            manifest_dir,
        })
    }

    fn convert_target(raw: RawTarget) -> Result<Target> {
        match raw.kind {
            TargetKind::Binary => {
                if !raw.sources.is_empty() || !raw.dependencies.is_empty() || !raw.resources.is_empty()
                {
                    bail!(
                        "binary target `{}` cannot declare sources, dependencies or resources",
                        raw.name
                    );
                }
                let location = artifact_location(&raw.name, raw.path, raw.url.as_deref())?;
                Ok(Target::Binary(ArtifactReference {
                    name: raw.name,
                    location,
                    checksum: raw.checksum.map(|c| normalize_checksum(&c)),
                }))
            }
            TargetKind::Source => {
                if raw.url.is_some() || raw.checksum.is_some() {
                    bail!(
                        "source target `{}` cannot declare `url` or `checksum`",
                        raw.name
                    );
                }
                let path = raw.path.unwrap_or_else(|| default_source_path(&raw.name));
                let resources = raw
                    .resources
                    .into_iter()
                    .map(|r| match r {
                        RawResource::Simple(path) => Resource {
                            path,
                            mode: ResourceMode::Process,
                        },
                        RawResource::Detailed { path, mode } => Resource { path, mode },
                    })
                    .collect();

                Ok(Target::Source(SourceTarget {
                    name: raw.name,
                    path,
                    sources: raw.sources,
                    dependencies: raw.dependencies,
                    resources,
                }))
            }
        }
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Get a target by name (first declaration wins).
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name() == name)
    }

    /// Get a product by name.
    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Iterate over binary targets in declaration order.
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactReference> {
        self.targets.iter().filter_map(Target::as_artifact)
    }

    /// Iterate over source targets in declaration order.
    pub fn source_targets(&self) -> impl Iterator<Item = &SourceTarget> {
        self.targets.iter().filter_map(Target::as_source)
    }

    /// Names of all defined profiles, sorted.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Return a copy of this manifest with the named profile applied.
    pub fn with_profile(&self, name: &str) -> Result<Manifest> {
        let profile = self.profiles.get(name).ok_or_else(|| {
            let available: Vec<_> = self.profile_names().collect();
            if available.is_empty() {
                anyhow::anyhow!("unknown profile `{}`: the manifest defines no profiles", name)
            } else {
                anyhow::anyhow!(
                    "unknown profile `{}`; available profiles: {}\nhelp: {}",
                    name,
                    available.join(", "),
                    suggestions::PROFILE_NOT_FOUND
                )
            }
        })?;

        let mut manifest = self.clone();
        profile
            .apply(&mut manifest)
            .with_context(|| format!("failed to apply profile `{}`", name))?;
        manifest.active_profile = Some(name.to_string());

        tracing::debug!(
            "applied profile `{}`: {} target(s), {} product(s)",
            name,
            manifest.targets.len(),
            manifest.products.len()
        );

        Ok(manifest)
    }

    /// Apply the explicitly requested profile, else the package default,
    /// else return the template unchanged.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<Manifest> {
        match requested.or(self.package.default_profile.as_deref()) {
            Some(name) => self.with_profile(name),
            None => Ok(self.clone()),
        }
    }
}

/// Build an artifact location from the mutually exclusive `path` / `url` keys.
pub(crate) fn artifact_location(
    name: &str,
    path: Option<PathBuf>,
    url: Option<&str>,
) -> Result<ArtifactLocation> {
    match (path, url) {
        (Some(path), None) => Ok(ArtifactLocation::LocalPath(path)),
        (None, Some(url)) => {
            let url = Url::parse(url)
                .with_context(|| format!("binary target `{}` has an invalid url `{}`", name, url))?;
            Ok(ArtifactLocation::RemoteUrl(url))
        }
        (Some(_), Some(_)) => bail!(
            "binary target `{}` declares both `path` and `url`; pick one",
            name
        ),
        (None, None) => bail!("binary target `{}` needs either `path` or `url`", name),
    }
}

pub(crate) fn normalize_checksum(checksum: &str) -> String {
    checksum.trim().to_ascii_lowercase()
}

/// Generate a Quay.toml template for a new package.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"

[[platforms]]
name = "ios"
min-version = "13.0"

[[products]]
name = "{name}"
targets = ["{name}Binary", "{name}"]

[[targets]]
name = "{name}Binary"
kind = "binary"
path = "{name}Binary.xcframework"

[[targets]]
name = "{name}"
kind = "source"
sources = ["{name}.swift"]
dependencies = ["{name}Binary"]

# Profiles adjust the template above; select one with `--profile <name>`.
#
# [profiles.release.artifacts.{name}Binary]
# url = "https://example.com/{name}Binary.xcframework.zip"
# checksum = "<sha256>"
"#
    )
}
