//! Target definitions - the named units a manifest declares.
//!
//! A target is either a pre-built binary artifact (an [`ArtifactReference`])
//! or a unit compiled from source by the downstream build tool
//! (a [`SourceTarget`]).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

/// The kind of a declared target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Pre-built binary framework
    #[serde(alias = "artifact")]
    Binary,

    /// Compiled from source
    Source,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Binary => write!(f, "binary"),
            TargetKind::Source => write!(f, "source"),
        }
    }
}

/// Where a binary artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactLocation {
    /// Path relative to the manifest directory.
    LocalPath(PathBuf),

    /// Remote archive, verified by checksum after download.
    RemoteUrl(Url),
}

impl ArtifactLocation {
    pub fn is_remote(&self) -> bool {
        matches!(self, ArtifactLocation::RemoteUrl(_))
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactLocation::LocalPath(path) => write!(f, "{}", path.display()),
            ArtifactLocation::RemoteUrl(url) => write!(f, "{}", url),
        }
    }
}

/// A pre-built binary dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReference {
    pub name: String,
    pub location: ArtifactLocation,

    /// Lowercase hex SHA-256 of the artifact bytes. Required for remote
    /// artifacts.
    pub checksum: Option<String>,
}

impl ArtifactReference {
    /// A binary target at a path relative to the manifest directory.
    pub fn local(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ArtifactReference {
            name: name.into(),
            location: ArtifactLocation::LocalPath(path.into()),
            checksum: None,
        }
    }

    /// A binary target downloaded from `url`.
    pub fn remote(name: impl Into<String>, url: Url, checksum: Option<String>) -> Self {
        ArtifactReference {
            name: name.into(),
            location: ArtifactLocation::RemoteUrl(url),
            checksum,
        }
    }

    /// File name used when the artifact is stored locally.
    pub fn file_name(&self) -> String {
        match &self.location {
            ArtifactLocation::LocalPath(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.name.clone()),
            ArtifactLocation::RemoteUrl(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.zip", self.name)),
        }
    }
}

/// How the downstream tool treats a resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// Platform-specific processing (asset compilation, localization)
    #[default]
    Process,

    /// Copied verbatim, preserving directory structure
    Copy,
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceMode::Process => write!(f, "process"),
            ResourceMode::Copy => write!(f, "copy"),
        }
    }
}

/// A non-code file bundled with a source target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub path: PathBuf,

    #[serde(default)]
    pub mode: ResourceMode,
}

/// A unit compiled from source by the downstream build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTarget {
    pub name: String,

    /// Target root, relative to the manifest directory.
    pub path: PathBuf,

    /// Source files relative to `path`, in declaration order.
    pub sources: Vec<PathBuf>,

    /// Names of other targets in the same manifest.
    pub dependencies: Vec<String>,

    /// Resource files relative to `path`.
    pub resources: Vec<Resource>,
}

impl SourceTarget {
    /// A source target rooted at the conventional `Sources/<name>`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        SourceTarget {
            path: default_source_path(&name),
            name,
            sources: Vec::new(),
            dependencies: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn with_resource(mut self, path: impl Into<PathBuf>, mode: ResourceMode) -> Self {
        self.resources.push(Resource {
            path: path.into(),
            mode,
        });
        self
    }

    /// Absolute target root given the manifest directory.
    pub fn root(&self, manifest_dir: &Path) -> PathBuf {
        manifest_dir.join(&self.path)
    }
}

/// Conventional root for a source target with no explicit path.
pub fn default_source_path(name: &str) -> PathBuf {
    Path::new("Sources").join(name)
}

/// A declared target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Binary(ArtifactReference),
    Source(SourceTarget),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Binary(a) => &a.name,
            Target::Source(s) => &s.name,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Binary(_) => TargetKind::Binary,
            Target::Source(_) => TargetKind::Source,
        }
    }

    /// Declared dependency names. Binary targets have none.
    pub fn dependencies(&self) -> &[String] {
        match self {
            Target::Binary(_) => &[],
            Target::Source(s) => &s.dependencies,
        }
    }

    pub fn as_artifact(&self) -> Option<&ArtifactReference> {
        match self {
            Target::Binary(a) => Some(a),
            Target::Source(_) => None,
        }
    }

    pub fn as_source(&self) -> Option<&SourceTarget> {
        match self {
            Target::Binary(_) => None,
            Target::Source(s) => Some(s),
        }
    }
}

impl From<ArtifactReference> for Target {
    fn from(a: ArtifactReference) -> Self {
        Target::Binary(a)
    }
}

impl From<SourceTarget> for Target {
    fn from(s: SourceTarget) -> Self {
        Target::Source(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_file_name() {
        let local = ArtifactReference::local("TwintSDK", "Frameworks/TwintSDK.xcframework");
        assert_eq!(local.file_name(), "TwintSDK.xcframework");

        let url = Url::parse("https://cdn.example.com/sdk/WalleeTestSdk.xcframework.zip").unwrap();
        let remote = ArtifactReference::remote("WalleeTestSdk", url, None);
        assert_eq!(remote.file_name(), "WalleeTestSdk.xcframework.zip");

        let bare = Url::parse("https://cdn.example.com/").unwrap();
        let remote = ArtifactReference::remote("Bare", bare, None);
        assert_eq!(remote.file_name(), "Bare.zip");
    }

    #[test]
    fn test_source_target_defaults() {
        let target = SourceTarget::new("PaymentResources")
            .with_source("PaymentResources.swift")
            .with_dependency("WalleeTestSdk")
            .with_resource("bundle.jsbundle", ResourceMode::Process);

        assert_eq!(target.path, PathBuf::from("Sources/PaymentResources"));
        assert_eq!(target.dependencies, vec!["WalleeTestSdk"]);
        assert_eq!(
            target.root(Path::new("/pkg")),
            PathBuf::from("/pkg/Sources/PaymentResources")
        );
    }

    #[test]
    fn test_target_accessors() {
        let bin: Target = ArtifactReference::local("A", "A.xcframework").into();
        let src: Target = SourceTarget::new("B").with_dependency("A").into();

        assert_eq!(bin.kind(), TargetKind::Binary);
        assert!(bin.dependencies().is_empty());
        assert_eq!(src.dependencies(), ["A".to_string()]);
        assert!(src.as_source().is_some());
        assert!(bin.as_artifact().is_some());
    }
}
