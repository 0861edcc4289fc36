//! Source layout check.
//!
//! Source and resource files are consumed by the downstream build tool, so a
//! missing file is reported as a warning, never as a validation error.

use std::fmt;
use std::path::PathBuf;

use crate::resolver::ValidatedManifest;
use crate::util::fs::relative_path;

/// A declared file or directory that does not exist on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutIssue {
    /// The target root directory is missing; its files are not listed
    /// separately.
    MissingRoot { target: String, path: PathBuf },
    MissingSource { target: String, path: PathBuf },
    MissingResource { target: String, path: PathBuf },
}

impl LayoutIssue {
    pub fn target(&self) -> &str {
        match self {
            LayoutIssue::MissingRoot { target, .. }
            | LayoutIssue::MissingSource { target, .. }
            | LayoutIssue::MissingResource { target, .. } => target,
        }
    }
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutIssue::MissingRoot { target, path } => write!(
                f,
                "source directory of `{}` does not exist: {}",
                target,
                path.display()
            ),
            LayoutIssue::MissingSource { target, path } => {
                write!(f, "source file of `{}` not found: {}", target, path.display())
            }
            LayoutIssue::MissingResource { target, path } => {
                write!(f, "resource of `{}` not found: {}", target, path.display())
            }
        }
    }
}

/// Check that every source target's declared files exist.
///
/// Paths in the returned issues are relative to the manifest directory.
pub fn check_layout(validated: &ValidatedManifest) -> Vec<LayoutIssue> {
    let manifest = validated.manifest();
    let base = &manifest.manifest_dir;
    let mut issues = Vec::new();

    for target in manifest.source_targets() {
        let root = target.root(base);
        if !root.is_dir() {
            issues.push(LayoutIssue::MissingRoot {
                target: target.name.clone(),
                path: relative_path(base, &root),
            });
            continue;
        }

        for source in &target.sources {
            let path = root.join(source);
            if !path.exists() {
                issues.push(LayoutIssue::MissingSource {
                    target: target.name.clone(),
                    path: relative_path(base, &path),
                });
            }
        }

        for resource in &target.resources {
            let path = root.join(&resource.path);
            if !path.exists() {
                issues.push(LayoutIssue::MissingResource {
                    target: target.name.clone(),
                    path: relative_path(base, &path),
                });
            }
        }
    }

    tracing::debug!("layout check found {} issue(s)", issues.len());
    issues
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::Manifest;
    use crate::resolver::validate;
    use crate::test_support::fixtures::WALLEE_MANIFEST;
    use tempfile::TempDir;

    fn wallee_in(dir: &Path) -> ValidatedManifest {
        let manifest = Manifest::parse(WALLEE_MANIFEST, &dir.join("Quay.toml")).unwrap();
        validate(manifest).unwrap()
    }

    #[test]
    fn test_missing_root_reported_once() {
        let tmp = TempDir::new().unwrap();
        let issues = check_layout(&wallee_in(tmp.path()));

        assert_eq!(
            issues,
            [LayoutIssue::MissingRoot {
                target: "PaymentResources".to_string(),
                path: PathBuf::from("Sources/PaymentResources"),
            }]
        );
    }

    #[test]
    fn test_missing_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Sources/PaymentResources");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("PaymentResources.swift"), "import Foundation\n").unwrap();

        let issues = check_layout(&wallee_in(tmp.path()));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].target(), "PaymentResources");
        assert!(matches!(issues[0], LayoutIssue::MissingResource { .. }));
        assert!(issues[0]
            .to_string()
            .contains("walleetestsdkbundle.jsbundle"));
    }

    #[test]
    fn test_complete_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Sources/PaymentResources");
        std::fs::create_dir_all(root.join("walleetestsdkbundle.jsbundle")).unwrap();
        std::fs::write(root.join("PaymentResources.swift"), "").unwrap();

        assert!(check_layout(&wallee_in(tmp.path())).is_empty());
    }
}
