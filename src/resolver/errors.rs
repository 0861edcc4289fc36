//! Manifest validation errors and diagnostics.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::Platform;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// What referenced an undeclared target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referrer {
    /// A product's export list
    Product(String),
    /// A source target's dependency list
    Target(String),
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referrer::Product(name) => write!(f, "product `{}`", name),
            Referrer::Target(name) => write!(f, "target `{}`", name),
        }
    }
}

/// Error found while validating a manifest. Validation never performs I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("duplicate target name `{name}`")]
    #[diagnostic(
        code(quay::manifest::duplicate_target),
        help("Rename or remove one of the declarations")
    )]
    DuplicateTargetName { name: String, count: usize },

    #[error("{referrer} references undeclared target `{name}`")]
    #[diagnostic(code(quay::manifest::unresolved_reference))]
    UnresolvedReference {
        name: String,
        referrer: Referrer,
        suggestions: Vec<String>,
    },

    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(quay::manifest::cycle),
        help("Break the cycle by removing or restructuring dependencies")
    )]
    CyclicDependency { cycle: Vec<String> },

    #[error("remote artifact `{target}` has no checksum")]
    #[diagnostic(
        code(quay::manifest::missing_checksum),
        help("Add `checksum = \"<sha256>\"` next to the url")
    )]
    MissingIntegrityChecksum { target: String, url: String },

    #[error("platform `{platform}` is constrained more than once")]
    #[diagnostic(code(quay::manifest::duplicate_platform))]
    DuplicatePlatform { platform: Platform },

    #[error("invalid minimum version `{version}` for platform `{platform}`: {reason}")]
    #[diagnostic(code(quay::manifest::invalid_platform_version))]
    InvalidPlatformVersion {
        platform: Platform,
        version: String,
        reason: String,
    },
}

impl ManifestError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ManifestError::DuplicateTargetName { name, count } => {
                Diagnostic::error(format!("duplicate target name `{}`", name))
                    .with_context(format!("`{}` is declared {} times", name, count))
                    .with_suggestion("Rename or remove one of the declarations")
            }

            ManifestError::UnresolvedReference {
                name,
                referrer,
                suggestions,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "{} references undeclared target `{}`",
                    referrer, name
                ));

                if !suggestions.is_empty() {
                    diag = diag.with_context(format!("did you mean: {}?", suggestions.join(", ")));
                }

                diag.with_suggestion(format!("Declare a target named `{}`", name))
                    .with_suggestion(format!("Remove `{}` from {}", name, referrer))
                    .with_suggestion(suggestions::TARGET_NOT_FOUND)
            }

            ManifestError::CyclicDependency { cycle } => {
                Diagnostic::error("cyclic dependency between source targets")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion("Break the cycle by removing or restructuring dependencies")
            }

            ManifestError::MissingIntegrityChecksum { target, url } => {
                Diagnostic::error(format!("remote artifact `{}` has no checksum", target))
                    .with_context(format!("url: {}", url))
                    .with_suggestion(
                        "Add the SHA-256 of the archive: `checksum = \"<sha256>\"`",
                    )
                    .with_suggestion("Run `shasum -a 256 <archive>` to compute it")
            }

            ManifestError::DuplicatePlatform { platform } => {
                Diagnostic::error(format!("platform `{}` is constrained more than once", platform))
                    .with_suggestion(format!("Keep a single [[platforms]] entry for `{}`", platform))
            }

            ManifestError::InvalidPlatformVersion {
                platform,
                version,
                reason,
            } => Diagnostic::error(format!(
                "invalid minimum version `{}` for platform `{}`",
                version, platform
            ))
            .with_context(reason.clone())
            .with_suggestion("Use a dotted numeric version such as \"12.4\""),
        }
    }
}

/// Names from `candidates` close enough to `name` to be a likely typo.
pub(crate) fn similar_names<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let lower = name.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| {
            let c_lower = c.to_lowercase();
            c_lower == lower || edit_distance(&c_lower, &lower) <= 2
        })
        .map(str::to_string)
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut cur = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        prev = cur;
    }

    prev[b.len()]
}
