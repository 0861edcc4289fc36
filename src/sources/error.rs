//! Artifact resolution errors.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error resolving a binary artifact. Every variant names the target.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum FetchError {
    #[error("checksum mismatch for `{target}`: expected {expected}, got {actual}")]
    #[diagnostic(
        code(quay::fetch::integrity_mismatch),
        help("The archive at the url changed, or the declared checksum is wrong")
    )]
    IntegrityMismatch {
        target: String,
        expected: String,
        actual: String,
    },

    #[error("failed to fetch `{target}` from {url}: {reason}")]
    #[diagnostic(code(quay::fetch::failure))]
    FetchFailure {
        target: String,
        url: String,
        reason: String,
    },

    #[error("local artifact `{target}` not found at {}", .path.display())]
    #[diagnostic(code(quay::fetch::local_missing))]
    LocalArtifactMissing { target: String, path: PathBuf },

    #[error("`{target}` is not in the artifact store and offline mode is enabled")]
    #[diagnostic(code(quay::fetch::offline))]
    Offline { target: String, url: String },

    #[error("artifact store error for `{target}`")]
    #[diagnostic(code(quay::fetch::store))]
    Store {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// The target the error is about.
    pub fn target(&self) -> &str {
        match self {
            FetchError::IntegrityMismatch { target, .. }
            | FetchError::FetchFailure { target, .. }
            | FetchError::LocalArtifactMissing { target, .. }
            | FetchError::Offline { target, .. }
            | FetchError::Store { target, .. } => target,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FetchError::IntegrityMismatch {
                target,
                expected,
                actual,
            } => Diagnostic::error(format!("checksum mismatch for `{}`", target))
                .with_context(format!("expected: {}", expected))
                .with_context(format!("actual:   {}", actual))
                .with_suggestion("Check that the url points at the intended release")
                .with_suggestion(format!(
                    "If the new archive is trusted, update the checksum of `{}`",
                    target
                )),

            FetchError::FetchFailure {
                target,
                url,
                reason,
            } => Diagnostic::error(format!("failed to fetch `{}`", target))
                .with_context(format!("url: {}", url))
                .with_context(reason.clone())
                .with_suggestion(suggestions::FETCH_FAILED),

            FetchError::LocalArtifactMissing { target, path } => {
                Diagnostic::error(format!("local artifact `{}` not found", target))
                    .with_location(path)
                    .with_suggestion("Check the `path` of the binary target")
                    .with_suggestion("Select a profile that fetches it remotely: `quay profiles`")
            }

            FetchError::Offline { target, url } => Diagnostic::error(format!(
                "`{}` must be downloaded but offline mode is enabled",
                target
            ))
            .with_context(format!("url: {}", url))
            .with_suggestion("Run `quay fetch` without `--offline` once to populate the store"),

            FetchError::Store { target, source } => {
                Diagnostic::error(format!("artifact store error for `{}`", target))
                    .with_context(source.to_string())
                    .with_suggestion("Run `quay clean` to reset the artifact store")
            }
        }
    }
}
