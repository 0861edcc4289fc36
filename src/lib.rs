//! Quay - manifest resolver for binary-framework packages
//!
//! This crate provides the core library functionality for Quay: parsing and
//! validating a package manifest, computing the target build order, and
//! resolving the binary artifacts the manifest references.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for Quay unit tests.
///
/// Only compiled for tests. Provides a mock HTTP fetcher and manifest
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{
    manifest::Manifest, product::Product, target::ArtifactReference, target::Target,
    workspace::Workspace,
};

pub use resolver::{build_order, validate, ManifestError, ValidatedManifest};
pub use sources::{ArtifactStore, FetchError};
pub use util::context::GlobalContext;
