//! Core data structures for Quay.
//!
//! This module contains the manifest model:
//! - Platforms and minimum versions
//! - Targets (binary artifacts and source targets)
//! - Products
//! - Profiles and the loaded workspace

pub mod manifest;
pub mod platform;
pub mod product;
pub mod profile;
pub mod target;
pub mod workspace;

pub use manifest::{Manifest, PackageMetadata};
pub use platform::{Platform, PlatformConstraint};
pub use product::{LibraryKind, Product};
pub use profile::Profile;
pub use target::{
    ArtifactLocation, ArtifactReference, Resource, ResourceMode, SourceTarget, Target, TargetKind,
};
pub use workspace::{
    find_manifest, project_config_path, project_dir, LocateError, Workspace, MANIFEST_NAME,
    PROJECT_DIR_NAME,
};
