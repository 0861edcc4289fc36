//! High-level operations.
//!
//! This module contains the implementation of Quay commands.

pub mod check;
pub mod fetch;
pub mod plan;
pub mod quay_init;
pub mod tree;

pub use check::{check_layout, LayoutIssue};
pub use fetch::{
    resolve_artifacts, ArtifactOutcome, ArtifactReport, ArtifactStatus, FetchOptions,
};
pub use plan::{BuildPlan, PlanStep};
pub use quay_init::{init_project, InitOptions};
pub use tree::{product_tree, TreeOptions};
