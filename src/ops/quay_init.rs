//! Implementation of `quay init`.

use std::path::Path;

use anyhow::{bail, Result};

use crate::core::manifest::generate_default_manifest;
use crate::core::workspace::MANIFEST_NAME;
use crate::util::fs::{ensure_dir, write_string};

/// Options for initializing a package.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Package name
    pub name: String,
}

/// Initialize a Quay package in `path`, creating the directory if needed.
///
/// Writes `Quay.toml`, a stub source file for the source target, and a
/// `.gitignore` (only when none exists). The binary framework itself is not
/// created.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<()> {
    if !is_valid_name(&opts.name) {
        bail!(
            "invalid package name `{}`: use letters, digits, `_` or `-`, starting with a letter",
            opts.name
        );
    }

    ensure_dir(path)?;

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    write_string(&manifest_path, &generate_default_manifest(&opts.name))?;

    let source = path
        .join("Sources")
        .join(&opts.name)
        .join(format!("{}.swift", opts.name));
    if !source.exists() {
        write_string(&source, &format!("@_exported import {}Binary\n", opts.name))?;
    }

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        write_string(&gitignore, "# Quay project state\n.quay/\n")?;
    }

    tracing::debug!("initialized package `{}` in {}", opts.name, path.display());
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
