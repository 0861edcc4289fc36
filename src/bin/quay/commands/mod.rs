//! Command implementations

pub mod check;
pub mod clean;
pub mod completions;
pub mod fetch;
pub mod init;
pub mod plan;
pub mod profiles;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::GlobalArgs;
use quay::core::Workspace;
use quay::resolver::{validate, ValidatedManifest};
use quay::util::config::{load_config, Config};
use quay::util::shell::ColorChoice;
use quay::util::{GlobalContext, Shell};

/// Shell configured from the global flags.
pub fn shell(global: &GlobalArgs) -> Shell {
    let color = if global.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    Shell::from_flags(global.quiet, global.verbose, color)
}

/// Locate the manifest: `--manifest-path` if given, else search upward.
pub fn manifest_path(ctx: &GlobalContext, global: &GlobalArgs) -> Result<PathBuf> {
    match &global.manifest_path {
        Some(path) if path.is_file() => Ok(ctx.cwd().join(path)),
        Some(path) => anyhow::bail!("manifest path `{}` does not exist", path.display()),
        None => Ok(ctx.find_manifest()?),
    }
}

/// Load the workspace with the requested profile applied.
pub fn load_workspace(ctx: &GlobalContext, global: &GlobalArgs) -> Result<Workspace> {
    let path = manifest_path(ctx, global)?;
    Workspace::new(&path, global.profile.as_deref())
}

/// Load and validate the workspace.
pub fn load_validated(
    ctx: &GlobalContext,
    global: &GlobalArgs,
) -> Result<(Workspace, ValidatedManifest)> {
    let ws = load_workspace(ctx, global)?;
    let validated = validate(ws.manifest().clone())?;
    Ok((ws, validated))
}

/// Global config merged under the project config, if there is a project.
pub fn load_settings(ctx: &GlobalContext, project_config: Option<&Path>) -> Config {
    load_config(&ctx.config_path(), project_config)
}

/// Artifact store directory: the flag, then config, then the user cache.
pub fn store_dir(ctx: &GlobalContext, flag: Option<&Path>, config: &Config) -> PathBuf {
    flag.map(|dir| ctx.cwd().join(dir))
        .or_else(|| config.store.dir.clone())
        .unwrap_or_else(|| ctx.default_store_dir())
}

/// Display `path` relative to the current directory when possible.
pub fn display_path(ctx: &GlobalContext, path: &Path) -> String {
    let rel = quay::util::fs::relative_path(ctx.cwd(), path);
    if rel.as_os_str().is_empty() {
        ".".to_string()
    } else {
        rel.display().to_string()
    }
}
