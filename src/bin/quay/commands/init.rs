//! `quay init` command

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::shell;
use crate::cli::{GlobalArgs, InitArgs};
use quay::ops::{init_project, InitOptions};
use quay::util::fs::normalize_path;
use quay::util::{GlobalContext, Status};

/// Package name from `--name`, else the directory name.
pub fn determine_package_name(name: Option<String>, path: &Path) -> String {
    name.unwrap_or_else(|| {
        normalize_path(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

pub fn execute(args: InitArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let shell = shell(global);

    let path = ctx
        .cwd()
        .join(args.path.unwrap_or_else(|| PathBuf::from(".")));
    let name = determine_package_name(args.name, &path);

    init_project(&path, &InitOptions { name: name.clone() })?;

    shell.status(Status::Created, format!("package `{}`", name));
    Ok(())
}
