//! `quay clean` command

use anyhow::Result;

use super::{load_settings, shell, store_dir};
use crate::cli::{CleanArgs, GlobalArgs};
use quay::core::{project_config_path, project_dir};
use quay::sources::ArtifactStore;
use quay::util::fs::{dir_size, remove_dir_all_if_exists};
use quay::util::{GlobalContext, Status};

pub fn execute(args: CleanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let shell = shell(global);

    // Outside a package only the global config applies.
    let project_root = super::manifest_path(&ctx, global)
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    let project_config = project_root.as_deref().map(project_config_path);
    let config = load_settings(&ctx, project_config.as_deref());

    let store = ArtifactStore::new(store_dir(&ctx, args.store_dir.as_deref(), &config));
    let count = store.entries()?.len();
    let size = dir_size(store.root())?;
    store.clear()?;
    shell.status(
        Status::Removed,
        format!(
            "{} ({} artifact(s), {} bytes)",
            store.root().display(),
            count,
            size
        ),
    );

    if args.project {
        let Some(root) = project_root else {
            anyhow::bail!("--project needs a Quay.toml in this directory or a parent");
        };
        let quay_dir = project_dir(&root);
        remove_dir_all_if_exists(&quay_dir)?;
        shell.status(Status::Removed, quay_dir.display());
    }

    Ok(())
}
