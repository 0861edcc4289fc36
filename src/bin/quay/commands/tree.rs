//! `quay tree` command

use anyhow::Result;

use super::load_validated;
use crate::cli::{GlobalArgs, TreeArgs};
use quay::ops::{product_tree, TreeOptions};
use quay::util::GlobalContext;

pub fn execute(args: TreeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let (_ws, validated) = load_validated(&ctx, global)?;

    let opts = TreeOptions {
        product: args.product,
        depth: args.depth,
        duplicates: args.duplicates,
    };

    print!("{}", product_tree(&validated, &opts)?);
    Ok(())
}
