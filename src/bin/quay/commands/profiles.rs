//! `quay profiles` command

use anyhow::Result;

use super::load_workspace;
use crate::cli::GlobalArgs;
use quay::util::GlobalContext;

/// List every profile in the manifest template. The selected profile is
/// marked with `*`.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let ws = load_workspace(&ctx, global)?;
    let template = ws.template();

    if template.profiles.is_empty() {
        println!("no profiles defined in {}", ws.manifest_path().display());
        return Ok(());
    }

    let width = template.profile_names().map(str::len).max().unwrap_or(0);
    for (name, profile) in &template.profiles {
        let marker = if ws.profile() == Some(name.as_str()) {
            '*'
        } else {
            ' '
        };
        match &profile.description {
            Some(description) => {
                println!("{} {:<width$}  {}", marker, name, description, width = width)
            }
            None => println!("{} {}", marker, name),
        }
    }

    if let Some(default) = &template.package.default_profile {
        println!("\ndefault profile: {}", default);
    }

    Ok(())
}
