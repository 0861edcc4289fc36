//! `quay check` command

use std::time::Instant;

use anyhow::{bail, Result};

use super::{load_validated, shell};
use crate::cli::{CheckArgs, GlobalArgs};
use quay::ops::check_layout;
use quay::util::diagnostic::{emit, Diagnostic};
use quay::util::shell::format_duration;
use quay::util::{GlobalContext, Status};

pub fn execute(args: CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let shell = shell(global);
    let start = Instant::now();

    let manifest_path = super::manifest_path(&ctx, global)?;
    shell.status(
        Status::Checking,
        super::display_path(&ctx, &manifest_path),
    );

    let (ws, validated) = load_validated(&ctx, global)?;
    let manifest = validated.manifest();

    if let Some(profile) = ws.profile() {
        shell.verbose(format!("profile: {}", profile));
    }
    shell.verbose(format!("build order: {}", validated.build_order().join(", ")));

    let issues = check_layout(&validated);
    if !shell.is_quiet() {
        let warnings = validated
            .warnings()
            .iter()
            .map(ToString::to_string)
            .chain(issues.iter().map(ToString::to_string));
        for warning in warnings {
            let diagnostic = Diagnostic::warning(warning).with_location(manifest_path.clone());
            emit(&diagnostic, shell.use_color());
        }
    }

    let warnings = validated.warnings().len() + issues.len();
    shell.status(
        Status::Finished,
        format!(
            "`{}`: {} target(s), {} product(s), {} warning(s) in {}",
            manifest.name(),
            manifest.targets.len(),
            manifest.products.len(),
            warnings,
            format_duration(start.elapsed())
        ),
    );

    if args.deny_warnings && warnings > 0 {
        bail!("{} warning(s) denied by --deny-warnings", warnings);
    }

    Ok(())
}
