//! `quay plan` command
//!
//! Prints the build order to stdout, one target per line, or the full plan
//! as JSON with `--json`.

use anyhow::Result;

use super::{load_validated, shell};
use crate::cli::{GlobalArgs, PlanArgs};
use quay::ops::BuildPlan;
use quay::util::GlobalContext;

pub fn execute(args: PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let shell = shell(global);

    let (_ws, validated) = load_validated(&ctx, global)?;
    for warning in validated.warnings() {
        shell.warn(warning);
    }

    let plan = BuildPlan::new(&validated);

    if args.json {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let width = plan.steps.len().to_string().len();
    for (i, step) in plan.steps.iter().enumerate() {
        let mut line = format!("{:>width$}. {} ({})", i + 1, step.target, step.kind);
        if !step.dependencies.is_empty() {
            line.push_str(&format!(" <- {}", step.dependencies.join(", ")));
        }
        println!("{}", line);
        if shell.is_verbose() {
            println!("{:>width$}  {} [{}]", "", step.location, step.fingerprint);
        }
    }

    Ok(())
}
