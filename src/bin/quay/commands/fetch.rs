//! `quay fetch` command

use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::Result;

use super::{display_path, load_settings, load_validated, shell, store_dir};
use crate::cli::{FetchArgs, GlobalArgs};
use quay::ops::{resolve_artifacts, ArtifactStatus, BuildPlan, FetchOptions};
use quay::sources::{ArtifactStore, HttpFetcher};
use quay::util::shell::format_duration;
use quay::util::{GlobalContext, Status};

pub fn execute(args: FetchArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let shell = shell(global);
    let start = Instant::now();

    let (ws, validated) = load_validated(&ctx, global)?;
    let config = load_settings(&ctx, Some(&ws.config_path()));

    let store = ArtifactStore::new(store_dir(&ctx, args.store_dir.as_deref(), &config));
    shell.verbose(format!("artifact store: {}", store.root().display()));

    let fetcher = HttpFetcher::new(config.timeout(), config.retries())?;
    let opts = FetchOptions {
        jobs: args.jobs.or(config.fetch.jobs),
        offline: args.offline || config.offline(),
        progress: !shell.is_quiet() && io::stderr().is_terminal(),
    };

    let remote = validated
        .manifest()
        .artifacts()
        .filter(|a| a.location.is_remote())
        .count();
    if remote > 0 {
        shell.status(
            Status::Fetching,
            format!("{} remote artifact(s) for `{}`", remote, validated.manifest().name()),
        );
    }

    let report = resolve_artifacts(&validated, &store, &fetcher, &opts)?;

    for outcome in report.outcomes() {
        let status = match outcome.status {
            ArtifactStatus::Local => Status::Verified,
            ArtifactStatus::Cached => Status::Cached,
            ArtifactStatus::Downloaded => Status::Downloaded,
        };
        shell.status(
            status,
            format!("{} ({})", outcome.name, display_path(&ctx, &outcome.path)),
        );
    }

    let plan = BuildPlan::new(&validated);
    let ready = plan.ready_targets(&report);
    if !ready.is_empty() {
        shell.verbose(format!("ready to build: {}", ready.join(", ")));
    }

    shell.status(
        Status::Finished,
        format!(
            "{} artifact(s) verified ({} downloaded) in {}",
            report.len(),
            report.count(ArtifactStatus::Downloaded),
            format_duration(start.elapsed())
        ),
    );

    Ok(())
}
