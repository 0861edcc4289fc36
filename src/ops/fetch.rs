//! Resolving binary artifacts.
//!
//! Local artifacts are checked for existence first, without touching the
//! network. Remote artifacts are then fetched through the artifact store in
//! parallel. Results and errors are always reported in declaration order.

use std::fmt;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::ArtifactReference;
use crate::resolver::ValidatedManifest;
use crate::sources::{verify_local, ArtifactStore, FetchError, Fetcher, StoreOutcome};

/// Options for [`resolve_artifacts`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Parallel downloads (None = rayon's default)
    pub jobs: Option<usize>,

    /// Fail instead of downloading
    pub offline: bool,

    /// Show a progress bar when more than one download is involved
    pub progress: bool,
}

/// How one artifact was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Local path, present
    Local,
    /// Remote, already verified in the store
    Cached,
    /// Remote, downloaded and verified now
    Downloaded,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactStatus::Local => write!(f, "local"),
            ArtifactStatus::Cached => write!(f, "cached"),
            ArtifactStatus::Downloaded => write!(f, "downloaded"),
        }
    }
}

/// Outcome for a single artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub name: String,
    pub status: ArtifactStatus,
    /// Where the verified artifact lives on disk
    pub path: PathBuf,
}

/// Result of a successful [`resolve_artifacts`]: every artifact verified.
#[derive(Debug, Clone, Default)]
pub struct ArtifactReport {
    outcomes: Vec<ArtifactOutcome>,
}

impl ArtifactReport {
    /// Outcomes in declaration order.
    pub fn outcomes(&self) -> &[ArtifactOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, name: &str) -> Option<&ArtifactOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn is_verified(&self, name: &str) -> bool {
        self.outcome(name).is_some()
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.outcome(name).map(|o| o.path.as_path())
    }

    pub fn count(&self, status: ArtifactStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Make every binary artifact of a validated manifest available and
/// verified.
///
/// Idempotent: remote artifacts already verified in `store` are reported as
/// [`ArtifactStatus::Cached`] without a fetch. The first failure in
/// declaration order is returned.
pub fn resolve_artifacts(
    validated: &ValidatedManifest,
    store: &ArtifactStore,
    fetcher: &dyn Fetcher,
    opts: &FetchOptions,
) -> Result<ArtifactReport, FetchError> {
    let manifest = validated.manifest();
    let artifacts: Vec<&ArtifactReference> = manifest.artifacts().collect();

    let mut local = Vec::new();
    let mut remote = Vec::new();
    for (idx, artifact) in artifacts.iter().enumerate() {
        if artifact.location.is_remote() {
            remote.push((idx, *artifact));
        } else {
            local.push((idx, *artifact));
        }
    }

    let mut outcomes: Vec<Option<ArtifactOutcome>> = vec![None; artifacts.len()];

    for &(idx, artifact) in &local {
        let path = verify_local(artifact, &manifest.manifest_dir)?;
        outcomes[idx] = Some(ArtifactOutcome {
            name: artifact.name.clone(),
            status: ArtifactStatus::Local,
            path,
        });
    }

    if !remote.is_empty() {
        tracing::info!("Resolving {} remote artifact(s)", remote.len());
    }

    let pb = if opts.progress && remote.len() > 1 {
        let pb = ProgressBar::new(remote.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let fetch_all = || -> Vec<Result<StoreOutcome, FetchError>> {
        remote
            .par_iter()
            .map(|&(_, artifact)| {
                let result = store.ensure(artifact, fetcher, opts.offline);
                if let Some(pb) = &pb {
                    pb.set_message(artifact.name.clone());
                    pb.inc(1);
                }
                result
            })
            .collect()
    };

    let results = match opts.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(fetch_all),
            Err(e) => {
                tracing::warn!("failed to create fetch thread pool: {}", e);
                fetch_all()
            }
        },
        None => fetch_all(),
    };

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    // par_iter().collect() keeps input order, so this is declaration order.
    for (&(idx, artifact), result) in remote.iter().zip(results) {
        let (status, path) = match result? {
            StoreOutcome::Cached(path) => (ArtifactStatus::Cached, path),
            StoreOutcome::Downloaded(path) => (ArtifactStatus::Downloaded, path),
        };
        outcomes[idx] = Some(ArtifactOutcome {
            name: artifact.name.clone(),
            status,
            path,
        });
    }

    let outcomes: Vec<ArtifactOutcome> = outcomes.into_iter().flatten().collect();
    tracing::debug!("verified {} artifact(s)", outcomes.len());

    Ok(ArtifactReport { outcomes })
}
