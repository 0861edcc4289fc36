//! Content-addressed store of verified artifacts.
//!
//! Layout: `<root>/sha256/<checksum>/<file name>`. A file only appears at
//! its final path after its SHA-256 matched the declared checksum: bytes are
//! written to a temporary file in the store and atomically renamed into
//! place. An interrupted download therefore never leaves a trusted entry.
//! Commits are serialized by a mutex so that parallel fetches never race on
//! the same path.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::core::{ArtifactLocation, ArtifactReference};
use crate::sources::{FetchError, Fetcher};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::hash::{is_sha256_hex, sha256_bytes, sha256_file};

/// How a remote artifact was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Already present and verified; nothing was fetched or written
    Cached(PathBuf),
    /// Downloaded, verified and committed
    Downloaded(PathBuf),
}

impl StoreOutcome {
    pub fn path(&self) -> &Path {
        match self {
            StoreOutcome::Cached(p) | StoreOutcome::Downloaded(p) => p,
        }
    }
}

/// Content-addressed artifact store.
#[derive(Debug)]
pub struct ArtifactStore {
    root: PathBuf,
    commit_lock: Mutex<()>,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactStore {
            root: root.into(),
            commit_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the blob for `checksum`.
    pub fn blob_dir(&self, checksum: &str) -> PathBuf {
        self.root.join("sha256").join(checksum)
    }

    /// Final path of an artifact with `checksum` and `file_name`.
    pub fn blob_path(&self, checksum: &str, file_name: &str) -> PathBuf {
        self.blob_dir(checksum).join(file_name)
    }

    /// Return the stored path if present and its content still matches.
    ///
    /// A stored file whose content no longer matches is removed so that it
    /// is fetched again. Removal happens under the commit lock after a
    /// second check, so a blob committed concurrently is never discarded.
    pub fn lookup(&self, checksum: &str, file_name: &str) -> std::io::Result<Option<PathBuf>> {
        let path = self.blob_path(checksum, file_name);
        match stored_digest(&path)? {
            None => return Ok(None),
            Some(actual) if actual == checksum => return Ok(Some(path)),
            Some(_) => {}
        }

        let _guard = self.lock_commits();
        match stored_digest(&path)? {
            None => Ok(None),
            Some(actual) if actual == checksum => Ok(Some(path)),
            Some(actual) => {
                tracing::warn!(
                    "stored artifact {} is corrupt (sha256 {}), discarding",
                    path.display(),
                    actual
                );
                match std::fs::remove_file(&path) {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                    _ => Ok(None),
                }
            }
        }
    }

    /// Make sure a remote artifact is present and verified.
    ///
    /// Idempotent: when the store already holds a verified copy the fetcher
    /// is not called and nothing is written.
    pub fn ensure(
        &self,
        artifact: &ArtifactReference,
        fetcher: &dyn Fetcher,
        offline: bool,
    ) -> Result<StoreOutcome, FetchError> {
        let ArtifactLocation::RemoteUrl(url) = &artifact.location else {
            return Err(FetchError::Store {
                target: artifact.name.clone(),
                source: std::io::Error::other("artifact is not remote"),
            });
        };
        // Validation guarantees a checksum on remote artifacts.
        let expected = artifact.checksum.as_deref().unwrap_or_default();
        let file_name = artifact.file_name();

        let store_err = |source| FetchError::Store {
            target: artifact.name.clone(),
            source,
        };

        // Anything but a SHA-256 digest can never match, and must not be
        // used as a path component.
        if is_sha256_hex(expected) {
            if let Some(path) = self.lookup(expected, &file_name).map_err(store_err)? {
                tracing::debug!("`{}` already verified at {}", artifact.name, path.display());
                return Ok(StoreOutcome::Cached(path));
            }
        }

        if offline {
            return Err(FetchError::Offline {
                target: artifact.name.clone(),
                url: url.to_string(),
            });
        }

        tracing::info!("Fetching `{}` from {}", artifact.name, url);
        let bytes = fetcher.fetch(url).map_err(|e| FetchError::FetchFailure {
            target: artifact.name.clone(),
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let actual = sha256_bytes(&bytes);
        if actual != expected {
            return Err(FetchError::IntegrityMismatch {
                target: artifact.name.clone(),
                expected: expected.to_string(),
                actual,
            });
        }

        let path = self.commit(expected, &file_name, &bytes).map_err(store_err)?;
        tracing::debug!("verified `{}` ({})", artifact.name, &expected[..expected.len().min(16)]);
        Ok(StoreOutcome::Downloaded(path))
    }

    /// Write verified bytes to their final path.
    fn commit(&self, checksum: &str, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let _guard = self.lock_commits();

        let dir = self.blob_dir(checksum);
        let path = dir.join(file_name);
        if stored_digest(&path)?.as_deref() == Some(checksum) {
            // Another artifact with the same content committed it first.
            return Ok(path);
        }

        std::fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(path)
    }

    fn lock_commits(&self) -> MutexGuard<'_, ()> {
        self.commit_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Checksums of all stored artifacts.
    pub fn entries(&self) -> Result<Vec<String>> {
        let dir = self.root.join("sha256");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read artifact store: {}", dir.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                entries.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Remove everything in the store.
    pub fn clear(&self) -> Result<()> {
        remove_dir_all_if_exists(&self.root)
    }
}

/// SHA-256 of the file at `path`, or `None` when there is no such file.
fn stored_digest(path: &Path) -> std::io::Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    match sha256_file(path) {
        Ok(digest) => Ok(Some(digest)),
        // Removed between the check and the read.
        Err(_) if !path.exists() => Ok(None),
        Err(e) => Err(std::io::Error::other(e)),
    }
}
