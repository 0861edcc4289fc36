//! Local binary artifacts.
//!
//! A local artifact is trusted as-is; it only has to exist. Frameworks are
//! usually directory bundles (`*.xcframework`), so directories count.

use std::path::{Path, PathBuf};

use crate::core::{ArtifactLocation, ArtifactReference};
use crate::sources::FetchError;

/// Resolve a local artifact against the manifest directory and check that it
/// exists. Returns the resolved path.
pub fn verify_local(
    artifact: &ArtifactReference,
    manifest_dir: &Path,
) -> Result<PathBuf, FetchError> {
    let ArtifactLocation::LocalPath(relative) = &artifact.location else {
        return Err(FetchError::Store {
            target: artifact.name.clone(),
            source: std::io::Error::other("artifact is not local"),
        });
    };

    let path = manifest_dir.join(relative);
    if path.exists() {
        tracing::debug!("local artifact `{}` at {}", artifact.name, path.display());
        Ok(path)
    } else {
        Err(FetchError::LocalArtifactMissing {
            target: artifact.name.clone(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_bundle_counts() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("TwintSDK.xcframework/ios-arm64")).unwrap();

        let artifact = ArtifactReference::local("TwintSDK", "TwintSDK.xcframework");
        let path = verify_local(&artifact, tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("TwintSDK.xcframework"));
    }

    #[test]
    fn test_missing_local_artifact() {
        let tmp = TempDir::new().unwrap();
        let artifact = ArtifactReference::local("ThreeDS_SDK", "ThreeDS_SDK.xcframework");

        match verify_local(&artifact, tmp.path()).unwrap_err() {
            FetchError::LocalArtifactMissing { target, path } => {
                assert_eq!(target, "ThreeDS_SDK");
                assert_eq!(path, tmp.path().join("ThreeDS_SDK.xcframework"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
