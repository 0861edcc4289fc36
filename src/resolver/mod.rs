//! Manifest validation and build ordering.
//!
//! [`validate`] is pure: it checks a manifest for structural problems and
//! returns a read-only [`ValidatedManifest`] carrying the target graph and a
//! precomputed build order. No I/O happens here; artifact fetching lives in
//! [`crate::sources`] and [`crate::ops::fetch`].

pub mod errors;
pub mod graph;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::core::{ArtifactLocation, ArtifactReference, Manifest, Target};

pub use errors::{ManifestError, Referrer};
pub use graph::TargetGraph;

/// A non-fatal problem found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Target not exported by any product, directly or through dependencies
    UnreachableTarget { name: String },

    /// Checksum declared on a local artifact; it is not checked
    IgnoredLocalChecksum { target: String },

    /// Product with an empty export list
    EmptyProduct { product: String },

    /// Manifest declares targets but no products
    NoProducts,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnreachableTarget { name } => {
                write!(f, "target `{}` is not reachable from any product", name)
            }
            ValidationWarning::IgnoredLocalChecksum { target } => write!(
                f,
                "checksum on local artifact `{}` is ignored; checksums apply to remote artifacts",
                target
            ),
            ValidationWarning::EmptyProduct { product } => {
                write!(f, "product `{}` exports no targets", product)
            }
            ValidationWarning::NoProducts => write!(f, "manifest declares no products"),
        }
    }
}

/// A manifest that passed validation. Read-only.
#[derive(Debug, Clone)]
pub struct ValidatedManifest {
    manifest: Manifest,
    graph: TargetGraph,
    order: Vec<usize>,
    warnings: Vec<ValidationWarning>,
}

impl ValidatedManifest {
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn graph(&self) -> &TargetGraph {
        &self.graph
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Target by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.graph
            .index_of(name)
            .map(|idx| &self.manifest.targets[idx])
    }

    /// Target names in build order: dependencies first, ties broken by
    /// declaration order.
    pub fn build_order(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|&idx| self.graph.name(idx).to_string())
            .collect()
    }

    /// Declaration indices in build order.
    pub fn build_order_indices(&self) -> &[usize] {
        &self.order
    }

    /// Binary artifacts `name` depends on, directly or transitively.
    pub fn transitive_artifacts(&self, name: &str) -> Vec<&ArtifactReference> {
        let Some(idx) = self.graph.index_of(name) else {
            return Vec::new();
        };

        self.graph
            .transitive_deps(idx)
            .into_iter()
            .filter_map(|i| self.manifest.targets[i].as_artifact())
            .collect()
    }
}

/// Validate a manifest.
///
/// Checks run in a fixed order and the first failure is returned:
/// duplicate target names, platform constraints, unresolved references,
/// missing checksums on remote artifacts, then dependency cycles.
pub fn validate(manifest: Manifest) -> Result<ValidatedManifest, ManifestError> {
    check_unique_names(&manifest)?;
    check_platforms(&manifest)?;
    check_references(&manifest)?;
    check_checksums(&manifest)?;

    let graph = TargetGraph::new(&manifest.targets);
    if let Some(cycle) = graph.find_cycle() {
        return Err(ManifestError::CyclicDependency { cycle });
    }
    let order = graph.topological_order().ok_or_else(|| ManifestError::CyclicDependency {
        cycle: Vec::new(),
    })?;

    let warnings = collect_warnings(&manifest, &graph);
    for warning in &warnings {
        tracing::debug!("validation warning: {}", warning);
    }

    tracing::debug!(
        "validated `{}`: {} target(s), {} product(s)",
        manifest.name(),
        manifest.targets.len(),
        manifest.products.len()
    );

    Ok(ValidatedManifest {
        manifest,
        graph,
        order,
        warnings,
    })
}

/// Target names in build order. Equivalent to
/// [`ValidatedManifest::build_order`].
pub fn build_order(validated: &ValidatedManifest) -> Vec<String> {
    validated.build_order()
}

fn check_unique_names(manifest: &Manifest) -> Result<(), ManifestError> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for target in &manifest.targets {
        *counts.entry(target.name()).or_default() += 1;
    }

    // Report the first duplicated name in declaration order.
    for target in &manifest.targets {
        let count = counts[target.name()];
        if count > 1 {
            return Err(ManifestError::DuplicateTargetName {
                name: target.name().to_string(),
                count,
            });
        }
    }

    Ok(())
}

fn check_platforms(manifest: &Manifest) -> Result<(), ManifestError> {
    let mut seen = HashSet::new();
    for constraint in &manifest.platforms {
        if !seen.insert(constraint.platform) {
            return Err(ManifestError::DuplicatePlatform {
                platform: constraint.platform,
            });
        }
        constraint
            .version()
            .map_err(|reason| ManifestError::InvalidPlatformVersion {
                platform: constraint.platform,
                version: constraint.minimum_version.clone(),
                reason,
            })?;
    }
    Ok(())
}

fn check_references(manifest: &Manifest) -> Result<(), ManifestError> {
    let declared: HashSet<&str> = manifest.targets.iter().map(Target::name).collect();

    let unresolved = |name: &str, referrer: Referrer| ManifestError::UnresolvedReference {
        name: name.to_string(),
        referrer,
        suggestions: errors::similar_names(name, manifest.targets.iter().map(Target::name)),
    };

    for product in &manifest.products {
        for name in &product.targets {
            if !declared.contains(name.as_str()) {
                return Err(unresolved(name, Referrer::Product(product.name.clone())));
            }
        }
    }

    for target in &manifest.targets {
        for dep in target.dependencies() {
            if !declared.contains(dep.as_str()) {
                return Err(unresolved(dep, Referrer::Target(target.name().to_string())));
            }
        }
    }

    Ok(())
}

fn check_checksums(manifest: &Manifest) -> Result<(), ManifestError> {
    for artifact in manifest.artifacts() {
        if let ArtifactLocation::RemoteUrl(url) = &artifact.location {
            let missing = artifact
                .checksum
                .as_deref()
                .map_or(true, |c| c.is_empty());
            if missing {
                return Err(ManifestError::MissingIntegrityChecksum {
                    target: artifact.name.clone(),
                    url: url.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn collect_warnings(manifest: &Manifest, graph: &TargetGraph) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for artifact in manifest.artifacts() {
        if !artifact.location.is_remote() && artifact.checksum.is_some() {
            warnings.push(ValidationWarning::IgnoredLocalChecksum {
                target: artifact.name.clone(),
            });
        }
    }

    for product in &manifest.products {
        if product.targets.is_empty() {
            warnings.push(ValidationWarning::EmptyProduct {
                product: product.name.clone(),
            });
        }
    }

    if manifest.products.is_empty() {
        if !manifest.targets.is_empty() {
            warnings.push(ValidationWarning::NoProducts);
        }
        return warnings;
    }

    let roots = manifest
        .products
        .iter()
        .flat_map(|p| p.targets.iter())
        .filter_map(|name| graph.index_of(name));
    let reachable = graph.reachable_from(roots);

    for (idx, target) in manifest.targets.iter().enumerate() {
        if !reachable.contains(&idx) {
            warnings.push(ValidationWarning::UnreachableTarget {
                name: target.name().to_string(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use url::Url;

    use super::*;
    use crate::core::{
        ArtifactReference, Platform, PlatformConstraint, Product, SourceTarget,
    };
    use crate::test_support::fixtures::{
        cyclic_manifest, manifest_with, single_binary_manifest, WALLEE_MANIFEST,
    };

    fn wallee() -> Manifest {
        Manifest::parse(WALLEE_MANIFEST, Path::new("/pkg/Quay.toml")).unwrap()
    }

    fn remote(name: &str, checksum: Option<&str>) -> Target {
        let url = Url::parse(&format!("https://cdn.example.com/{}.zip", name)).unwrap();
        ArtifactReference::remote(name, url, checksum.map(str::to_string)).into()
    }

    #[test]
    fn test_wallee_manifest_validates() {
        let validated = validate(wallee()).unwrap();
        assert!(validated.warnings().is_empty());
        assert_eq!(
            validated.build_order(),
            ["ThreeDS_SDK", "TwintSDK", "WalleeTestSdk", "PaymentResources"]
        );
    }

    #[test]
    fn test_every_profile_validates() {
        let template = wallee();
        for name in template.profile_names() {
            let manifest = template.with_profile(name).unwrap();
            assert!(validate(manifest).is_ok(), "profile `{}` failed", name);
        }
    }

    #[test]
    fn test_duplicate_target_name() {
        let manifest = manifest_with(
            vec![
                ArtifactReference::local("WalleeTestSdk", "a.xcframework").into(),
                ArtifactReference::local("WalleeTestSdk", "b.xcframework").into(),
            ],
            vec![Product::library("P", ["WalleeTestSdk"])],
        );

        let err = validate(manifest).unwrap_err();
        assert_eq!(
            err,
            ManifestError::DuplicateTargetName {
                name: "WalleeTestSdk".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_product_exports_undeclared_target() {
        let manifest = manifest_with(
            vec![ArtifactReference::local("A", "A.xcframework").into()],
            vec![Product::library("P", ["A", "Missing"])],
        );

        match validate(manifest).unwrap_err() {
            ManifestError::UnresolvedReference { name, referrer, .. } => {
                assert_eq!(name, "Missing");
                assert_eq!(referrer, Referrer::Product("P".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dependency_on_undeclared_target() {
        let manifest = manifest_with(
            vec![
                SourceTarget::new("A").with_dependency("Twintsdk").into(),
                ArtifactReference::local("TwintSDK", "TwintSDK.xcframework").into(),
            ],
            vec![Product::library("P", ["A"])],
        );

        match validate(manifest).unwrap_err() {
            ManifestError::UnresolvedReference {
                name,
                referrer,
                suggestions,
            } => {
                assert_eq!(name, "Twintsdk");
                assert_eq!(referrer, Referrer::Target("A".to_string()));
                assert_eq!(suggestions, vec!["TwintSDK"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_checksum() {
        let manifest = manifest_with(
            vec![remote("B", None)],
            vec![Product::library("P", ["B"])],
        );

        assert!(matches!(
            validate(manifest).unwrap_err(),
            ManifestError::MissingIntegrityChecksum { target, .. } if target == "B"
        ));
    }

    #[test]
    fn test_empty_checksum_counts_as_missing() {
        let manifest = manifest_with(
            vec![remote("B", Some(""))],
            vec![Product::library("P", ["B"])],
        );

        assert!(matches!(
            validate(manifest).unwrap_err(),
            ManifestError::MissingIntegrityChecksum { .. }
        ));
    }

    #[test]
    fn test_cycle_among_source_targets() {
        let manifest = manifest_with(
            vec![
                SourceTarget::new("A").with_dependency("B").into(),
                SourceTarget::new("B").with_dependency("A").into(),
            ],
            vec![Product::library("P", ["A"])],
        );

        assert_eq!(
            validate(manifest).unwrap_err(),
            ManifestError::CyclicDependency {
                cycle: vec!["A".into(), "B".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_cycle_from_parsed_manifest() {
        let manifest = Manifest::parse(cyclic_manifest(), Path::new("/pkg/Quay.toml")).unwrap();
        let err = validate(manifest).unwrap_err();
        assert_eq!(err.to_string(), "cyclic dependency: A -> B -> A");
    }

    #[test]
    fn test_single_binary_manifest() {
        let manifest =
            Manifest::parse(&single_binary_manifest("Sdk"), Path::new("/pkg/Quay.toml")).unwrap();
        let validated = validate(manifest).unwrap();
        assert_eq!(build_order(&validated), ["Sdk"]);
        assert!(validated.warnings().is_empty());
    }

    #[test]
    fn test_duplicates_reported_before_cycles() {
        let manifest = manifest_with(
            vec![
                SourceTarget::new("A").with_dependency("A").into(),
                SourceTarget::new("A").into(),
            ],
            vec![],
        );

        assert!(matches!(
            validate(manifest).unwrap_err(),
            ManifestError::DuplicateTargetName { .. }
        ));
    }

    #[test]
    fn test_duplicate_platform() {
        let mut manifest = wallee();
        manifest
            .platforms
            .push(PlatformConstraint::new(Platform::Ios, "13.0"));

        assert_eq!(
            validate(manifest).unwrap_err(),
            ManifestError::DuplicatePlatform {
                platform: Platform::Ios
            }
        );
    }

    #[test]
    fn test_invalid_platform_version() {
        let mut manifest = wallee();
        manifest.platforms[0].minimum_version = "twelve".to_string();

        assert!(matches!(
            validate(manifest).unwrap_err(),
            ManifestError::InvalidPlatformVersion { version, .. } if version == "twelve"
        ));
    }

    #[test]
    fn test_unreachable_target_warning() {
        let manifest = manifest_with(
            vec![
                ArtifactReference::local("A", "A.xcframework").into(),
                ArtifactReference::local("Orphan", "O.xcframework").into(),
            ],
            vec![Product::library("P", ["A"])],
        );

        let validated = validate(manifest).unwrap();
        assert_eq!(
            validated.warnings(),
            [ValidationWarning::UnreachableTarget {
                name: "Orphan".to_string()
            }]
        );
    }

    #[test]
    fn test_local_checksum_warning() {
        let mut artifact = ArtifactReference::local("A", PathBuf::from("A.xcframework"));
        artifact.checksum = Some("abc".to_string());
        let manifest = manifest_with(vec![artifact.into()], vec![Product::library("P", ["A"])]);

        let validated = validate(manifest).unwrap();
        assert!(matches!(
            validated.warnings(),
            [ValidationWarning::IgnoredLocalChecksum { .. }]
        ));
    }

    #[test]
    fn test_build_order_is_deterministic() {
        let manifest = manifest_with(
            vec![
                SourceTarget::new("App")
                    .with_dependency("Core")
                    .with_dependency("Sdk")
                    .into(),
                SourceTarget::new("Core").with_dependency("Sdk").into(),
                remote("Sdk", Some("c1")),
                ArtifactReference::local("Extra", "Extra.xcframework").into(),
            ],
            vec![Product::library("P", ["App", "Extra"])],
        );

        let validated = validate(manifest).unwrap();
        let first = build_order(&validated);
        assert_eq!(first, ["Sdk", "Core", "App", "Extra"]);
        for _ in 0..10 {
            assert_eq!(build_order(&validated), first);
        }
    }

    #[test]
    fn test_transitive_artifacts() {
        let manifest = manifest_with(
            vec![
                ArtifactReference::local("Base", "Base.xcframework").into(),
                SourceTarget::new("Core").with_dependency("Base").into(),
                SourceTarget::new("App").with_dependency("Core").into(),
            ],
            vec![Product::library("P", ["App"])],
        );

        let validated = validate(manifest).unwrap();
        let artifacts: Vec<_> = validated
            .transitive_artifacts("App")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(artifacts, ["Base"]);
        assert!(validated.transitive_artifacts("Base").is_empty());
    }
}
