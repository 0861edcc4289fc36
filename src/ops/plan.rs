//! Build plan generation.
//!
//! A BuildPlan is the build order of a validated manifest in a form a
//! downstream tool can consume: one step per target, dependencies first,
//! each with the binary artifacts it needs and a fingerprint of its
//! declared inputs.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{PlatformConstraint, Product, Target, TargetKind};
use crate::ops::fetch::ArtifactReport;
use crate::resolver::ValidatedManifest;
use crate::util::hash::Fingerprint;

/// A complete build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Package name
    pub package: String,

    /// Applied profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    pub platforms: Vec<PlatformConstraint>,

    pub products: Vec<Product>,

    /// One step per target, in build order
    pub steps: Vec<PlanStep>,
}

/// A single target in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub target: String,

    pub kind: TargetKind,

    /// Artifact path or url, or the source target root
    pub location: String,

    /// Checksum of a remote artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Direct dependencies, as declared
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Binary artifacts this target needs, directly or transitively
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,

    /// Hash over the declared inputs and the dependencies' fingerprints
    pub fingerprint: String,
}

impl BuildPlan {
    /// Generate the plan for a validated manifest.
    pub fn new(validated: &ValidatedManifest) -> Self {
        let manifest = validated.manifest();
        let graph = validated.graph();

        let mut fingerprints: HashMap<&str, String> = HashMap::new();
        let mut steps = Vec::with_capacity(manifest.targets.len());

        for &idx in validated.build_order_indices() {
            let target = &manifest.targets[idx];
            let name = target.name();

            let dependencies: Vec<String> = target.dependencies().to_vec();
            let artifacts: Vec<String> = validated
                .transitive_artifacts(name)
                .into_iter()
                .map(|a| a.name.clone())
                .collect();

            let (location, checksum) = match target {
                Target::Binary(artifact) => {
                    (artifact.location.to_string(), artifact.checksum.clone())
                }
                Target::Source(source) => (source.path.display().to_string(), None),
            };

            let mut fp = Fingerprint::new();
            fp.update_str(name)
                .update_str(&target.kind().to_string())
                .update_str(&location)
                .update_opt(checksum.as_deref());
            if let Target::Source(source) = target {
                let sources: Vec<String> = source
                    .sources
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                let resources: Vec<String> = source
                    .resources
                    .iter()
                    .map(|r| format!("{}:{}", r.mode, r.path.display()))
                    .collect();
                fp.update_strs(sources.iter().map(String::as_str))
                    .update_strs(resources.iter().map(String::as_str));
            }
            // Dependencies come earlier in build order, so theirs exist.
            for dep in graph.deps(idx) {
                let dep_name = graph.name(dep);
                fp.update_str(dep_name)
                    .update_opt(fingerprints.get(dep_name).map(String::as_str));
            }
            let fingerprint = fp.finish_short();

            fingerprints.insert(name, fingerprint.clone());
            steps.push(PlanStep {
                target: name.to_string(),
                kind: target.kind(),
                location,
                checksum,
                dependencies,
                artifacts,
                fingerprint,
            });
        }

        BuildPlan {
            package: manifest.name().to_string(),
            profile: manifest.active_profile.clone(),
            platforms: manifest.platforms.clone(),
            products: manifest.products.clone(),
            steps,
        }
    }

    /// Target names in build order.
    pub fn build_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.target.as_str()).collect()
    }

    pub fn step(&self, target: &str) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.target == target)
    }

    /// Source targets whose binary artifacts have all been verified, in
    /// build order. A target with any unverified artifact is never ready.
    pub fn ready_targets(&self, report: &ArtifactReport) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.kind == TargetKind::Source)
            .filter(|s| s.artifacts.iter().all(|a| report.is_verified(a)))
            .map(|s| s.target.as_str())
            .collect()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
