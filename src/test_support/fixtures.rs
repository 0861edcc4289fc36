//! Test fixtures: sample manifests and builders.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::{Manifest, PackageMetadata, PlatformConstraint, Platform, Product, Target};

/// A package bundling three binary SDKs and a resource target, with the
/// three usual variants expressed as profiles.
pub const WALLEE_MANIFEST: &str = r#"
[package]
name = "WalleeTestSdk"
description = "Merchant test SDK with its payment and authentication frameworks"

[[platforms]]
name = "ios"
min-version = "12.4"

[[products]]
name = "WalleeTestSdk"
targets = ["ThreeDS_SDK", "TwintSDK", "WalleeTestSdk", "PaymentResources"]

[[targets]]
name = "ThreeDS_SDK"
kind = "binary"
path = "ThreeDS_SDK.xcframework"

[[targets]]
name = "TwintSDK"
kind = "binary"
path = "TwintSDK.xcframework"

[[targets]]
name = "WalleeTestSdk"
kind = "binary"
path = "WalleeTestSdk.xcframework"

[[targets]]
name = "PaymentResources"
kind = "source"
path = "Sources/PaymentResources"
sources = ["PaymentResources.swift"]
dependencies = ["WalleeTestSdk"]
resources = [{ path = "walleetestsdkbundle.jsbundle", mode = "process" }]

[profiles.local]
description = "All frameworks from the package directory"

[profiles.legacy]
description = "Older deployment target without 3-D Secure"
platforms = [{ name = "ios", min-version = "12.0" }]
exclude = ["ThreeDS_SDK"]

[profiles.remote]
description = "Merchant SDK from the release server"

[profiles.remote.artifacts.WalleeTestSdk]
url = "https://releases.example.com/sdk/WalleeTestSdk.xcframework.zip"
checksum = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
"#;

/// A manifest with the given targets and products, rooted at `/pkg`.
pub fn manifest_with(targets: Vec<Target>, products: Vec<Product>) -> Manifest {
    Manifest {
        package: PackageMetadata {
            name: "test".to_string(),
            description: None,
            default_profile: None,
        },
        platforms: vec![PlatformConstraint::new(Platform::Ios, "13.0")],
        products,
        targets,
        profiles: BTreeMap::new(),
        active_profile: None,
        manifest_dir: PathBuf::from("/pkg"),
    }
}

/// A minimal manifest with one local binary target exported by one product.
pub fn single_binary_manifest(name: &str) -> String {
    format!(
        r#"[package]
name = "{name}"

[[products]]
name = "{name}"
targets = ["{name}"]

[[targets]]
name = "{name}"
kind = "binary"
path = "{name}.xcframework"
"#
    )
}

/// A manifest whose source targets depend on each other in a cycle.
pub fn cyclic_manifest() -> &'static str {
    r#"[package]
name = "cyclic"

[[products]]
name = "P"
targets = ["A"]

[[targets]]
name = "A"
kind = "source"
dependencies = ["B"]

[[targets]]
name = "B"
kind = "source"
dependencies = ["A"]
"#
}
