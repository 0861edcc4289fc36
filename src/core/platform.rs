//! Platform families and minimum deployment versions.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

/// A platform family a package can declare a minimum version for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "iOS")]
    Ios,
    #[serde(alias = "macOS")]
    Macos,
    #[serde(alias = "macCatalyst")]
    Maccatalyst,
    #[serde(alias = "tvOS")]
    Tvos,
    #[serde(alias = "watchOS")]
    Watchos,
    #[serde(alias = "visionOS")]
    Visionos,
}

impl Platform {
    /// Canonical lowercase name, as written in `Quay.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Macos => "macos",
            Platform::Maccatalyst => "maccatalyst",
            Platform::Tvos => "tvos",
            Platform::Watchos => "watchos",
            Platform::Visionos => "visionos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "macos" => Ok(Platform::Macos),
            "maccatalyst" => Ok(Platform::Maccatalyst),
            "tvos" => Ok(Platform::Tvos),
            "watchos" => Ok(Platform::Watchos),
            "visionos" => Ok(Platform::Visionos),
            _ => Err(format!(
                "unknown platform '{}'; expected one of: ios, macos, maccatalyst, tvos, watchos, visionos",
                s
            )),
        }
    }
}

/// A minimum deployment version for one platform family.
///
/// The version is kept as written; it is parsed during validation so that a
/// malformed version is reported alongside the other manifest errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConstraint {
    #[serde(rename = "name")]
    pub platform: Platform,

    #[serde(rename = "min-version", alias = "min_version")]
    pub minimum_version: String,
}

impl PlatformConstraint {
    pub fn new(platform: Platform, minimum_version: impl Into<String>) -> Self {
        PlatformConstraint {
            platform,
            minimum_version: minimum_version.into(),
        }
    }

    /// Parse the minimum version.
    pub fn version(&self) -> Result<Version, String> {
        parse_platform_version(&self.minimum_version)
    }
}

/// Parse a dotted numeric version with one to three components.
///
/// Missing components are zero, so `"12.4"` becomes `12.4.0`. Pre-release
/// and build suffixes are not accepted.
pub fn parse_platform_version(s: &str) -> Result<Version, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("version is empty".to_string());
    }

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 3 {
        return Err(format!("expected at most 3 components, found {}", parts.len()));
    }

    let mut numbers = [0u64; 3];
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("component '{}' is not a number", part));
        }
        numbers[i] = part
            .parse()
            .map_err(|_| format!("component '{}' is out of range", part))?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}
