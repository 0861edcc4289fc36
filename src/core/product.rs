//! Products - the externally consumable exports of a package.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Linkage of an exported library product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    /// Let the consuming build tool decide
    #[default]
    Automatic,
    Static,
    Dynamic,
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryKind::Automatic => write!(f, "automatic"),
            LibraryKind::Static => write!(f, "static"),
            LibraryKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A named library that re-exports a set of targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    #[serde(default, rename = "type")]
    pub kind: LibraryKind,

    /// Exported target names, in declaration order.
    #[serde(default)]
    pub targets: Vec<String>,
}

impl Product {
    pub fn library<I, S>(name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Product {
            name: name.into(),
            kind: LibraryKind::Automatic,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exports(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t == target)
    }
}
