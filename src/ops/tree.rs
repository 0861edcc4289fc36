//! Product trees: each product, its exported targets, and what they depend
//! on.

use std::collections::HashSet;
use std::fmt::Write;

use anyhow::{bail, Result};

use crate::core::{Product, Target};
use crate::resolver::ValidatedManifest;

/// Options for [`product_tree`].
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Only render this product
    pub product: Option<String>,

    /// Maximum depth below the product (None = unlimited)
    pub depth: Option<usize>,

    /// Expand targets that were already shown
    pub duplicates: bool,
}

/// Render product trees.
///
/// A target already expanded in the same product is printed once more with
/// a `(*)` marker and not expanded again unless `duplicates` is set.
pub fn product_tree(validated: &ValidatedManifest, opts: &TreeOptions) -> Result<String> {
    let manifest = validated.manifest();

    let products: Vec<&Product> = match &opts.product {
        Some(name) => match manifest.product(name) {
            Some(product) => vec![product],
            None => {
                let available: Vec<&str> =
                    manifest.products.iter().map(|p| p.name.as_str()).collect();
                bail!(
                    "no product named `{}` (available: {})",
                    name,
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                );
            }
        },
        None => manifest.products.iter().collect(),
    };

    let max_depth = opts.depth.unwrap_or(usize::MAX);
    let mut out = String::new();

    for (i, product) in products.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{} (library, {})", product.name, product.kind);

        let mut seen = HashSet::new();
        for name in &product.targets {
            render_target(validated, name, 1, max_depth, &mut seen, opts.duplicates, &mut out);
        }
    }

    Ok(out)
}

fn render_target(
    validated: &ValidatedManifest,
    name: &str,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<String>,
    show_duplicates: bool,
    out: &mut String,
) {
    if depth > max_depth {
        return;
    }
    let Some(target) = validated.target(name) else {
        return;
    };

    let is_duplicate = !seen.insert(name.to_string());
    let prefix = format!("{}├── ", "│   ".repeat(depth - 1));
    let dup_marker = if is_duplicate && !show_duplicates {
        " (*)"
    } else {
        ""
    };

    let detail = match target {
        Target::Binary(artifact) => format!("binary, {}", artifact.location),
        Target::Source(source) => format!("source, {}", source.path.display()),
    };
    let _ = writeln!(out, "{}{} [{}]{}", prefix, name, detail, dup_marker);

    if is_duplicate && !show_duplicates {
        return;
    }

    for dep in target.dependencies() {
        render_target(validated, dep, depth + 1, max_depth, seen, show_duplicates, out);
    }
}
