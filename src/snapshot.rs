//! Per-package dependency snapshot
//!
//! Compares one package.json in the working tree against the same file
//! at the baseline revision and keeps only bumped entries.

use crate::domain::{diff_map, strip_range_caret, DependencyMap};
use crate::error::ManifestError;
use crate::git::RevisionReader;
use crate::manifest::{ManifestInfo, PackageJson};
use std::path::PathBuf;
use tracing::debug;

/// Bumped dependencies of one package
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageDiff {
    /// Manifest path, relative to the project root
    pub manifest: String,
    /// Package name, if declared
    pub name: Option<String>,
    /// Changed or new production dependencies, caret stripped
    pub dependencies: DependencyMap,
    /// Changed or new development dependencies, caret stripped
    pub dev_dependencies: DependencyMap,
    /// Whether the current manifest is private
    pub is_private: bool,
    /// Issue tracker URL of the current manifest
    pub bugs_url: Option<String>,
}

impl PackageDiff {
    /// Returns true if nothing was bumped in either category
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}

/// Load the manifest as it was at `base_ref`
///
/// Any failure means nothing existed before: the baseline becomes a
/// private package with no dependencies.
async fn load_baseline(
    reader: &dyn RevisionReader,
    manifest: &ManifestInfo,
    base_ref: &str,
) -> PackageJson {
    let content = match reader.show(base_ref, &manifest.relative_path).await {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %manifest.relative_path, base_ref, error = %e, "no baseline manifest");
            return PackageJson::missing_baseline();
        }
    };

    let origin = PathBuf::from(format!("{}:{}", base_ref, manifest.relative_path));
    match PackageJson::parse(&content, &origin) {
        Ok(baseline) => baseline,
        Err(e) => {
            debug!(path = %manifest.relative_path, base_ref, error = %e, "unparseable baseline manifest");
            PackageJson::missing_baseline()
        }
    }
}

/// Diff one category and normalize the resulting versions
fn bumped(baseline: &DependencyMap, current: &DependencyMap) -> DependencyMap {
    diff_map(baseline, current)
        .into_iter()
        .map(|(name, spec)| {
            let version = strip_range_caret(&spec).to_string();
            (name, version)
        })
        .collect()
}

/// Compute the bumped dependencies of one package
///
/// The current manifest must be readable and valid; the baseline may be
/// missing.
pub async fn snapshot(
    reader: &dyn RevisionReader,
    manifest: &ManifestInfo,
    base_ref: &str,
) -> Result<PackageDiff, ManifestError> {
    let baseline = load_baseline(reader, manifest, base_ref).await;
    let current = PackageJson::read(&manifest.path).await?;

    let diff = PackageDiff {
        manifest: manifest.relative_path.clone(),
        name: current.name.clone(),
        dependencies: bumped(&baseline.dependencies, &current.dependencies),
        dev_dependencies: bumped(&baseline.dev_dependencies, &current.dev_dependencies),
        is_private: current.private,
        bugs_url: current.bugs_url().map(str::to_string),
    };

    debug!(
        path = %diff.manifest,
        dependencies = diff.dependencies.len(),
        dev_dependencies = diff.dev_dependencies.len(),
        private = diff.is_private,
        "package snapshot"
    );
    Ok(diff)
}
