//! Workspace aggregation
//!
//! Snapshots every workspace package concurrently, then folds the results
//! in enumeration order into production and development buckets:
//! - production dependencies of private packages count as development
//! - versions are kept singly (last write wins) or accumulated per package
//! - optionally, a public production bump evicts the development entry

use crate::domain::{merge_maps, sort_by_key, Precedence, VersionSet, VersionTracking};
use crate::error::{AggregateError, AppError, ManifestError};
use crate::git::RevisionReader;
use crate::manifest::{detect_manifests, ManifestInfo};
use crate::snapshot::{snapshot, PackageDiff};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Aggregate production and development bumps across all packages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyBuckets {
    /// Bumps that ship with published packages
    pub production: IndexMap<String, VersionSet>,
    /// Bumps used only for development or by unpublished packages
    pub development: IndexMap<String, VersionSet>,
}

impl DependencyBuckets {
    /// Create empty buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if neither bucket holds anything
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.development.is_empty()
    }

    fn insert(
        bucket: &mut IndexMap<String, VersionSet>,
        name: &str,
        version: &str,
        tracking: VersionTracking,
    ) {
        match tracking {
            VersionTracking::Single => {
                bucket.insert(name.to_string(), VersionSet::from([version.to_string()]));
            }
            VersionTracking::Multiple => {
                bucket
                    .entry(name.to_string())
                    .or_default()
                    .insert(version.to_string());
            }
        }
    }

    /// Fold one package's bumps into the buckets
    pub fn fold(&mut self, diff: &PackageDiff, tracking: VersionTracking, precedence: Precedence) {
        if diff.is_private {
            // Unpublished packages: everything is a development concern
            match tracking {
                VersionTracking::Single => {
                    let merged = merge_maps([&diff.dependencies, &diff.dev_dependencies]);
                    for (name, version) in &merged {
                        Self::insert(&mut self.development, name, version, tracking);
                    }
                }
                VersionTracking::Multiple => {
                    for (name, version) in diff.dependencies.iter().chain(&diff.dev_dependencies)
                    {
                        Self::insert(&mut self.development, name, version, tracking);
                    }
                }
            }
            return;
        }

        for (name, version) in &diff.dev_dependencies {
            Self::insert(&mut self.development, name, version, tracking);
        }

        for (name, version) in &diff.dependencies {
            if precedence == Precedence::Production && self.development.shift_remove(name).is_some()
            {
                debug!(package = %name, "production bump evicts development entry");
            }
            Self::insert(&mut self.production, name, version, tracking);
        }
    }

    /// Copy of the buckets with keys in deterministic order
    pub fn sorted(&self) -> Self {
        Self {
            production: sort_by_key(&self.production),
            development: sort_by_key(&self.development),
        }
    }
}

/// Result of aggregating a workspace
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Sorted bumps
    pub buckets: DependencyBuckets,
    /// Issue tracker URL of the first public package that declares one
    pub project_url: String,
    /// Per-package results in enumeration order
    pub packages: Vec<PackageDiff>,
}

/// Find the project URL used to link pull requests
pub fn project_url(diffs: &[PackageDiff]) -> Result<String, AggregateError> {
    diffs
        .iter()
        .filter(|diff| !diff.is_private)
        .find_map(|diff| diff.bugs_url.clone())
        .ok_or(AggregateError::NoPublicPackage)
}

/// Fold per-package results in order and sort the buckets
pub fn aggregate(
    diffs: Vec<PackageDiff>,
    tracking: VersionTracking,
    precedence: Precedence,
) -> Result<Aggregation, AggregateError> {
    let project_url = project_url(&diffs)?;

    let mut buckets = DependencyBuckets::new();
    for diff in &diffs {
        buckets.fold(diff, tracking, precedence);
    }

    Ok(Aggregation {
        buckets: buckets.sorted(),
        project_url,
        packages: diffs,
    })
}

/// Drives snapshots for a whole workspace
pub struct WorkspaceAggregator {
    reader: Arc<dyn RevisionReader>,
    tracking: VersionTracking,
    precedence: Precedence,
}

impl WorkspaceAggregator {
    /// Create an aggregator reading history through `reader`
    pub fn new(reader: Arc<dyn RevisionReader>) -> Self {
        Self {
            reader,
            tracking: VersionTracking::default(),
            precedence: Precedence::default(),
        }
    }

    /// Set how versions of the same package are kept
    pub fn with_tracking(mut self, tracking: VersionTracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Set the dev/prod precedence policy
    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Snapshot all manifests concurrently; results keep the input order
    pub async fn collect(
        &self,
        manifests: &[ManifestInfo],
        base_ref: &str,
    ) -> Result<Vec<PackageDiff>, ManifestError> {
        let handles: Vec<_> = manifests
            .iter()
            .cloned()
            .map(|manifest| {
                let reader = Arc::clone(&self.reader);
                let base_ref = base_ref.to_string();
                let path = manifest.path.clone();
                let handle = tokio::spawn(async move {
                    snapshot(reader.as_ref(), &manifest, &base_ref).await
                });
                (path, handle)
            })
            .collect();

        let mut diffs = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let diff = handle.await.map_err(|e| ManifestError::TaskFailed {
                path,
                message: e.to_string(),
            })??;
            diffs.push(diff);
        }
        Ok(diffs)
    }

    /// Enumerate, snapshot and aggregate the workspace rooted at `root`
    pub async fn run(&self, root: &Path, base_ref: &str) -> Result<Aggregation, AppError> {
        let manifests = detect_manifests(root)?;
        let diffs = self.collect(&manifests, base_ref).await?;
        let aggregation = aggregate(diffs, self.tracking, self.precedence)?;

        info!(
            packages = aggregation.packages.len(),
            production = aggregation.buckets.production.len(),
            development = aggregation.buckets.development.len(),
            "aggregated dependency bumps"
        );
        Ok(aggregation)
    }
}
