//! Version-control collaborator
//!
//! This module provides:
//! - The `RevisionReader` trait: file content at a revision, and tag listing
//! - `GitCli`, which shells out to the `git` binary
//! - Baseline reference resolution (latest `v`-prefixed semver tag)

mod cli;

pub use cli::GitCli;

use crate::error::GitError;
use async_trait::async_trait;
use semver::Version;
use tracing::{debug, warn};

/// Reference used when no release tag exists
pub const DEFAULT_BASE_REF: &str = "origin/main";

/// Read-only access to repository history
#[async_trait]
pub trait RevisionReader: Send + Sync {
    /// Content of `path` (relative to the repository root) as of `revision`
    async fn show(&self, revision: &str, path: &str) -> Result<String, GitError>;

    /// All tag names in the repository
    async fn tags(&self) -> Result<Vec<String>, GitError>;
}

/// Pick the highest `v`-prefixed semver tag
pub fn latest_version_tag<S: AsRef<str>>(tags: &[S]) -> Option<&str> {
    tags.iter()
        .map(AsRef::<str>::as_ref)
        .filter_map(|tag| {
            let version = Version::parse(tag.strip_prefix('v')?).ok()?;
            Some((version, tag))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, tag)| tag)
}

/// Resolve the baseline reference to diff against
///
/// An explicit reference wins. Otherwise the latest release tag is used
/// as `refs/tags/<tag>`, falling back to `origin/main`.
pub async fn resolve_base_ref(reader: &dyn RevisionReader, explicit: Option<&str>) -> String {
    if let Some(explicit) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        return explicit.to_string();
    }

    match reader.tags().await {
        Ok(tags) => match latest_version_tag(tags.as_slice()) {
            Some(tag) => {
                debug!(tag, "using latest release tag as baseline");
                format!("refs/tags/{}", tag)
            }
            None => {
                debug!("no release tag found, using {}", DEFAULT_BASE_REF);
                DEFAULT_BASE_REF.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, "could not list tags, using {}", DEFAULT_BASE_REF);
            DEFAULT_BASE_REF.to_string()
        }
    }
}
