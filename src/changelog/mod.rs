//! Changelog rendering and editing
//!
//! This module provides:
//! - `ChangeRenderer`: the "Bumped dependencies" note with registry and PR links
//! - `Changelog`: a keep-a-changelog document model
//! - `record_change`: inserts a note into the Unreleased release

mod document;
mod render;

pub use document::{Changelog, Release, Section, SECTION_ORDER, UNRELEASED};
pub use render::{as_list_item, pull_request_url, ChangeRenderer, DEFAULT_REGISTRY_URL};

use crate::error::ChangelogError;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// The three step outputs produced by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogOutputs {
    /// Full rewritten document
    pub changelog: String,
    /// Serialized Unreleased release
    pub release: String,
    /// The note as a list item
    pub change: String,
}

/// Append `note` to the Unreleased `Changed` section and serialize
pub fn record_change(changelog: &mut Changelog, note: &str) -> ChangelogOutputs {
    let change = as_list_item(note);
    let release = changelog.unreleased_mut();
    release.changed(&change);
    let release = release.to_string();

    ChangelogOutputs {
        changelog: changelog.to_string(),
        release,
        change,
    }
}

/// Overwrite the changelog file
pub async fn write_changelog(path: &Path, content: &str) -> Result<(), ChangelogError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ChangelogError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    info!(path = %path.display(), "changelog written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_change_outputs() {
        let mut changelog =
            Changelog::parse("# Changelog\n\n## [1.0.0] - 2024-01-15\n\n### Added\n\n- First\n")
                .unwrap();
        let outputs = record_change(
            &mut changelog,
            "Bumped dependencies, in PR [#1](https://x.test/pull/1)\n- Development dependencies\n  - [`a@1.0.0`](https://npmjs.com/package/a/v/1.0.0)\n",
        );

        assert_eq!(
            outputs.change,
            "- Bumped dependencies, in PR [#1](https://x.test/pull/1)\n  - Development dependencies\n    - [`a@1.0.0`](https://npmjs.com/package/a/v/1.0.0)"
        );
        assert_eq!(
            outputs.release,
            format!("## [Unreleased]\n\n### Changed\n\n{}\n", outputs.change)
        );
        assert!(outputs.changelog.starts_with("# Changelog\n\n## [Unreleased]\n"));
        assert!(outputs.changelog.ends_with("## [1.0.0] - 2024-01-15\n\n### Added\n\n- First\n"));
    }

    #[tokio::test]
    async fn test_write_changelog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        write_changelog(&path, "# Changelog\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Changelog\n");
    }

    #[tokio::test]
    async fn test_write_changelog_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/CHANGELOG.md");
        let result = write_changelog(&path, "# Changelog\n").await;
        assert!(matches!(result, Err(ChangelogError::WriteError { .. })));
    }
}
