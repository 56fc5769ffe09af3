//! Orchestrator for the whole bump-note workflow
//!
//! This module provides:
//! - Workflow coordination: resolve baseline → snapshot → aggregate → render → write
//! - Dry-run mode support
//! - All-or-nothing changelog update: nothing is written unless every step succeeded

use crate::aggregate::{Aggregation, WorkspaceAggregator};
use crate::changelog::{record_change, write_changelog, ChangeRenderer, Changelog, ChangelogOutputs};
use crate::config::Settings;
use crate::error::AppError;
use crate::git::{resolve_base_ref, GitCli, RevisionReader};
use crate::progress::Progress;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Orchestrator for the bump-note workflow
pub struct Orchestrator {
    /// Resolved settings
    settings: Settings,
    /// Repository history
    reader: Arc<dyn RevisionReader>,
}

/// Result of running the orchestrator
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Baseline revision the workspace was compared against
    pub base_ref: String,
    /// Changelog path
    pub changelog_path: PathBuf,
    /// Aggregated bumps and per-package results
    pub aggregation: Aggregation,
    /// Step outputs
    pub outputs: ChangelogOutputs,
    /// Whether the changelog file was rewritten
    pub written: bool,
}

impl Orchestrator {
    /// Create an orchestrator reading history with the `git` binary in the project root
    pub fn new(settings: Settings) -> Self {
        let reader = Arc::new(GitCli::new(settings.root.clone()));
        Self::with_reader(settings, reader)
    }

    /// Create an orchestrator with a custom history reader (for testing)
    pub fn with_reader(settings: Settings, reader: Arc<dyn RevisionReader>) -> Self {
        Self { settings, reader }
    }

    /// Resolved settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the workflow
    pub async fn run(&self) -> Result<RunResult, AppError> {
        self.run_with_progress(false).await
    }

    /// Run the workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> Result<RunResult, AppError> {
        let settings = &self.settings;
        let mut progress = Progress::new(show_progress);

        // Validate the registry URL before any work
        let renderer = ChangeRenderer::new(&settings.registry_url)?;

        // Step 1: Baseline revision
        let base_ref = resolve_base_ref(self.reader.as_ref(), settings.base_ref.as_deref()).await;
        info!(base_ref = %base_ref, "comparing against baseline");

        // Step 2: Snapshot and aggregate every workspace
        progress.spinner(&format!("Comparing manifests against {}...", base_ref));
        let aggregation = WorkspaceAggregator::new(Arc::clone(&self.reader))
            .with_tracking(settings.tracking)
            .with_precedence(settings.precedence)
            .run(&settings.root, &base_ref)
            .await;
        progress.finish_and_clear();
        let aggregation = aggregation?;

        // Step 3: Render the note into the changelog
        let mut changelog = Changelog::read(&settings.changelog).await?;
        let since = settings.since.then_some(base_ref.as_str());
        let note = renderer.render(
            &aggregation.buckets,
            &settings.pull_request,
            &aggregation.project_url,
            since,
        )?;
        let outputs = record_change(&mut changelog, &note);

        // Step 4: Write
        let written = if settings.dry_run {
            info!(path = %settings.changelog.display(), "dry run, changelog not written");
            false
        } else {
            write_changelog(&settings.changelog, &outputs.changelog).await?;
            true
        };

        Ok(RunResult {
            base_ref,
            changelog_path: settings.changelog.clone(),
            aggregation,
            outputs,
            written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::DEFAULT_REGISTRY_URL;
    use crate::domain::{Precedence, VersionTracking};
    use crate::error::{AggregateError, ChangelogError, ConfigError};
    use crate::git::testing::MemoryReader;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const BASE: &str = "refs/tags/v1.0.0";
    const CHANGELOG: &str = "# Changelog\n\n## [1.0.0] - 2024-01-15\n\n### Added\n\n- First\n";

    fn settings(root: &Path) -> Settings {
        Settings {
            root: root.to_path_buf(),
            pull_request: "42".to_string(),
            base_ref: None,
            changelog: root.join("CHANGELOG.md"),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            tracking: VersionTracking::Single,
            precedence: Precedence::LastWins,
            since: false,
            dry_run: false,
        }
    }

    fn project() -> (TempDir, MemoryReader) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "lib",
                "bugs": {"url": "https://github.com/o/r/issues"},
                "dependencies": {"a": "^1.1.0", "b": "^2.0.0"},
                "devDependencies": {"jest": "^29.7.0"}
            }"#,
        )
        .unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();

        let reader = MemoryReader::new().with_tags(&["v0.9.0", "v1.0.0"]).with_file(
            BASE,
            "package.json",
            r#"{"dependencies": {"a": "^1.0.0"}, "devDependencies": {"jest": "^29.0.0"}}"#,
        );
        (dir, reader)
    }

    #[tokio::test]
    async fn test_run_writes_changelog() {
        let (dir, reader) = project();
        let orchestrator = Orchestrator::with_reader(settings(dir.path()), Arc::new(reader));

        let result = orchestrator.run().await.unwrap();
        assert_eq!(result.base_ref, BASE);
        assert!(result.written);

        let expected_change = "- Bumped dependencies, in PR [#42](https://github.com/o/r/pull/42)\n  \
             - Production dependencies\n    \
             - [`a@1.1.0`](https://npmjs.com/package/a/v/1.1.0)\n    \
             - [`b@2.0.0`](https://npmjs.com/package/b/v/2.0.0)\n  \
             - Development dependencies\n    \
             - [`jest@29.7.0`](https://npmjs.com/package/jest/v/29.7.0)";
        assert_eq!(result.outputs.change, expected_change);

        let written = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert_eq!(written, result.outputs.changelog);
        assert!(written.starts_with("# Changelog\n\n## [Unreleased]\n\n### Changed\n\n- Bumped"));
        assert!(written.ends_with("## [1.0.0] - 2024-01-15\n\n### Added\n\n- First\n"));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_changelog() {
        let (dir, reader) = project();
        let mut settings = settings(dir.path());
        settings.dry_run = true;
        let orchestrator = Orchestrator::with_reader(settings, Arc::new(reader));

        let result = orchestrator.run().await.unwrap();
        assert!(!result.written);
        assert!(result.outputs.changelog.contains("## [Unreleased]"));
        assert_eq!(
            fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            CHANGELOG
        );
    }

    #[tokio::test]
    async fn test_no_public_package_leaves_changelog() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"private": true, "bugs": "https://github.com/o/r/issues", "dependencies": {"a": "1.0.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), CHANGELOG).unwrap();

        let orchestrator =
            Orchestrator::with_reader(settings(dir.path()), Arc::new(MemoryReader::new()));
        let result = orchestrator.run().await;

        assert!(matches!(
            result,
            Err(AppError::Aggregate(AggregateError::NoPublicPackage))
        ));
        assert_eq!(
            fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
            CHANGELOG
        );
    }

    #[tokio::test]
    async fn test_since_and_explicit_base_ref() {
        let (dir, reader) = project();
        let mut settings = settings(dir.path());
        settings.since = true;
        settings.base_ref = Some("origin/main".to_string());
        let orchestrator = Orchestrator::with_reader(settings, Arc::new(reader));

        let result = orchestrator.run().await.unwrap();
        assert_eq!(result.base_ref, "origin/main");
        assert!(result
            .outputs
            .change
            .starts_with("- Bumped dependencies, in PR [#42](https://github.com/o/r/pull/42), since origin/main\n"));
        // Nothing at origin/main, so every dependency counts as new
        assert!(result.outputs.change.contains("jest@29.7.0"));
    }

    #[tokio::test]
    async fn test_missing_changelog_is_fatal() {
        let (dir, reader) = project();
        fs::remove_file(dir.path().join("CHANGELOG.md")).unwrap();
        let orchestrator = Orchestrator::with_reader(settings(dir.path()), Arc::new(reader));

        let result = orchestrator.run().await;
        assert!(matches!(
            result,
            Err(AppError::Changelog(ChangelogError::ReadError { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_registry_url_fails_before_work() {
        let (dir, reader) = project();
        let mut settings = settings(dir.path());
        settings.registry_url = "not a url".to_string();
        let orchestrator = Orchestrator::with_reader(settings, Arc::new(reader));

        let result = orchestrator.run().await;
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidUrl { .. }))
        ));
    }
}
