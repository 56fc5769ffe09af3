//! Output formatting for run results
//!
//! This module provides:
//! - Text output: the change note on stdout, a colored summary on stderr
//! - JSON output for machine processing
//! - GitHub Actions step outputs

mod github;
mod json;
mod text;

pub use github::{format_github_output, write_github_outputs, GITHUB_OUTPUT_ENV};
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::orchestrator::RunResult;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether this is a dry-run
    pub dry_run: bool,
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            format,
            verbosity,
            dry_run,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, dry_run: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self::new(format, verbosity, dry_run)
    }

    /// Whether a spinner should be drawn
    pub fn show_progress(&self) -> bool {
        self.format == OutputFormat::Text && self.verbosity != Verbosity::Quiet
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the main result (stdout)
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write a human summary (stderr)
    fn format_summary(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.verbosity, config.dry_run)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.dry_run)),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::aggregate::{Aggregation, DependencyBuckets};
    use crate::changelog::ChangelogOutputs;
    use crate::orchestrator::RunResult;
    use crate::snapshot::PackageDiff;
    use std::path::PathBuf;

    /// A run that bumped one production and one development dependency
    pub fn run_result(written: bool) -> RunResult {
        let mut buckets = DependencyBuckets::new();
        buckets
            .production
            .insert("b".to_string(), ["2.0.0".to_string()].into());
        buckets
            .development
            .insert("jest".to_string(), ["29.7.0".to_string()].into());

        let change = "- Bumped dependencies, in PR [#42](https://github.com/o/r/pull/42)\n  - Production dependencies\n    - [`b@2.0.0`](https://npmjs.com/package/b/v/2.0.0)\n  - Development dependencies\n    - [`jest@29.7.0`](https://npmjs.com/package/jest/v/29.7.0)".to_string();
        let release = format!("## [Unreleased]\n\n### Changed\n\n{}\n", change);

        RunResult {
            base_ref: "refs/tags/v1.0.0".to_string(),
            changelog_path: PathBuf::from("CHANGELOG.md"),
            aggregation: Aggregation {
                buckets,
                project_url: "https://github.com/o/r/issues".to_string(),
                packages: vec![
                    PackageDiff {
                        manifest: "package.json".to_string(),
                        is_private: true,
                        ..PackageDiff::default()
                    },
                    PackageDiff {
                        manifest: "packages/lib/package.json".to_string(),
                        name: Some("lib".to_string()),
                        ..PackageDiff::default()
                    },
                ],
            },
            outputs: ChangelogOutputs {
                changelog: format!("# Changelog\n\n{}", release),
                release,
                change,
            },
            written,
        }
    }
}
