//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the three step outputs
//! - Aggregated buckets and per-package bump counts

use crate::aggregate::DependencyBuckets;
use crate::orchestrator::RunResult;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Whether this was a dry-run
    dry_run: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Whether the changelog was rewritten
    written: bool,
    /// Baseline revision
    base_ref: &'a str,
    /// Project URL used for the pull request link
    project_url: &'a str,
    /// Aggregated bumps
    dependencies: &'a DependencyBuckets,
    /// Per-package results
    packages: Vec<JsonPackage<'a>>,
    /// Full rewritten changelog
    changelog: &'a str,
    /// Serialized Unreleased release
    release: &'a str,
    /// Note as a list item
    change: &'a str,
}

/// JSON representation of one package
#[derive(Serialize)]
struct JsonPackage<'a> {
    /// Manifest path relative to the project root
    manifest: &'a str,
    /// Package name
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    /// Whether the package is private
    private: bool,
    /// Number of bumped production dependencies
    dependencies: usize,
    /// Number of bumped development dependencies
    dev_dependencies: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let packages = result
            .aggregation
            .packages
            .iter()
            .map(|diff| JsonPackage {
                manifest: &diff.manifest,
                name: diff.name.as_deref(),
                private: diff.is_private,
                dependencies: diff.dependencies.len(),
                dev_dependencies: diff.dev_dependencies.len(),
            })
            .collect();

        let output = JsonOutput {
            dry_run: self.dry_run,
            written: result.written,
            base_ref: &result.base_ref,
            project_url: &result.aggregation.project_url,
            dependencies: &result.aggregation.buckets,
            packages,
            changelog: &result.outputs.changelog,
            release: &result.outputs.release,
            change: &result.outputs.change,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    fn format_summary(&self, _result: &RunResult, _writer: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }
}
