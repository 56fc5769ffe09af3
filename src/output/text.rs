//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The change note, printed as-is so it can be piped or pasted
//! - A colored summary of the baseline, bump counts and write status
//! - Per-bucket package lists in verbose mode

use crate::domain::VersionSet;
use crate::orchestrator::RunResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use indexmap::IndexMap;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Count bumped entries, one per version
    fn count(bucket: &IndexMap<String, VersionSet>) -> usize {
        bucket.values().map(|versions| versions.len()).sum()
    }

    /// List a bucket as `name version[, version]` lines
    fn format_bucket(
        &self,
        title: &str,
        bucket: &IndexMap<String, VersionSet>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if bucket.is_empty() {
            return Ok(());
        }

        writeln!(writer, "{}:", self.paint(title, |s| s.dimmed()))?;
        let width = bucket.keys().map(|name| name.len()).max().unwrap_or(0);
        for (name, versions) in bucket {
            let versions = versions.iter().cloned().collect::<Vec<_>>().join(", ");
            writeln!(
                writer,
                "  {:width$} {}",
                name,
                self.paint(&versions, |s| s.green()),
                width = width
            )?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "{}", result.outputs.change)
    }

    fn format_summary(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        let prefix = self.dry_run_prefix();
        let buckets = &result.aggregation.buckets;
        let production = Self::count(&buckets.production);
        let development = Self::count(&buckets.development);

        writeln!(
            writer,
            "{}{} {}",
            prefix,
            self.paint("Baseline:", |s| s.bold()),
            result.base_ref
        )?;

        if production + development == 0 {
            writeln!(
                writer,
                "{}{}",
                prefix,
                self.paint("No dependencies bumped", |s| s.dimmed())
            )?;
        } else {
            writeln!(
                writer,
                "{}{} production, {} development across {} packages",
                prefix,
                self.paint(&production.to_string(), |s| s.green()),
                self.paint(&development.to_string(), |s| s.yellow()),
                result.aggregation.packages.len()
            )?;
        }

        if self.verbosity == Verbosity::Verbose {
            self.format_bucket("Production dependencies", &buckets.production, writer)?;
            self.format_bucket("Development dependencies", &buckets.development, writer)?;
        }

        let path = result.changelog_path.display().to_string();
        if result.written {
            writeln!(writer, "{}Updated {}", prefix, self.paint(&path, |s| s.bold()))?;
        } else {
            writeln!(
                writer,
                "{}{} not written",
                prefix,
                self.paint(&path, |s| s.bold())
            )?;
        }

        Ok(())
    }
}
