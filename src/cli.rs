//! CLI argument parsing module for bumplog

use crate::domain::{Precedence, VersionTracking};
use clap::Parser;
use std::path::PathBuf;

/// Record bumped workspace dependencies in CHANGELOG.md
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bumplog",
    version,
    about = "Record bumped workspace dependencies in CHANGELOG.md"
)]
pub struct CliArgs {
    /// Project root containing package.json (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Process inputs
    /// Pull request number the bump belongs to
    #[arg(long, env = "INPUT_PULL-REQUEST-NUMBER")]
    pub pull_request_number: Option<String>,

    /// Revision to compare against (default: latest v* tag, else origin/main)
    #[arg(long, env = "INPUT_BASE-REF")]
    pub base_ref: Option<String>,

    /// Changelog path, relative to the project root
    #[arg(long)]
    pub changelog: Option<PathBuf>,

    /// Configuration file (default: bumplog.toml in the project root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Aggregation policies
    /// How versions of a package seen in several workspaces are kept
    #[arg(long, value_enum)]
    pub versions: Option<VersionTracking>,

    /// Whether production bumps evict development entries
    #[arg(long, value_enum)]
    pub precedence: Option<Precedence>,

    // Rendering
    /// Package page base URL used for links
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Mention the baseline revision in the note header
    #[arg(long)]
    pub since: bool,

    // General options
    /// Dry run mode - print the note without writing the changelog
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}
