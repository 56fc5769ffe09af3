//! Layered configuration
//!
//! This module provides:
//! - `FileConfig`: the optional `bumplog.toml` in the project root
//! - `Settings`: defaults, overridden by the file, overridden by the CLI

use crate::changelog::DEFAULT_REGISTRY_URL;
use crate::cli::CliArgs;
use crate::domain::{Precedence, VersionTracking};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the project root
pub const CONFIG_FILENAME: &str = "bumplog.toml";

/// Default changelog path, relative to the project root
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Contents of `bumplog.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Changelog path, relative to the project root
    pub changelog: Option<PathBuf>,
    /// Package page base URL
    pub registry_url: Option<String>,
    /// Version tracking policy
    pub versions: Option<VersionTracking>,
    /// Bucket precedence policy
    pub precedence: Option<Precedence>,
    /// Baseline revision
    pub base_ref: Option<String>,
    /// Mention the baseline in the note header
    pub since: Option<bool>,
}

impl FileConfig {
    /// Parse TOML content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a config file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::parse(&content, path)
    }

    /// Load the explicit config file, or `bumplog.toml` in `root` if present
    pub async fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path).await;
        }

        let path = root.join(CONFIG_FILENAME);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "loading config");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }
}

/// Resolved run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Project root
    pub root: PathBuf,
    /// Pull request number, trimmed
    pub pull_request: String,
    /// Explicit baseline revision, if any
    pub base_ref: Option<String>,
    /// Changelog path, joined onto the root
    pub changelog: PathBuf,
    /// Package page base URL
    pub registry_url: String,
    /// Version tracking policy
    pub tracking: VersionTracking,
    /// Bucket precedence policy
    pub precedence: Precedence,
    /// Mention the baseline in the note header
    pub since: bool,
    /// Skip writing the changelog
    pub dry_run: bool,
}

impl Settings {
    /// Merge CLI arguments over a config file over built-in defaults
    pub fn from_layers(args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let pull_request = args
            .pull_request_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ConfigError::MissingPullRequest)?
            .to_string();

        let changelog = args
            .changelog
            .clone()
            .or(file.changelog)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG));

        Ok(Self {
            root: args.path.clone(),
            pull_request,
            base_ref: args.base_ref.clone().or(file.base_ref),
            changelog: args.path.join(changelog),
            registry_url: args
                .registry_url
                .clone()
                .or(file.registry_url)
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            tracking: args.versions.or(file.versions).unwrap_or_default(),
            precedence: args.precedence.or(file.precedence).unwrap_or_default(),
            since: args.since || file.since.unwrap_or(false),
            dry_run: args.dry_run,
        })
    }

    /// Discover the config file and resolve settings
    pub async fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = FileConfig::discover(&args.path, args.config.as_deref()).await?;
        let settings = Self::from_layers(args, file)?;
        debug!(?settings, "resolved settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["bumplog", "/project", "--pull-request-number", "42"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_layers(&args(&[]), FileConfig::default()).unwrap();
        assert_eq!(settings.root, PathBuf::from("/project"));
        assert_eq!(settings.pull_request, "42");
        assert_eq!(settings.changelog, PathBuf::from("/project/CHANGELOG.md"));
        assert_eq!(settings.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(settings.tracking, VersionTracking::Single);
        assert_eq!(settings.precedence, Precedence::LastWins);
        assert!(settings.base_ref.is_none());
        assert!(!settings.since);
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_pull_request_trimmed() {
        let cli = CliArgs::parse_from(["bumplog", "--pull-request-number", " 7 \n"]);
        let settings = Settings::from_layers(&cli, FileConfig::default()).unwrap();
        assert_eq!(settings.pull_request, "7");
    }

    #[test]
    fn test_blank_pull_request_rejected() {
        let cli = CliArgs::parse_from(["bumplog", "--pull-request-number", "   "]);
        let result = Settings::from_layers(&cli, FileConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingPullRequest)));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = FileConfig::parse(
            r#"
changelog = "docs/CHANGES.md"
registry_url = "https://registry.example/"
versions = "multiple"
precedence = "production"
base_ref = "origin/develop"
since = true
"#,
            Path::new("bumplog.toml"),
        )
        .unwrap();

        let settings = Settings::from_layers(&args(&[]), file).unwrap();
        assert_eq!(settings.changelog, PathBuf::from("/project/docs/CHANGES.md"));
        assert_eq!(settings.registry_url, "https://registry.example/");
        assert_eq!(settings.tracking, VersionTracking::Multiple);
        assert_eq!(settings.precedence, Precedence::Production);
        assert_eq!(settings.base_ref.as_deref(), Some("origin/develop"));
        assert!(settings.since);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            versions: Some(VersionTracking::Multiple),
            base_ref: Some("origin/develop".to_string()),
            changelog: Some(PathBuf::from("docs/CHANGES.md")),
            ..FileConfig::default()
        };
        let cli = args(&[
            "--versions",
            "single",
            "--base-ref",
            "refs/tags/v2.0.0",
            "--changelog",
            "HISTORY.md",
        ]);

        let settings = Settings::from_layers(&cli, file).unwrap();
        assert_eq!(settings.tracking, VersionTracking::Single);
        assert_eq!(settings.base_ref.as_deref(), Some("refs/tags/v2.0.0"));
        assert_eq!(settings.changelog, PathBuf::from("/project/HISTORY.md"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = FileConfig::parse("colour = true\n", Path::new("bumplog.toml"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_invalid_policy_value_rejected() {
        let result = FileConfig::parse("versions = \"all\"\n", Path::new("bumplog.toml"));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[tokio::test]
    async fn test_discover_in_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "since = true\n").unwrap();

        let file = FileConfig::discover(dir.path(), None).await.unwrap();
        assert_eq!(file.since, Some(true));
    }

    #[tokio::test]
    async fn test_discover_without_file() {
        let dir = TempDir::new().unwrap();
        let file = FileConfig::discover(dir.path(), None).await.unwrap();
        assert_eq!(file, FileConfig::default());
    }

    #[tokio::test]
    async fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = FileConfig::discover(dir.path(), Some(&missing)).await;
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
