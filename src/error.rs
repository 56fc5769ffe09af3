//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with package.json reading and parsing
//! - GitError: Issues running the git collaborator, always recovered by callers
//! - AggregateError: Business-rule failures while aggregating workspaces
//! - ChangelogError: Issues with CHANGELOG.md reading and parsing
//! - ConfigError: Issues with configuration and process inputs
//! - OutputError: Failures writing step outputs

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Aggregation related errors
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// Changelog related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output related errors
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or schema error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Invalid workspace pattern in the root manifest
    #[error("invalid workspace pattern '{pattern}': {message}")]
    InvalidWorkspace { pattern: String, message: String },

    /// A snapshot task did not run to completion
    #[error("snapshot of {path} did not complete: {message}")]
    TaskFailed { path: PathBuf, message: String },
}

/// Errors related to the git collaborator
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary could not be started
    #[error("failed to run git {args}: {source}")]
    SpawnError {
        args: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status
    #[error("git {args} failed: {stderr}")]
    CommandFailed { args: String, stderr: String },
}

/// Errors raised while aggregating workspace results
#[derive(Error, Debug)]
pub enum AggregateError {
    /// No public package declares a bug tracker URL
    #[error("At least one public package must have bugs.url field set.")]
    NoPublicPackage,
}

/// Errors related to the changelog document
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// Failed to read the changelog
    #[error("failed to read changelog {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the changelog
    #[error("failed to write changelog {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document does not start with a level-one title
    #[error("changelog has no '# ' title heading")]
    MissingTitle,

    /// Change-type heading found outside of any release
    #[error("line {line}: section '{heading}' appears before any release heading")]
    OrphanSection { line: usize, heading: String },

    /// Same release heading appears twice
    #[error("line {line}: duplicate release '{version}'")]
    DuplicateRelease { line: usize, version: String },
}

/// Errors related to configuration and process inputs
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Pull request number is empty after trimming
    #[error("pull request number must not be empty")]
    MissingPullRequest,

    /// A URL could not be parsed or joined
    #[error("invalid URL '{value}': {message}")]
    InvalidUrl { value: String, message: String },
}

/// Errors related to step outputs
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to append to the GitHub Actions output file
    #[error("failed to write step outputs to {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new ReadError, mapping a missing file to NotFound
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return ManifestError::NotFound { path };
        }
        ManifestError::ReadError { path, source }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl GitError {
    /// Creates a new CommandFailed error
    pub fn command_failed(args: &[&str], stderr: impl Into<String>) -> Self {
        GitError::CommandFailed {
            args: args.join(" "),
            stderr: stderr.into().trim().to_string(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidUrl error
    pub fn invalid_url(value: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidUrl {
            value: value.into(),
            message: message.to_string(),
        }
    }
}
