//! `git` binary integration
//!
//! Runs git commands in the project root and captures their output.

use crate::error::GitError;
use crate::git::RevisionReader;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// RevisionReader backed by the system `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Directory git commands run in
    working_dir: PathBuf,
}

impl GitCli {
    /// Create a git runner for the given directory
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Directory git commands run in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run git with the given arguments and return stdout on success
    async fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!(?args, dir = %self.working_dir.display(), "running git");

        let output: Output = Command::new("git")
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .await
            .map_err(|e| GitError::SpawnError {
                args: args.join(" "),
                source: e,
            })?;

        if !output.status.success() {
            return Err(GitError::command_failed(
                args,
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl RevisionReader for GitCli {
    async fn show(&self, revision: &str, path: &str) -> Result<String, GitError> {
        let object = format!("{}:{}", revision, path);
        self.run(&["show", object.as_str()]).await
    }

    async fn tags(&self) -> Result<Vec<String>, GitError> {
        let stdout = self.run(&["tag", "--list"]).await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
