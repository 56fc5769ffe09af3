//! package.json model for workspace packages
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - private flag
//! - bugs (object with url, or bare URL string)
//! - workspaces (array, or object with packages array)

use crate::domain::DependencyMap;
use crate::error::ManifestError;
use serde::Deserialize;
use std::path::Path;

/// The parts of a package.json this tool reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// Production dependencies
    #[serde(default)]
    pub dependencies: DependencyMap,
    /// Development dependencies
    #[serde(default)]
    pub dev_dependencies: DependencyMap,
    /// Whether the package is excluded from publishing
    #[serde(default)]
    pub private: bool,
    /// Issue tracker
    #[serde(default)]
    pub bugs: Option<Bugs>,
    /// Workspace declarations (root manifest only)
    #[serde(default)]
    pub workspaces: Option<Workspaces>,
}

/// `bugs` field: either `{ "url": ... }` or a bare URL string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bugs {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

/// `workspaces` field: npm array form or yarn object form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    List(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl PackageJson {
    /// Parse package.json content; `path` is used for error context only
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
    }

    /// Read and parse a package.json from disk
    pub async fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::read_error(path, e))?;
        Self::parse(&content, path)
    }

    /// Placeholder used when no baseline manifest could be loaded
    ///
    /// Nothing existed before, and the package is treated as private.
    pub fn missing_baseline() -> Self {
        Self {
            private: true,
            ..Self::default()
        }
    }

    /// The issue tracker URL, if declared and non-empty
    pub fn bugs_url(&self) -> Option<&str> {
        let url = match self.bugs.as_ref()? {
            Bugs::Url(url) => url.as_str(),
            Bugs::Object { url } => url.as_deref()?,
        };
        let url = url.trim();
        (!url.is_empty()).then_some(url)
    }

    /// Declared workspace patterns in listed order
    pub fn workspace_patterns(&self) -> &[String] {
        match &self.workspaces {
            Some(Workspaces::List(list)) => list,
            Some(Workspaces::Object { packages }) => packages,
            None => &[],
        }
    }
}
