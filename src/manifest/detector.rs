//! Workspace manifest enumeration
//!
//! Features:
//! - Root package.json is always first
//! - Declared workspaces follow in listed order
//! - Glob patterns (`packages/*`) expand to directories holding a package.json
//! - Duplicate directories are listed once
//! - Entries leaving the project root are rejected

use crate::error::ManifestError;
use crate::manifest::PackageJson;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Manifest filename for Node.js packages
pub const MANIFEST_FILENAME: &str = "package.json";

/// A package.json that takes part in the comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Absolute (or root-joined) path to the manifest file
    pub path: PathBuf,
    /// Manifest path relative to the project root, `/`-separated, as git expects
    pub relative_path: String,
}

impl ManifestInfo {
    /// Create a new ManifestInfo for a package directory relative to `root`
    pub fn new(root: &Path, relative_dir: &Path) -> Self {
        let relative_path = to_git_path(&relative_dir.join(MANIFEST_FILENAME));
        Self {
            path: root.join(&relative_path),
            relative_path,
        }
    }
}

/// Enumerate the root manifest and every declared workspace manifest
///
/// A root manifest without `workspaces` yields only itself. Reading or
/// parsing the root manifest is fatal.
pub fn detect_manifests(root: &Path) -> Result<Vec<ManifestInfo>, ManifestError> {
    let root_path = root.join(MANIFEST_FILENAME);
    let content = std::fs::read_to_string(&root_path)
        .map_err(|e| ManifestError::read_error(&root_path, e))?;
    let root_manifest = PackageJson::parse(&content, &root_path)?;

    let mut manifests = vec![ManifestInfo::new(root, Path::new("."))];
    let mut seen: HashSet<String> = manifests.iter().map(|m| m.relative_path.clone()).collect();

    for pattern in root_manifest.workspace_patterns() {
        for dir in expand_workspace(root, pattern)? {
            let info = ManifestInfo::new(root, &dir);
            if seen.insert(info.relative_path.clone()) {
                manifests.push(info);
            } else {
                debug!(path = %info.relative_path, "skipping duplicate workspace");
            }
        }
    }

    debug!(count = manifests.len(), "workspace manifests detected");
    Ok(manifests)
}

/// Returns true if the pattern needs glob expansion
fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand one workspace entry into package directories relative to `root`
fn expand_workspace(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, ManifestError> {
    let escapes_root = Path::new(pattern).components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes_root {
        return Err(ManifestError::InvalidWorkspace {
            pattern: pattern.to_string(),
            message: "workspace must stay inside the project root".to_string(),
        });
    }

    if !is_glob(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        pattern
    );
    let entries = glob::glob(&full_pattern).map_err(|e| ManifestError::InvalidWorkspace {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|path| path.join(MANIFEST_FILENAME).is_file())
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    dirs.sort();

    debug!(pattern, matches = dirs.len(), "expanded workspace pattern");
    Ok(dirs)
}

/// Render a relative path with `/` separators, dropping `.` components
fn to_git_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
