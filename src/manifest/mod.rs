//! Manifest file detection and parsing
//!
//! This module provides functionality to:
//! - Enumerate the root and workspace package.json files
//! - Parse the package.json fields that drive the comparison

mod detector;
mod package_json;

pub use detector::{detect_manifests, ManifestInfo, MANIFEST_FILENAME};
pub use package_json::{Bugs, PackageJson, Workspaces};
