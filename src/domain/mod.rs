//! Core domain models for bumplog
//!
//! This module contains the fundamental types used throughout the application:
//! - Map primitives: diff, merge and deterministic sort
//! - Version normalization and version sets
//! - Aggregation policies

mod maps;
mod policy;
mod version;

pub use maps::{diff_map, locale_cmp, merge_maps, sort_by_key};
pub use policy::{Precedence, VersionTracking};
pub use version::{strip_range_caret, VersionSet};

use indexmap::IndexMap;

/// Package name to version specifier
pub type DependencyMap = IndexMap<String, String>;
