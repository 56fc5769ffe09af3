//! Version string normalization
//!
//! Only a single leading caret is stripped. Other range operators stay
//! in place; this is not semver range parsing.

use std::collections::BTreeSet;

/// Distinct versions reported for one package name, in string order
pub type VersionSet = BTreeSet<String>;

/// Strips exactly one leading `^` from a version specifier
pub fn strip_range_caret(spec: &str) -> &str {
    spec.strip_prefix('^').unwrap_or(spec)
}
