//! Aggregation policies
//!
//! Two designs exist for folding per-package results into the aggregate
//! buckets. Both are supported and chosen through configuration.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How versions of the same package reported by several workspaces are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionTracking {
    /// One version per package; a later workspace overwrites an earlier one
    #[default]
    Single,
    /// Every distinct version seen across workspaces
    Multiple,
}

/// What happens when a package is both a development and a production bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// Buckets are independent; each keeps whatever was written last
    #[default]
    LastWins,
    /// A public production bump evicts the package from the development bucket
    Production,
}

impl fmt::Display for VersionTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTracking::Single => write!(f, "single"),
            VersionTracking::Multiple => write!(f, "multiple"),
        }
    }
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precedence::LastWins => write!(f, "last-wins"),
            Precedence::Production => write!(f, "production"),
        }
    }
}
