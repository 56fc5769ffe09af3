//! bumplog - changelog notes for bumped workspace dependencies
//!
//! This library compares the dependencies of every package in an npm
//! workspace against a baseline git revision and renders the bumps as a
//! keep-a-changelog "Changed" entry:
//! - Workspace enumeration and per-package snapshots
//! - Aggregation into production and development buckets
//! - Changelog rendering and editing

pub mod aggregate;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod snapshot;
