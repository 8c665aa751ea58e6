// SPDX-License-Identifier: MIT
//! Drift detection — compares live, staged, and golden configuration tiers.
//!
//! Tier 1 compares each cataloged artifact pair (live vs staged) with
//! per-file classification. Tier 2 is a coarse recursive sweep of the staged
//! tree against the golden backup, with glob exclusions for secret material.

pub mod audit;
pub mod compare;

pub use audit::AuditEngine;
pub use compare::{compare_files, compare_trees};

use crate::check::Severity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Kind of managed artifact a catalog entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    /// Scripts and binaries invoked by the scheduler.
    Executable,
    /// Service-manager unit definitions.
    ServiceUnit,
    /// Schedule (timer) definitions.
    TimerUnit,
    /// Settings and configuration files.
    Settings,
}

impl std::fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArtifactCategory::Executable => "executable",
            ArtifactCategory::ServiceUnit => "service unit",
            ArtifactCategory::TimerUnit => "timer unit",
            ArtifactCategory::Settings => "settings",
        };
        f.write_str(s)
    }
}

/// One entry in the audit catalog: a live artifact and its staged reference.
///
/// The catalog is static configuration, one entry per managed file. Both
/// paths are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftPair {
    /// Descriptive name, e.g. `"Boot Script"`.
    pub label: String,
    pub category: ArtifactCategory,
    /// The live artifact's location.
    pub source_path: PathBuf,
    /// The staged artifact's expected location.
    pub reference_path: PathBuf,
}

/// Classification of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftOutcome {
    /// Contents equal after whitespace normalization.
    Match,
    /// Contents differ, or (tree comparison) a path exists on one side only.
    Drift,
    /// The live artifact is absent. The live side is mandatory.
    MissingSource,
    /// The staged reference is absent. A baseline may legitimately not exist yet.
    MissingReference,
}

impl DriftOutcome {
    /// Fixed severity mapping for catalog comparisons.
    pub fn severity(self) -> Severity {
        match self {
            DriftOutcome::Match => Severity::Info,
            DriftOutcome::Drift => Severity::Warning,
            DriftOutcome::MissingSource => Severity::Error,
            DriftOutcome::MissingReference => Severity::Warning,
        }
    }
}

/// Errors raised by the comparison operations.
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}
