// SPDX-License-Identifier: MIT
//! Check primitives: the severity taxonomy, per-check results, and the
//! probe trait every concrete check implements.

pub mod aggregate;
pub mod runner;

pub use aggregate::{aggregate, AggregatePolicy, AggregateVerdict, ExitPolicy};
pub use runner::CheckRunner;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Severity of a check result.
///
/// The ordering is total and fixed (`Success < Info < Warning < Error <
/// Critical`); aggregation relies on it and must stay exhaustive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Returns `true` for the levels counted as failures under every policy.
    pub fn is_failure(self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }

    /// Fixed-width tag used in operator log lines.
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Result of running a single check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Human-readable name of the check, unique within one run.
    pub name: String,
    /// Severity of the outcome.
    pub level: Severity,
    /// Short summary of what was observed.
    pub message: String,
    /// Supplementary lines (raw tool output, per-device counters). May be empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<String>,
    /// ISO-8601 timestamp when the result was produced.
    pub timestamp: String,
}

impl CheckResult {
    /// Create a result at an explicit level.
    pub fn new(name: impl Into<String>, level: Severity, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            message: message.into(),
            detail: Vec::new(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn success(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Severity::Success, message)
    }

    pub fn info(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Severity::Info, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Severity::Warning, message)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Severity::Error, message)
    }

    pub fn critical(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Severity::Critical, message)
    }

    /// Attach supplementary detail lines.
    pub fn with_detail(mut self, detail: Vec<String>) -> Self {
        self.detail = detail;
        self
    }
}

/// A single named probe.
///
/// Implementations wrap one external fact-gathering operation (a SMART query,
/// a mount write probe, a service status call) and normalize its outcome into
/// a [`CheckResult`]. `run` must not panic across the boundary — the runner
/// converts panics into `Error` results, but a well-behaved probe reports its
/// own faults.
#[async_trait]
pub trait Check: Send + Sync {
    /// Name used for the result and for fault attribution by the runner.
    fn name(&self) -> String;

    /// Run the probe and return a result.
    async fn run(&self) -> CheckResult;
}
