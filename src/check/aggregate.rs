// SPDX-License-Identifier: MIT
//! Result aggregation — folds a batch of check results into one verdict.
//!
//! The two run classes differ in exactly two places, both explicit here:
//!
//! - **Exit policy.** Boot-class runs `Propagate` a nonzero exit code on
//!   failure so dependent automation never trusts a broken machine.
//!   Audit-class runs `Suppress` it and always exit zero, so a scheduler
//!   never confuses "drift observed" with "tool crashed".
//! - **Warning handling.** The boot class counts `Warning` toward the
//!   failure tally (a degraded disk must gate the boot); the audit class
//!   does not.

use crate::check::{CheckResult, Severity};
use serde::{Deserialize, Serialize};

/// What the recommended process exit code does with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// Nonzero exit when the run has failures (boot class).
    Propagate,
    /// Always exit zero; the log record carries the verdict (audit class).
    Suppress,
}

/// Aggregation policy for one run class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatePolicy {
    pub exit: ExitPolicy,
    /// Count `Warning` results in `failure_count`. Boot-class only.
    pub treat_warning_as_failure: bool,
}

impl AggregatePolicy {
    /// Boot-class policy: propagate failures, warnings gate the boot.
    pub fn boot() -> Self {
        Self {
            exit: ExitPolicy::Propagate,
            treat_warning_as_failure: true,
        }
    }

    /// Audit-class policy: suppress the exit code, warnings inform only.
    pub fn audit() -> Self {
        Self {
            exit: ExitPolicy::Suppress,
            treat_warning_as_failure: false,
        }
    }
}

/// Aggregated verdict over one run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateVerdict {
    /// Every input result, in evaluation order. Never dropped or reordered.
    pub results: Vec<CheckResult>,
    /// Count of failure-contributing results under the policy.
    pub failure_count: usize,
    /// Worst severity observed, or `Success` for an empty run.
    pub overall: Severity,
    /// Policy the verdict was computed under.
    pub policy: AggregatePolicy,
}

impl AggregateVerdict {
    /// Recommended process exit code under the verdict's policy.
    pub fn exit_code(&self) -> i32 {
        match self.policy.exit {
            ExitPolicy::Suppress => 0,
            ExitPolicy::Propagate => {
                if self.failure_count == 0 {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// One-line summary for the end of every run.
    pub fn summary(&self) -> String {
        format!(
            "{} checks, {} failed, worst level {}",
            self.results.len(),
            self.failure_count,
            self.overall
        )
    }
}

/// Fold a sequence of results into an [`AggregateVerdict`].
pub fn aggregate(results: Vec<CheckResult>, policy: AggregatePolicy) -> AggregateVerdict {
    let overall = results
        .iter()
        .map(|r| r.level)
        .max()
        .unwrap_or(Severity::Success);

    let failure_count = results
        .iter()
        .filter(|r| {
            r.level.is_failure()
                || (policy.treat_warning_as_failure && r.level == Severity::Warning)
        })
        .count();

    AggregateVerdict {
        results,
        failure_count,
        overall,
        policy,
    }
}
