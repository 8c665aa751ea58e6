// SPDX-License-Identifier: MIT
//! Layered audit engine — orchestrates Tier 1 and Tier 2 comparisons.
//!
//! Tier 1 walks the artifact catalog and classifies every live/staged pair.
//! Tier 2 sweeps the whole staged tree against the golden backup, when the
//! golden root is reachable. A detached backup medium is expected during
//! normal operation, so an unreachable golden tier is a `Warning`, never an
//! `Error`.

use crate::check::{aggregate, AggregatePolicy, AggregateVerdict, CheckResult};
use crate::drift::compare::{compare_files, compare_trees};
use crate::drift::{DriftOutcome, DriftPair};
use std::path::PathBuf;
use tracing::debug;

/// Passphrase material is never compared, regardless of configuration.
const SECRET_EXCLUDE: &str = "*passphrase*";

/// Runs the full layered audit: per-catalog Tier 1, bulk Tier 2, aggregated
/// under the audit (suppress) policy.
pub struct AuditEngine {
    catalog: Vec<DriftPair>,
    working_root: PathBuf,
    golden_root: PathBuf,
    exclude: Vec<String>,
}

impl AuditEngine {
    pub fn new(
        catalog: Vec<DriftPair>,
        working_root: impl Into<PathBuf>,
        golden_root: impl Into<PathBuf>,
        extra_excludes: Vec<String>,
    ) -> Self {
        let mut exclude = vec![SECRET_EXCLUDE.to_string()];
        exclude.extend(
            extra_excludes
                .into_iter()
                .filter(|p| p != SECRET_EXCLUDE),
        );
        Self {
            catalog,
            working_root: working_root.into(),
            golden_root: golden_root.into(),
            exclude,
        }
    }

    /// Run both tiers and fold every result into one verdict.
    ///
    /// Each run is a pure function of the current filesystem state of the
    /// three tiers; nothing persists between runs.
    pub fn run_audit(&self) -> AggregateVerdict {
        let mut results = Vec::with_capacity(self.catalog.len() + 1);

        // ── Tier 1: live vs staged, per catalog entry ────────────────────
        for pair in &self.catalog {
            results.push(self.compare_pair(pair));
        }

        // ── Tier 2: staged vs golden, bulk sweep ─────────────────────────
        results.push(self.sweep_golden());

        aggregate(results, AggregatePolicy::audit())
    }

    fn compare_pair(&self, pair: &DriftPair) -> CheckResult {
        debug!(label = %pair.label, "tier 1 comparison");
        match compare_files(&pair.source_path, &pair.reference_path) {
            Ok(outcome) => {
                let message = match outcome {
                    DriftOutcome::Match => {
                        format!("{} matches staged copy", pair.category)
                    }
                    DriftOutcome::Drift => {
                        format!("{} drifted from staged copy", pair.category)
                    }
                    DriftOutcome::MissingSource => {
                        format!("live {} is missing", pair.category)
                    }
                    DriftOutcome::MissingReference => {
                        format!("no staged copy for {} yet", pair.category)
                    }
                };
                CheckResult::new(&pair.label, outcome.severity(), message).with_detail(vec![
                    format!("live:   {}", pair.source_path.display()),
                    format!("staged: {}", pair.reference_path.display()),
                ])
            }
            Err(e) => CheckResult::error(&pair.label, format!("comparison failed: {e}")),
        }
    }

    fn sweep_golden(&self) -> CheckResult {
        const NAME: &str = "Golden tree sweep";

        if !self.golden_root.is_dir() {
            // Backup medium detached — expected, not a security incident.
            return CheckResult::warning(
                NAME,
                format!(
                    "tier 2 skipped: golden root {} not reachable",
                    self.golden_root.display()
                ),
            );
        }

        match compare_trees(&self.working_root, &self.golden_root, &self.exclude) {
            Ok(DriftOutcome::Match) => {
                CheckResult::info(NAME, "staged tree matches golden backup")
            }
            Ok(_) => CheckResult::warning(NAME, "staged tree differs from golden backup"),
            Err(e) => CheckResult::error(NAME, format!("tree comparison failed: {e}")),
        }
    }
}
