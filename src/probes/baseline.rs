// SPDX-License-Identifier: MIT
//! Baseline configuration check — a live system file against its known-good
//! template, using the same whitespace-normalized comparison as the audit.

use crate::check::{Check, CheckResult};
use crate::drift::{compare_files, DriftOutcome};
use async_trait::async_trait;
use std::path::PathBuf;

/// Compares one live file to a known-good template.
pub struct BaselineCheck {
    label: String,
    live: PathBuf,
    template: PathBuf,
}

impl BaselineCheck {
    pub fn new(
        label: impl Into<String>,
        live: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            label: label.into(),
            live: live.into(),
            template: template.into(),
        }
    }
}

#[async_trait]
impl Check for BaselineCheck {
    fn name(&self) -> String {
        format!("baseline {}", self.label)
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        match compare_files(&self.live, &self.template) {
            Ok(DriftOutcome::Match) => CheckResult::success(name, "matches template"),
            Ok(DriftOutcome::Drift) => CheckResult::warning(name, "differs from template")
                .with_detail(vec![
                    format!("live:     {}", self.live.display()),
                    format!("template: {}", self.template.display()),
                ]),
            // A missing template is a skip, not a boot blocker.
            Ok(DriftOutcome::MissingReference) => {
                CheckResult::warning(name, "template missing, comparison skipped")
            }
            Ok(DriftOutcome::MissingSource) => CheckResult::error(
                name,
                format!("live file missing: {}", self.live.display()),
            ),
            Err(e) => CheckResult::error(name, format!("comparison failed: {e}")),
        }
    }
}
