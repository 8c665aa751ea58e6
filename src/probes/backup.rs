// SPDX-License-Identifier: MIT
//! Backup repository freshness.
//!
//! An unreachable repository is an `Error` (the boot gate must notice a
//! vanished backup target); a present-but-stale snapshot is only a
//! `Warning` — home backup cadence tolerates a day or two of slack by
//! design, and the window is configuration, not a hard-coded invariant.

use crate::check::{Check, CheckResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};

/// Whether a snapshot taken at `latest` is still fresh at `now` given the
/// slack window.
pub fn is_fresh(latest: DateTime<Utc>, now: DateTime<Utc>, slack_days: i64) -> bool {
    now.signed_duration_since(latest) <= Duration::days(slack_days)
}

/// Most recent modification time among the repository's top-level entries.
fn latest_snapshot(repository: &Path) -> std::io::Result<Option<DateTime<Utc>>> {
    let mut latest: Option<DateTime<Utc>> = None;
    for entry in std::fs::read_dir(repository)? {
        let entry = entry?;
        let modified: DateTime<Utc> = entry.metadata()?.modified()?.into();
        if latest.map_or(true, |prev| modified > prev) {
            latest = Some(modified);
        }
    }
    Ok(latest)
}

/// Freshness probe over a filesystem-visible backup repository.
pub struct BackupFreshnessCheck {
    repository: PathBuf,
    slack_days: i64,
}

impl BackupFreshnessCheck {
    pub fn new(repository: impl Into<PathBuf>, slack_days: i64) -> Self {
        Self {
            repository: repository.into(),
            slack_days,
        }
    }
}

#[async_trait]
impl Check for BackupFreshnessCheck {
    fn name(&self) -> String {
        format!("backup {}", self.repository.display())
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        let repository = self.repository.clone();
        let slack_days = self.slack_days;

        if !repository.is_dir() {
            return CheckResult::error(name, "repository unreachable");
        }

        let scanned =
            tokio::task::spawn_blocking(move || latest_snapshot(&repository)).await;
        match scanned {
            Ok(Ok(Some(latest))) => {
                if is_fresh(latest, Utc::now(), slack_days) {
                    CheckResult::success(
                        name,
                        format!("latest snapshot {}", latest.to_rfc3339()),
                    )
                } else {
                    CheckResult::warning(
                        name,
                        format!(
                            "latest snapshot {} is older than {slack_days} day(s)",
                            latest.to_rfc3339()
                        ),
                    )
                }
            }
            Ok(Ok(None)) => CheckResult::warning(name, "repository contains no snapshots"),
            Ok(Err(e)) => CheckResult::error(name, format!("repository scan failed: {e}")),
            Err(e) => CheckResult::error(name, format!("probe task failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_freshness_window() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap();
        let yesterday = now - Duration::days(1);
        let last_week = now - Duration::days(7);

        assert!(is_fresh(yesterday, now, 2));
        assert!(!is_fresh(last_week, now, 2));
        // The window is tunable; a week of slack accepts a week-old snapshot.
        assert!(is_fresh(last_week, now, 7));
    }
}
