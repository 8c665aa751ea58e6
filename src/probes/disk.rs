// SPDX-License-Identifier: MIT
//! Physical device health via SMART.
//!
//! A failing or unreachable device degrades to `Warning`, not `Critical`: a
//! single degraded spindle must not look identical to full data-path
//! failure. The boot-class aggregation policy still counts the warning
//! toward the failure tally.

use crate::check::{Check, CheckResult};
use async_trait::async_trait;
use std::process::Command;

/// Outcome of parsing `smartctl -H` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartHealth {
    Passed,
    Failed,
    Unknown,
}

/// Classify the overall-health assessment in SMART output.
pub fn parse_smart_health(output: &str) -> SmartHealth {
    for line in output.lines() {
        let line = line.to_ascii_uppercase();
        if line.contains("SELF-ASSESSMENT") || line.contains("SMART HEALTH STATUS") {
            if line.contains("PASSED") || line.contains("OK") {
                return SmartHealth::Passed;
            }
            if line.contains("FAILED") {
                return SmartHealth::Failed;
            }
        }
    }
    SmartHealth::Unknown
}

/// SMART health query for one physical device.
pub struct DiskHealthCheck {
    device: String,
}

impl DiskHealthCheck {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

#[async_trait]
impl Check for DiskHealthCheck {
    fn name(&self) -> String {
        format!("disk {}", self.device)
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        let device = self.device.clone();

        let output = tokio::task::spawn_blocking(move || {
            Command::new("smartctl").args(["-H", &device]).output()
        })
        .await;

        match output {
            Ok(Ok(out)) => {
                let text = String::from_utf8_lossy(&out.stdout).into_owned();
                match parse_smart_health(&text) {
                    SmartHealth::Passed => CheckResult::success(name, "SMART health passed"),
                    SmartHealth::Failed => CheckResult::warning(name, "SMART health FAILED")
                        .with_detail(text.lines().map(str::to_string).collect()),
                    SmartHealth::Unknown => CheckResult::warning(
                        name,
                        "device unreachable or SMART assessment missing",
                    )
                    .with_detail(text.lines().map(str::to_string).collect()),
                }
            }
            Ok(Err(e)) => CheckResult::warning(name, format!("smartctl not runnable: {e}")),
            Err(e) => CheckResult::error(name, format!("probe task failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_smart_passed() {
        let out = "SMART overall-health self-assessment test result: PASSED\n";
        assert_eq!(parse_smart_health(out), SmartHealth::Passed);
    }

    #[test]
    fn test_parse_smart_failed() {
        let out = "SMART overall-health self-assessment test result: FAILED!\n";
        assert_eq!(parse_smart_health(out), SmartHealth::Failed);
    }

    #[test]
    fn test_parse_smart_scsi_ok() {
        let out = "SMART Health Status: OK\n";
        assert_eq!(parse_smart_health(out), SmartHealth::Passed);
    }

    #[test]
    fn test_parse_smart_unknown() {
        assert_eq!(parse_smart_health("garbage"), SmartHealth::Unknown);
        assert_eq!(parse_smart_health(""), SmartHealth::Unknown);
    }
}
