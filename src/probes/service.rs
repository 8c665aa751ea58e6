// SPDX-License-Identifier: MIT
//! Service-daemon status — a service-manager unit expected to be active
//! (firewall, VPN daemon). Anything but `active` gates the boot.

use crate::check::{Check, CheckResult};
use async_trait::async_trait;
use std::process::Command;

/// `systemctl is-active`-style probe for one unit.
pub struct ServiceActiveCheck {
    unit: String,
}

impl ServiceActiveCheck {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }
}

#[async_trait]
impl Check for ServiceActiveCheck {
    fn name(&self) -> String {
        format!("service {}", self.unit)
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        let unit = self.unit.clone();

        let output = tokio::task::spawn_blocking(move || {
            Command::new("systemctl").args(["is-active", &unit]).output()
        })
        .await;

        match output {
            Ok(Ok(out)) => {
                let state = String::from_utf8_lossy(&out.stdout).trim().to_string();
                if state == "active" {
                    CheckResult::success(name, "unit active")
                } else {
                    let state = if state.is_empty() {
                        "unknown".to_string()
                    } else {
                        state
                    };
                    CheckResult::error(name, format!("unit is {state}"))
                }
            }
            Ok(Err(e)) => CheckResult::error(name, format!("systemctl not runnable: {e}")),
            Err(e) => CheckResult::error(name, format!("probe task failed: {e}")),
        }
    }
}
