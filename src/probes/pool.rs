// SPDX-License-Identifier: MIT
//! Storage pool integrity — filesystem identity, per-device error counters,
//! and device cardinality.
//!
//! A filesystem-type mismatch is the one early return in the whole system:
//! once the identity of the pool itself is wrong, the remaining pool checks
//! are meaningless.

use crate::check::{Check, CheckResult, Severity};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Filesystem type of `mountpoint` in a `/proc/mounts`-format table.
pub fn fs_type_of(mounts_table: &str, mountpoint: &Path) -> Option<String> {
    let wanted = mountpoint.to_string_lossy();
    mounts_table.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let _device = fields.next()?;
        let mp = fields.next()?;
        let fs = fields.next()?;
        (mp == wanted).then(|| fs.to_string())
    })
}

/// Parse `btrfs device stats` output into `(counter, value)` pairs.
///
/// Lines look like `[/dev/sda1].write_io_errs   0`.
pub fn parse_device_stats(output: &str) -> Vec<(String, u64)> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let counter = fields.next()?;
            let value: u64 = fields.next()?.parse().ok()?;
            Some((counter.to_string(), value))
        })
        .collect()
}

/// Count active devices in `btrfs filesystem show` output (`devid` lines).
pub fn count_devices(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with("devid"))
        .count()
}

/// Pure verdict over the gathered pool facts. Returned as a single result so
/// one degraded pool is one failure in the tally.
pub fn evaluate_pool(
    name: &str,
    fs_type: Option<&str>,
    expected_fs: &str,
    stats: &[(String, u64)],
    device_count: usize,
    expected_devices: usize,
) -> CheckResult {
    // Identity first; a wrong filesystem type short-circuits everything else.
    match fs_type {
        None => return CheckResult::critical(name, "pool is not mounted"),
        Some(fs) if fs != expected_fs => {
            return CheckResult::critical(
                name,
                format!("filesystem type is {fs}, expected {expected_fs}"),
            );
        }
        Some(_) => {}
    }

    if device_count != expected_devices {
        return CheckResult::critical(
            name,
            format!("{device_count} active devices, expected {expected_devices}"),
        );
    }

    let errored: Vec<String> = stats
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(counter, value)| format!("{counter} = {value}"))
        .collect();
    if !errored.is_empty() {
        return CheckResult::new(
            name,
            Severity::Warning,
            "nonzero device error counters",
        )
        .with_detail(errored);
    }

    CheckResult::success(
        name,
        format!("{expected_fs} pool healthy, {device_count} devices, counters clean"),
    )
}

/// Multi-device pool integrity probe.
pub struct PoolIntegrityCheck {
    mountpoint: PathBuf,
    expected_fs: String,
    expected_devices: usize,
}

impl PoolIntegrityCheck {
    pub fn new(
        mountpoint: impl Into<PathBuf>,
        expected_fs: impl Into<String>,
        expected_devices: usize,
    ) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            expected_fs: expected_fs.into(),
            expected_devices,
        }
    }
}

#[async_trait]
impl Check for PoolIntegrityCheck {
    fn name(&self) -> String {
        format!("pool {}", self.mountpoint.display())
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        let mountpoint = self.mountpoint.clone();
        let expected_fs = self.expected_fs.clone();
        let expected_devices = self.expected_devices;

        let gathered = tokio::task::spawn_blocking(move || {
            let mounts = std::fs::read_to_string("/proc/mounts").unwrap_or_default();
            let fs_type = fs_type_of(&mounts, &mountpoint);

            let stats = Command::new("btrfs")
                .args(["device", "stats"])
                .arg(&mountpoint)
                .output()
                .map(|out| parse_device_stats(&String::from_utf8_lossy(&out.stdout)))
                .unwrap_or_default();

            let devices = Command::new("btrfs")
                .args(["filesystem", "show"])
                .arg(&mountpoint)
                .output()
                .map(|out| count_devices(&String::from_utf8_lossy(&out.stdout)))
                .unwrap_or(0);

            (fs_type, stats, devices)
        })
        .await;

        match gathered {
            Ok((fs_type, stats, devices)) => evaluate_pool(
                &name,
                fs_type.as_deref(),
                &expected_fs,
                &stats,
                devices,
                expected_devices,
            ),
            Err(e) => CheckResult::error(name, format!("probe task failed: {e}")),
        }
    }
}
