// SPDX-License-Identifier: MIT
//! Boot-class probe adapters.
//!
//! Each probe wraps one external fact-gathering operation and normalizes its
//! outcome into a [`CheckResult`](crate::check::CheckResult). The decision
//! logic is kept in pure functions next to each probe so it can be tested
//! without the external tool.

pub mod backup;
pub mod baseline;
pub mod disk;
pub mod mount;
pub mod pool;
pub mod service;

pub use backup::BackupFreshnessCheck;
pub use baseline::BaselineCheck;
pub use disk::DiskHealthCheck;
pub use mount::MountCheck;
pub use pool::PoolIntegrityCheck;
pub use service::ServiceActiveCheck;

use crate::check::CheckRunner;
use crate::config::BootConfig;
use std::time::Duration;

/// Build the boot-class runner from configuration, in a fixed declaration
/// order: disks, mounts, pool, baselines, services, backup.
pub fn boot_runner(config: &BootConfig, timeout: Duration) -> CheckRunner {
    let mut runner = CheckRunner::new().with_timeout(timeout);

    for device in &config.disks {
        runner = runner.with_check(DiskHealthCheck::new(device));
    }
    for mount in &config.mounts {
        runner = runner.with_check(MountCheck::new(&mount.path, mount.writable));
    }
    if let Some(pool) = &config.pool {
        runner = runner.with_check(PoolIntegrityCheck::new(
            &pool.mountpoint,
            &pool.fs_type,
            pool.expected_devices,
        ));
    }
    for baseline in &config.baselines {
        runner = runner.with_check(BaselineCheck::new(
            &baseline.label,
            &baseline.live,
            &baseline.template,
        ));
    }
    for unit in &config.services {
        runner = runner.with_check(ServiceActiveCheck::new(unit));
    }
    if let Some(backup) = &config.backup {
        runner = runner.with_check(BackupFreshnessCheck::new(
            &backup.repository,
            backup.slack_days,
        ));
    }

    runner
}
