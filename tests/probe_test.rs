// SPDX-License-Identifier: MIT
//! Integration tests for the filesystem-backed probes: mount write probe,
//! baseline comparison, and backup freshness.

use std::fs;
use tempfile::TempDir;
use vigild::check::{aggregate, AggregatePolicy, Check, Severity};
use vigild::probes::{pool, BackupFreshnessCheck, BaselineCheck, MountCheck};

/// Helper: write a `/proc/mounts`-format fixture table listing `mountpoint`.
fn fixture_table(dir: &std::path::Path, mountpoint: &std::path::Path) -> std::path::PathBuf {
    let table = dir.join("mounts");
    fs::write(
        &table,
        format!("/dev/sdb1 {} btrfs rw,noatime 0 0\n", mountpoint.display()),
    )
    .unwrap();
    table
}

#[tokio::test]
async fn test_mount_write_probe_leaves_no_marker() {
    let tmp = TempDir::new().unwrap();
    let tables = TempDir::new().unwrap();
    let table = fixture_table(tables.path(), tmp.path());

    let result = MountCheck::new(tmp.path(), true)
        .with_mounts_source(&table)
        .run()
        .await;
    assert_eq!(result.level, Severity::Success);

    // The probe marker must be gone after the check completes.
    let leftovers: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert!(
        leftovers.is_empty(),
        "probe marker left behind: {leftovers:?}"
    );
}

#[tokio::test]
async fn test_existing_directory_without_mount_entry_is_error() {
    // The mountpoint directory exists (it always does on a real host) but
    // the volume is not in the mount table: the gate must refuse, not write
    // the probe into the underlying filesystem.
    let tmp = TempDir::new().unwrap();
    let tables = TempDir::new().unwrap();
    let table = tables.path().join("mounts");
    fs::write(&table, "/dev/sda1 / ext4 rw,relatime 0 0\n").unwrap();

    let result = MountCheck::new(tmp.path(), true)
        .with_mounts_source(&table)
        .run()
        .await;
    assert_eq!(result.level, Severity::Error);
    assert!(result.message.contains("not mounted"));

    // No write probe ran against the unmounted path.
    let leftovers: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_unreadable_mount_table_falls_back_to_directory_check() {
    let tmp = TempDir::new().unwrap();

    let result = MountCheck::new(tmp.path(), true)
        .with_mounts_source(tmp.path().join("no-such-table"))
        .run()
        .await;
    assert_eq!(result.level, Severity::Success);
}

#[tokio::test]
async fn test_read_only_mount_gets_presence_check_only() {
    let tmp = TempDir::new().unwrap();
    let tables = TempDir::new().unwrap();
    let table = fixture_table(tables.path(), tmp.path());

    let result = MountCheck::new(tmp.path(), false)
        .with_mounts_source(&table)
        .run()
        .await;
    assert_eq!(result.level, Severity::Success);
    assert!(result.message.contains("read-only"));
}

#[tokio::test]
async fn test_baseline_drift_is_warning() {
    let tmp = TempDir::new().unwrap();
    let live = tmp.path().join("sshd_config");
    let template = tmp.path().join("sshd_config.golden");
    fs::write(&live, "PermitRootLogin yes\n").unwrap();
    fs::write(&template, "PermitRootLogin no\n").unwrap();

    let result = BaselineCheck::new("sshd", &live, &template).run().await;
    assert_eq!(result.level, Severity::Warning);
    assert!(result.message.contains("differs"));
}

#[tokio::test]
async fn test_baseline_missing_template_skips_with_warning() {
    let tmp = TempDir::new().unwrap();
    let live = tmp.path().join("sshd_config");
    fs::write(&live, "PermitRootLogin no\n").unwrap();

    let result = BaselineCheck::new("sshd", &live, tmp.path().join("absent"))
        .run()
        .await;
    assert_eq!(result.level, Severity::Warning);
    assert!(result.message.contains("skipped"));
}

#[tokio::test]
async fn test_backup_unreachable_repository_is_error() {
    let tmp = TempDir::new().unwrap();
    let result = BackupFreshnessCheck::new(tmp.path().join("detached"), 2)
        .run()
        .await;
    assert_eq!(result.level, Severity::Error);
    assert!(result.message.contains("unreachable"));
}

#[tokio::test]
async fn test_backup_fresh_snapshot_passes() {
    let tmp = TempDir::new().unwrap();
    // A just-written entry is inside any sane slack window.
    fs::write(tmp.path().join("snapshot-2026-08-29"), "archive").unwrap();

    let result = BackupFreshnessCheck::new(tmp.path(), 2).run().await;
    assert_eq!(result.level, Severity::Success);
}

#[test]
fn test_degraded_pool_gates_the_boot() {
    // Two devices expected, one active: critical, and under the boot policy
    // that single result flips the exit code.
    let result = pool::evaluate_pool("pool /srv/pool", Some("btrfs"), "btrfs", &[], 1, 2);
    assert_eq!(result.level, Severity::Critical);

    let verdict = aggregate(vec![result], AggregatePolicy::boot());
    assert_eq!(verdict.failure_count, 1);
    assert_eq!(verdict.exit_code(), 1);
}

#[tokio::test]
async fn test_backup_empty_repository_is_warning() {
    let tmp = TempDir::new().unwrap();

    let result = BackupFreshnessCheck::new(tmp.path(), 2).run().await;
    assert_eq!(result.level, Severity::Warning);
    assert!(result.message.contains("no snapshots"));
}
