// SPDX-License-Identifier: MIT
//! Mount health — presence, and a write probe for read-write mounts.
//!
//! The write probe creates and removes a transient marker file. The marker
//! is removed on both success and failure paths; after the check completes
//! it must not exist.

use crate::check::{Check, CheckResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Marker filename used by the write probe.
const PROBE_MARKER: &str = ".vigild_probe";

/// Returns `true` when `mountpoint` appears in a mount table in
/// `/proc/mounts` format.
pub fn mount_present(mounts_table: &str, mountpoint: &Path) -> bool {
    let wanted = mountpoint.to_string_lossy();
    mounts_table
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .any(|mp| mp == wanted)
}

/// Create-and-remove write probe. The marker is removed even when the write
/// itself fails partway.
pub fn write_probe(dir: &Path) -> std::io::Result<()> {
    let marker = dir.join(PROBE_MARKER);
    let outcome = std::fs::write(&marker, b"vigild write probe\n");
    let _ = std::fs::remove_file(&marker);
    outcome
}

/// Kernel mount table consulted for presence.
const MOUNTS_TABLE: &str = "/proc/mounts";

/// Presence (and, for read-write mounts, writability) of one mountpoint.
pub struct MountCheck {
    mountpoint: PathBuf,
    writable: bool,
    mounts_source: PathBuf,
}

impl MountCheck {
    pub fn new(mountpoint: impl Into<PathBuf>, writable: bool) -> Self {
        Self {
            mountpoint: mountpoint.into(),
            writable,
            mounts_source: PathBuf::from(MOUNTS_TABLE),
        }
    }

    /// Read the mount table from an alternate location (tests use a fixture
    /// table instead of the kernel's).
    pub fn with_mounts_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.mounts_source = path.into();
        self
    }

    fn present(&self) -> bool {
        // The mountpoint directory exists whether or not the volume is
        // mounted, so a directory check alone would pass an unmounted
        // volume. Only fall back to it when the mount table is unreadable
        // (hosts without /proc).
        match std::fs::read_to_string(&self.mounts_source) {
            Ok(table) => mount_present(&table, &self.mountpoint),
            Err(_) => self.mountpoint.is_dir(),
        }
    }
}

#[async_trait]
impl Check for MountCheck {
    fn name(&self) -> String {
        format!("mount {}", self.mountpoint.display())
    }

    async fn run(&self) -> CheckResult {
        let name = self.name();
        let mountpoint = self.mountpoint.clone();
        let writable = self.writable;
        let present = self.present();

        if !present {
            return CheckResult::error(name, "not mounted");
        }
        if !writable {
            return CheckResult::success(name, "mounted (read-only, presence verified)");
        }

        let probed = tokio::task::spawn_blocking(move || write_probe(&mountpoint)).await;
        match probed {
            Ok(Ok(())) => CheckResult::success(name, "mounted and writable"),
            Ok(Err(e)) => {
                CheckResult::error(name, format!("mounted but not writable: {e}"))
            }
            Err(e) => CheckResult::error(name, format!("probe task failed: {e}")),
        }
    }
}
