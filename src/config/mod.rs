// SPDX-License-Identifier: MIT
//! Configuration — one TOML file describing the boot probes, the audit
//! catalog, the tier roots, and the log destinations.
//!
//! Every section defaults to empty/disabled, so a partial config is valid:
//! a host without a storage pool simply omits `[boot.pool]`.

use crate::drift::{ArtifactCategory, DriftPair};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BACKUP_SLACK_DAYS: i64 = 2;
const DEFAULT_POOL_FS_TYPE: &str = "btrfs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// ─── LogConfig ───────────────────────────────────────────────────────────────

/// Operator log destinations (`[log]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Primary log directory.
    pub dir: PathBuf,
    /// Optional mirror directory. Used only when present and writable;
    /// absence is never an error.
    pub mirror_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/var/log/vigild"),
            mirror_dir: None,
        }
    }
}

// ─── Boot probe sections ─────────────────────────────────────────────────────

/// One expected mount (`[[boot.mounts]]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MountConfig {
    pub path: PathBuf,
    /// Read-write mounts get a write probe; read-only mounts a presence
    /// check only.
    #[serde(default = "default_true")]
    pub writable: bool,
}

fn default_true() -> bool {
    true
}

/// Multi-device storage pool (`[boot.pool]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub mountpoint: PathBuf,
    /// Expected filesystem type. A mismatch is critical and short-circuits
    /// the remaining pool checks.
    #[serde(default = "default_pool_fs_type")]
    pub fs_type: String,
    /// Expected active device cardinality.
    pub expected_devices: usize,
}

fn default_pool_fs_type() -> String {
    DEFAULT_POOL_FS_TYPE.to_string()
}

/// One baseline comparison (`[[boot.baselines]]`): a live system file
/// against its known-good template.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaselineConfig {
    pub label: String,
    pub live: PathBuf,
    pub template: PathBuf,
}

/// Backup repository freshness (`[boot.backup]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    pub repository: PathBuf,
    /// Calendar slack before a present snapshot counts as stale. Staleness
    /// is a deliberate leniency: home backup cadence tolerates a day or two
    /// by design, so this stays a `Warning` and the window stays tunable.
    #[serde(default = "default_backup_slack")]
    pub slack_days: i64,
}

fn default_backup_slack() -> i64 {
    DEFAULT_BACKUP_SLACK_DAYS
}

/// Boot-class probe inventory (`[boot]`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BootConfig {
    /// Physical devices to query for SMART health, e.g. `"/dev/sda"`.
    pub disks: Vec<String>,
    pub mounts: Vec<MountConfig>,
    pub pool: Option<PoolConfig>,
    pub baselines: Vec<BaselineConfig>,
    /// Service-manager units expected active (firewall, VPN daemon).
    pub services: Vec<String>,
    pub backup: Option<BackupConfig>,
}

// ─── Audit section ───────────────────────────────────────────────────────────

/// One audit catalog entry (`[[audit.catalog]]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub label: String,
    pub category: ArtifactCategory,
    pub source: PathBuf,
    pub reference: PathBuf,
}

impl From<CatalogEntry> for DriftPair {
    fn from(entry: CatalogEntry) -> Self {
        DriftPair {
            label: entry.label,
            category: entry.category,
            source_path: entry.source,
            reference_path: entry.reference,
        }
    }
}

/// Drift audit configuration (`[audit]`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Staged (working) configuration root — Tier 2 left side.
    pub working_root: PathBuf,
    /// Golden backup root — Tier 2 right side, may be detached.
    pub golden_root: PathBuf,
    /// Extra tier-2 exclusion globs. `*passphrase*` is always applied.
    pub exclude: Vec<String>,
    pub catalog: Vec<CatalogEntry>,
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// Full vigild configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VigildConfig {
    /// Upper bound for any single probe. External tools must never hang the
    /// whole run.
    pub probe_timeout_secs: u64,
    pub log: LogConfig,
    pub boot: BootConfig,
    pub audit: AuditConfig,
}

impl Default for VigildConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            log: LogConfig::default(),
            boot: BootConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl VigildConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The audit catalog as comparison pairs.
    pub fn catalog(&self) -> Vec<DriftPair> {
        self.audit
            .catalog
            .iter()
            .cloned()
            .map(DriftPair::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_parses_with_defaults() {
        let cfg: VigildConfig = toml::from_str(
            r#"
            [boot]
            disks = ["/dev/sda"]

            [[boot.mounts]]
            path = "/srv/data"

            [audit]
            working_root = "/etc/staging"
            golden_root = "/mnt/golden/staging"

            [[audit.catalog]]
            label = "Boot Script"
            category = "executable"
            source = "/usr/local/sbin/boot-gate.sh"
            reference = "/etc/staging/boot-gate.sh"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.probe_timeout_secs, 30);
        assert!(cfg.boot.mounts[0].writable);
        assert!(cfg.boot.pool.is_none());
        assert_eq!(cfg.audit.catalog.len(), 1);
        assert_eq!(
            cfg.audit.catalog[0].category,
            ArtifactCategory::Executable
        );
    }

    #[test]
    fn test_backup_slack_default_applies() {
        let cfg: VigildConfig = toml::from_str(
            r#"
            [boot.backup]
            repository = "/mnt/backup/repo"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.boot.backup.unwrap().slack_days, 2);
    }
}
