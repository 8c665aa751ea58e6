// SPDX-License-Identifier: MIT
//! Operator log sink — append-only `[<timestamp>] [<LEVEL>] <message>` streams.
//!
//! Each run opens one sink: a per-subsystem stream plus the shared aggregate
//! stream, optionally mirrored to a secondary directory. The mirror is
//! availability-gated: it is used only when the directory is present and
//! writable, and its absence is never an error.
//!
//! A mutex per destination keeps each line atomic; lines from concurrent
//! writers never interleave mid-line. The sink is opened at run start and
//! flushed on every write, so a crashed run still leaves a readable log.

use crate::check::{CheckResult, Severity};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

/// Filename of the aggregate stream shared by every subsystem.
const AGGREGATE_LOG: &str = "vigild.log";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One append-only log file with a line-atomicity lock.
struct Destination {
    path: PathBuf,
    file: Mutex<File>,
}

impl Destination {
    fn open(path: PathBuf) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    fn write_line(&self, line: &str) {
        // Best effort: a full or failing log disk must not abort the run.
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = writeln!(file, "{line}").and_then(|()| file.flush()) {
            warn!(path = %self.path.display(), "log write failed: {e}");
        }
    }
}

/// Structured, multi-destination, append-only log sink.
pub struct LogSink {
    destinations: Vec<Destination>,
}

impl LogSink {
    /// Open the sink for one subsystem: `<log_dir>/<subsystem>.log` plus the
    /// aggregate stream, mirrored into `mirror_dir` when that directory is
    /// present and writable.
    pub fn open(
        log_dir: &Path,
        subsystem: &str,
        mirror_dir: Option<&Path>,
    ) -> Result<Self, LogError> {
        std::fs::create_dir_all(log_dir).map_err(|source| LogError::CreateDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let mut destinations = vec![
            Destination::open(log_dir.join(format!("{subsystem}.log")))?,
            Destination::open(log_dir.join(AGGREGATE_LOG))?,
        ];

        if let Some(mirror) = mirror_dir {
            if dir_writable(mirror) {
                // Mirror open errors degrade to a warning; the primary
                // streams are already open.
                for name in [format!("{subsystem}.log"), AGGREGATE_LOG.to_string()] {
                    match Destination::open(mirror.join(&name)) {
                        Ok(dest) => destinations.push(dest),
                        Err(e) => warn!("mirror destination unavailable: {e}"),
                    }
                }
            }
        }

        Ok(Self { destinations })
    }

    /// Append one formatted line to every destination.
    pub fn log(&self, level: Severity, message: &str) {
        let line = format_line(level, message);
        for dest in &self.destinations {
            dest.write_line(&line);
        }
    }

    /// Record a check result: its summary line plus every detail line.
    pub fn record(&self, result: &CheckResult) {
        self.log(result.level, &format!("{}: {}", result.name, result.message));
        for detail in &result.detail {
            self.log(result.level, &format!("  {detail}"));
        }
    }

    /// Paths of the open destinations (primary first, then mirror).
    pub fn destination_paths(&self) -> Vec<&Path> {
        self.destinations.iter().map(|d| d.path.as_path()).collect()
    }
}

fn format_line(level: Severity, message: &str) -> String {
    format!("[{}] [{}] {}", Utc::now().to_rfc3339(), level, message)
}

/// Probe whether `dir` exists and accepts writes: create a marker file and
/// remove it again on every path.
fn dir_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let probe = dir.join(".vigild_mirror_probe");
    match OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
