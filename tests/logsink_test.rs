// SPDX-License-Identifier: MIT
//! Integration tests for the operator log sink: line format, append order,
//! subsystem/aggregate fan-out, and mirror gating.

use std::fs;
use tempfile::TempDir;
use vigild::check::{CheckResult, Severity};
use vigild::logsink::LogSink;

#[test]
fn test_lines_land_in_subsystem_and_aggregate_streams() {
    let tmp = TempDir::new().unwrap();
    let sink = LogSink::open(tmp.path(), "boot", None).unwrap();

    sink.log(Severity::Info, "run started");
    sink.log(Severity::Error, "mount /srv/data: mounted but not writable");

    let subsystem = fs::read_to_string(tmp.path().join("boot.log")).unwrap();
    let aggregate = fs::read_to_string(tmp.path().join("vigild.log")).unwrap();

    for text in [&subsystem, &aggregate] {
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO] run started"));
        assert!(lines[1].contains("[ERROR] mount /srv/data"));
        // `[<timestamp>] [<LEVEL>] <message>` — timestamp bracket first.
        assert!(lines[0].starts_with('['));
    }
}

#[test]
fn test_record_writes_detail_lines_after_summary() {
    let tmp = TempDir::new().unwrap();
    let sink = LogSink::open(tmp.path(), "boot", None).unwrap();

    let result = CheckResult::warning("pool /srv/pool", "nonzero device error counters")
        .with_detail(vec!["[/dev/sda].read_io_errs = 3".to_string()]);
    sink.record(&result);

    let text = fs::read_to_string(tmp.path().join("boot.log")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("pool /srv/pool: nonzero device error counters"));
    assert!(lines[1].contains("read_io_errs = 3"));
}

#[test]
fn test_absent_mirror_is_never_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing_mirror = tmp.path().join("usb-not-plugged-in");

    let sink = LogSink::open(tmp.path(), "audit", Some(&missing_mirror)).unwrap();
    sink.log(Severity::Info, "audit complete");

    // Primary streams written; mirror silently skipped.
    assert!(tmp.path().join("audit.log").exists());
    assert!(!missing_mirror.exists());
    assert_eq!(sink.destination_paths().len(), 2);
}

#[test]
fn test_writable_mirror_receives_copies() {
    let tmp = TempDir::new().unwrap();
    let mirror = tmp.path().join("mirror");
    fs::create_dir_all(&mirror).unwrap();

    let sink = LogSink::open(&tmp.path().join("primary"), "audit", Some(&mirror)).unwrap();
    sink.log(Severity::Warning, "Boot Script: executable drifted from staged copy");

    assert_eq!(sink.destination_paths().len(), 4);
    let mirrored = fs::read_to_string(mirror.join("audit.log")).unwrap();
    assert!(mirrored.contains("[WARNING] Boot Script"));
    let mirrored_aggregate = fs::read_to_string(mirror.join("vigild.log")).unwrap();
    assert!(mirrored_aggregate.contains("Boot Script"));
    // The writability probe cleans up after itself.
    assert!(!mirror.join(".vigild_mirror_probe").exists());
}
