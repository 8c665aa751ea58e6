// SPDX-License-Identifier: MIT
//! Integration tests for result aggregation and the exit-code contract.

use vigild::check::{aggregate, AggregatePolicy, CheckResult, ExitPolicy, Severity};

fn batch() -> Vec<CheckResult> {
    vec![
        CheckResult::success("disk /dev/sda", "SMART health passed"),
        CheckResult::info("Boot Script", "executable matches staged copy"),
        CheckResult::warning("backup /mnt/backup", "latest snapshot is stale"),
        CheckResult::error("mount /srv/data", "mounted but not writable"),
    ]
}

#[test]
fn test_no_result_dropped_or_reordered() {
    let input = batch();
    let names: Vec<String> = input.iter().map(|r| r.name.clone()).collect();

    let verdict = aggregate(input, AggregatePolicy::audit());
    assert_eq!(verdict.results.len(), 4);
    let out_names: Vec<String> = verdict.results.iter().map(|r| r.name.clone()).collect();
    assert_eq!(out_names, names);
}

#[test]
fn test_overall_is_max_severity() {
    let verdict = aggregate(batch(), AggregatePolicy::audit());
    assert_eq!(verdict.overall, Severity::Error);

    let verdict = aggregate(
        vec![CheckResult::info("a", "x"), CheckResult::critical("b", "y")],
        AggregatePolicy::audit(),
    );
    assert_eq!(verdict.overall, Severity::Critical);
}

#[test]
fn test_empty_input_is_success() {
    let verdict = aggregate(Vec::new(), AggregatePolicy::audit());
    assert_eq!(verdict.overall, Severity::Success);
    assert_eq!(verdict.results.len(), 0);
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn test_suppress_exits_zero_even_for_all_critical() {
    let results = vec![
        CheckResult::critical("a", "x"),
        CheckResult::critical("b", "y"),
        CheckResult::critical("c", "z"),
    ];
    let verdict = aggregate(results, AggregatePolicy::audit());
    assert_eq!(verdict.policy.exit, ExitPolicy::Suppress);
    assert_eq!(verdict.failure_count, 3);
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn test_propagate_exit_tracks_failures() {
    let clean = aggregate(
        vec![CheckResult::success("a", "x"), CheckResult::info("b", "y")],
        AggregatePolicy::boot(),
    );
    assert_eq!(clean.exit_code(), 0);

    let failing = aggregate(vec![CheckResult::error("a", "x")], AggregatePolicy::boot());
    assert_eq!(failing.failure_count, 1);
    assert_eq!(failing.exit_code(), 1);
}

#[test]
fn test_verdict_serializes_for_json_output() {
    let verdict = aggregate(batch(), AggregatePolicy::boot());
    let value = serde_json::to_value(&verdict).unwrap();

    assert_eq!(value["failure_count"], 2);
    assert_eq!(value["overall"], "error");
    assert_eq!(value["policy"]["exit"], "propagate");
    assert_eq!(value["results"].as_array().unwrap().len(), 4);
    assert_eq!(value["results"][0]["name"], "disk /dev/sda");
}

#[test]
fn test_boot_counts_warning_as_failure_audit_does_not() {
    let results = vec![CheckResult::warning("disk /dev/sdb", "SMART degraded")];

    let boot = aggregate(results.clone(), AggregatePolicy::boot());
    assert!(boot.policy.treat_warning_as_failure);
    assert_eq!(boot.failure_count, 1);
    assert_eq!(boot.exit_code(), 1);

    let audit = aggregate(results, AggregatePolicy::audit());
    assert_eq!(audit.failure_count, 0);
    assert_eq!(audit.exit_code(), 0);
}
