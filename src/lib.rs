// SPDX-License-Identifier: MIT
//! vigild — unattended-host integrity warden.
//!
//! Two run classes, both built on the same check primitives:
//!
//! 1. **Boot gate** (`vigild boot`): runs storage, network-security and
//!    configuration probes before dependent services start. Failures
//!    propagate into the process exit code so automation never trusts a
//!    broken machine.
//!
//! 2. **Drift audit** (`vigild audit`): compares the live configuration
//!    against the staged copy (Tier 1, per-artifact catalog) and the staged
//!    tree against the immutable golden backup (Tier 2, bulk sweep). Always
//!    exits zero — drift is reported through the operator log, never through
//!    an exit code a scheduler could mistake for a crashed job.

pub mod check;
pub mod config;
pub mod drift;
pub mod logsink;
pub mod probes;

// Convenience re-exports.
pub use check::{
    aggregate, AggregatePolicy, AggregateVerdict, Check, CheckResult, CheckRunner, ExitPolicy,
    Severity,
};
pub use config::VigildConfig;
pub use drift::{ArtifactCategory, AuditEngine, DriftOutcome, DriftPair};
pub use logsink::LogSink;
