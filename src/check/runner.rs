// SPDX-License-Identifier: MIT
//! Check runner — executes an ordered batch of checks, one result per check.
//!
//! Checks run concurrently (each in its own task) but the output sequence
//! always preserves the declared order: handles are awaited in registration
//! order, not completion order. A check that panics or exceeds the timeout
//! becomes an `Error`-level result; it never aborts the rest of the batch.

use crate::check::{Check, CheckResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Runs a batch of [`Check`]s and collects their results in declared order.
pub struct CheckRunner {
    checks: Vec<Arc<dyn Check>>,
    timeout: Option<Duration>,
}

impl CheckRunner {
    /// Create a runner with no checks registered and no timeout.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            timeout: None,
        }
    }

    /// Bound every check with a per-check timeout. A probe that exceeds it is
    /// reported as `Error`, not waited on indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a check. Checks run in registration order.
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Register a boxed check (useful when the concrete type is erased).
    pub fn with_boxed_check(mut self, check: Arc<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every registered check and return one result per check, in
    /// registration order, regardless of individual failures.
    pub async fn run_all(&self) -> Vec<CheckResult> {
        debug!("running {} checks", self.checks.len());

        let timeout = self.timeout;
        let handles: Vec<_> = self
            .checks
            .iter()
            .map(|check| {
                let check = Arc::clone(check);
                let name = check.name();
                let handle = tokio::spawn(async move {
                    match timeout {
                        Some(limit) => match tokio::time::timeout(limit, check.run()).await {
                            Ok(result) => result,
                            Err(_) => CheckResult::error(
                                check.name(),
                                format!("probe timed out after {}s", limit.as_secs()),
                            ),
                        },
                        None => check.run().await,
                    }
                });
                (name, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    // A panicking check still produces a slot in the output.
                    results.push(CheckResult::error(name, format!("check panicked: {e}")));
                }
            }
        }
        results
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}
