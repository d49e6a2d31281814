// src/pool/job.rs
// =============================================================================
// The unit of work handed to a worker, and what the worker hands back.
// =============================================================================

use std::fmt;

use crate::checker::{CheckOutcome, RedirectChecker};

// One source/target/expected-status triple to verify
//
// Jobs are built once by the input loader and never changed afterwards;
// each one moves through the job channel to exactly one worker.
#[derive(Debug, PartialEq, Eq)]
pub struct Job {
    pub source: String,
    pub target: String,
    pub expected_status: u16,
}

impl Job {
    pub fn new(source: impl Into<String>, target: impl Into<String>, expected_status: u16) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            expected_status,
        }
    }

    /// Runs the check for this job and packages the outcome with it.
    pub async fn execute(self, checker: &RedirectChecker) -> JobResult {
        let outcome = checker
            .check(&self.source, &self.target, self.expected_status)
            .await;

        JobResult { job: self, outcome }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {} ({})", self.source, self.target, self.expected_status)
    }
}

/// A finished job: the original record plus how the check went.
#[derive(Debug)]
pub struct JobResult {
    pub job: Job,
    pub outcome: CheckOutcome,
}

impl JobResult {
    /// Helper method to check if the redirect matched
    pub fn is_ok(&self) -> bool {
        self.outcome.matched()
    }
}
