// src/report/aggregate.rs
// =============================================================================
// Reduces a batch of results to a single pass/fail signal.
//
// Every result is looked at; a failure early in the batch does not hide the
// ones after it. Each failing result is logged as
//
//     source; target; error-description
// =============================================================================

use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::checker::ErrorKind;
use crate::pool::JobResult;

/// One job that did not match, in the shape it is logged and reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub source: String,
    pub target: String,
    pub kind: ErrorKind,
    pub error: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}; {}", self.source, self.target, self.error)
    }
}

/// The reduced outcome of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateOutcome {
    pub all_succeeded: bool,
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<Failure>,
}

/// Folds every result into an [`AggregateOutcome`], logging each failure.
///
/// An empty batch succeeds.
pub fn aggregate(results: &[JobResult]) -> AggregateOutcome {
    let mut failures = Vec::new();

    for result in results {
        // A non-matching outcome always carries its error
        let Some(err) = result.outcome.error() else {
            continue;
        };

        let failure = Failure {
            source: result.job.source.clone(),
            target: result.job.target.clone(),
            kind: err.kind(),
            error: err.to_string(),
        };
        error!("{}", failure);
        failures.push(failure);
    }

    AggregateOutcome {
        all_succeeded: failures.is_empty(),
        total: results.len(),
        passed: results.len() - failures.len(),
        failures,
    }
}
