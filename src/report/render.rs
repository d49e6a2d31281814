// src/report/render.rs
// =============================================================================
// Prints a finished scan either as a human-readable table or as JSON.
//
// The table is meant for people watching a terminal; the JSON is meant for
// CI pipelines that want to post-process the results.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::aggregate::AggregateOutcome;
use crate::checker::ErrorKind;
use crate::pool::JobResult;

// One row of the JSON report
#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    source: &'a str,
    target: &'a str,
    expected_status: u16,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    file: String,
    all_succeeded: bool,
    total: usize,
    passed: usize,
    results: Vec<ReportEntry<'a>>,
}

/// Prints the report for one scanned file to stdout.
pub fn print_report(file: &Path, results: &[JobResult], outcome: &AggregateOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(file, results, outcome)?);
    } else {
        print!("{}", Table::new(results, outcome));
    }
    Ok(())
}

pub fn render_json(file: &Path, results: &[JobResult], outcome: &AggregateOutcome) -> Result<String> {
    let report = ScanReport {
        file: file.display().to_string(),
        all_succeeded: outcome.all_succeeded,
        total: outcome.total,
        passed: outcome.passed,
        results: results
            .iter()
            .map(|r| ReportEntry {
                source: &r.job.source,
                target: &r.job.target,
                expected_status: r.job.expected_status,
                matched: r.is_ok(),
                kind: r.outcome.error_kind(),
                error: r.outcome.error().map(|e| e.to_string()),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// The human-readable table: one row per result, then a summary
pub struct Table<'a> {
    results: &'a [JobResult],
    outcome: &'a AggregateOutcome,
}

impl<'a> Table<'a> {
    pub fn new(results: &'a [JobResult], outcome: &'a AggregateOutcome) -> Self {
        Self { results, outcome }
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print table header
        writeln!(f, "{:<50} {:<50} {:<10} {}", "SOURCE", "TARGET", "STATUS", "MESSAGE")?;
        writeln!(f, "{}", "=".repeat(125))?;

        // Print each result; a matched row just repeats the expected status
        for result in self.results {
            let status = if result.is_ok() { "✅ OK" } else { "❌ FAIL" };
            let message = result
                .outcome
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("HTTP {}", result.job.expected_status));

            writeln!(
                f,
                "{:<50} {:<50} {:<10} {}",
                truncate(&result.job.source, 50),
                truncate(&result.job.target, 50),
                status,
                message
            )?;
        }

        // Print summary
        writeln!(f)?;
        writeln!(f, "📊 Summary:")?;
        writeln!(f, "   ✅ Matched: {}", self.outcome.passed)?;
        writeln!(f, "   ❌ Failed: {}", self.outcome.failures.len())?;
        writeln!(f, "   📋 Total: {}", self.outcome.total)
    }
}

// Truncate long URLs for display, on a char boundary
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
