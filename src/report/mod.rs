// src/report/mod.rs
// =============================================================================
// Turns the pool's results into a verdict and a printed report.
//
// - aggregate: pass/fail reduction and the failure log
// - render: table / JSON output
// =============================================================================

mod aggregate;
mod render;

pub use aggregate::{aggregate, AggregateOutcome};
pub use render::print_report;
