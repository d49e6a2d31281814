// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Load each CSV file given to `scan` (dynamic first, then static)
// 3. Run every file's jobs through the worker pool and aggregate the results
// 4. Exit with proper code (0 = all redirects match, 1 = mismatches, 2 = error)
//
// Rust concepts used:
// - async/await with #[tokio::main]: The pool runs on the tokio runtime
// - anyhow::Result and .context(): Adds the file name to any fatal error
// - Modules: Each `mod` line pulls in a file or directory under src/
// =============================================================================

mod checker;       // src/checker/ - the single no-follow redirect check
mod cli;           // src/cli.rs - command-line parsing
mod input;         // src/input/ - CSV loading
mod logging;       // src/logging.rs - tracing subscriber setup
mod pool;          // src/pool/ - worker pool dispatch
mod report;        // src/report/ - aggregation and output
#[cfg(test)]
mod test_support;  // src/test_support.rs - raw HTTP server for tests

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use checker::RedirectChecker;
use cli::{Cli, Commands};
use report::AggregateOutcome;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_level) {
        eprintln!("Warning: {:#}", e);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Options shared by every file in one `scan` invocation
#[derive(Debug)]
struct ScanOptions {
    pool_size: usize,
    json: bool,
}

// Returns:
//   Ok(0) = every redirect matched
//   Ok(1) = at least one redirect did not match
//   Err   = fatal error (bad input, no files, pool failure)
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan {
            dynamic,
            static_file,
            pool_size,
            json,
        } => {
            let files: Vec<PathBuf> = dynamic.into_iter().chain(static_file).collect();
            handle_scan(&files, ScanOptions { pool_size, json }).await
        }
    }
}

// Handles the 'scan' subcommand
async fn handle_scan(files: &[PathBuf], options: ScanOptions) -> Result<i32> {
    if files.is_empty() {
        bail!("nothing to scan: pass --dynamic and/or --static");
    }

    let checker = RedirectChecker::new().context("failed to create HTTP client")?;

    let mut all_succeeded = true;
    for file in files {
        let outcome = scan_file(&checker, file, &options).await?;
        all_succeeded &= outcome.all_succeeded;
    }

    if all_succeeded {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Loads one file, checks every row, prints the report
async fn scan_file(checker: &RedirectChecker, file: &Path, options: &ScanOptions) -> Result<AggregateOutcome> {
    let jobs = input::load_jobs(file).with_context(|| format!("cannot scan {}", file.display()))?;

    if !options.json {
        println!("🔍 Scanning {} ({} redirect(s), {} workers)\n", file.display(), jobs.len(), options.pool_size);
    }
    info!("Scanning {} with {} job(s)", file.display(), jobs.len());

    let results = pool::run_all(checker, jobs, options.pool_size)
        .await
        .with_context(|| format!("scan of {} did not complete", file.display()))?;

    let outcome = report::aggregate(&results);
    report::print_report(file, &results, &outcome, options.json)?;

    info!(
        "Finished {}: {}/{} matched",
        file.display(),
        outcome.passed,
        outcome.total
    );

    Ok(outcome)
}
