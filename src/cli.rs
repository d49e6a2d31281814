// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Option<PathBuf>: Both input files are optional flags
// - value_parser: A plain function that validates --pool-size
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pool::DEFAULT_POOL_SIZE;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "dns-checker",
    version,
    about = "Bulk dns redirect verifier.",
    long_about = "Verifies a batch of URLs and their respective redirect destinations. \
                  Each source URL is requested once, without following the redirect, and the \
                  status code and Location header are compared with the expected values."
)]
pub struct Cli {
    /// Logging level: 0-6, the higher the more verbose
    ///
    /// RUST_LOG takes precedence when it is set.
    #[arg(short = 'l', long, global = true, default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a batch of URLs
    ///
    /// Scans a batch of urls given CSV files with the following format:
    ///
    /// "source";"target";"status"
    /// "https://google.com";"https://www.google.com/";301
    Scan {
        /// CSV file path with dynamic urls
        #[arg(short, long)]
        dynamic: Option<PathBuf>,

        /// CSV file path with static urls
        #[arg(short = 's', long = "static")]
        static_file: Option<PathBuf>,

        /// Number of checks to run concurrently
        #[arg(long, default_value_t = DEFAULT_POOL_SIZE, value_parser = parse_pool_size)]
        pool_size: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

// A pool with no workers would "succeed" without checking anything
fn parse_pool_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("pool size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid pool size {:?}: {}", value, e)),
    }
}
