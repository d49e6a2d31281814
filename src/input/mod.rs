// src/input/mod.rs
// =============================================================================
// This module turns input files into Job records for the pool.
// =============================================================================

mod loader;

pub use loader::{load_jobs, InputError};
