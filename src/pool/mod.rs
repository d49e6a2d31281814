// src/pool/mod.rs
// =============================================================================
// This module fans a batch of redirect checks out to a fixed-size pool of
// workers and collects the results.
//
// - job: The Job / JobResult records that travel through the channels
// - worker: The dispatcher and worker loop
// =============================================================================

mod job;
mod worker;

pub use job::{Job, JobResult};
pub use worker::{run_all, PoolError};

/// Number of workers used when `--pool-size` is not given.
pub const DEFAULT_POOL_SIZE: usize = 4;
