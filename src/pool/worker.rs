// src/pool/worker.rs
// =============================================================================
// Runs a batch of jobs through a fixed number of workers.
//
// How it works:
// 1. A bounded job channel (capacity = pool size) is created
// 2. Exactly `pool_size` worker tasks are spawned; each one takes a job,
//    runs the check, sends the result, and repeats
// 3. The dispatcher feeds every job into the channel in input order, then
//    drops its sender so the workers see the channel close once it is drained
// 4. All worker handles are joined, then the result channel is closed and
//    drained into a Vec
//
// Backpressure: when every worker is busy and the channel is full, the
// dispatcher waits on `send`. The result channel is sized to hold every
// result, so workers never wait on it.
//
// Results come back in completion order, not input order.
//
// Rust concepts:
// - tokio::spawn: Each worker is its own task, so checks run in parallel
// - mpsc channels: Jobs flow in on one channel and results flow out on another
// - Arc<Mutex<T>>: Lets several tasks own the one job receiver
// - Dropping a Sender: Closing a channel is just dropping its last sender
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use super::job::{Job, JobResult};
use crate::checker::RedirectChecker;

/// The pool could not deliver one result per job.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker task failed: {0}")]
    Worker(#[from] JoinError),
}

// All workers pull from the same receiver; the mutex makes sure each job is
// taken by exactly one of them.
//
// An mpsc Receiver has a single owner, so it cannot be cloned like a Sender.
// Arc gives every worker a handle to it, and tokio's Mutex (not std's) can be
// held across the `.await` on `recv()` without blocking the runtime thread.
type SharedJobs = Arc<Mutex<mpsc::Receiver<Job>>>;

/// Checks every job using `pool_size` concurrent workers and returns one
/// result per job, in no particular order.
///
/// Returns immediately with no results when `pool_size` is zero or there is
/// nothing to do.
pub async fn run_all(
    checker: &RedirectChecker,
    jobs: Vec<Job>,
    pool_size: usize,
) -> Result<Vec<JobResult>, PoolError> {
    if pool_size == 0 || jobs.is_empty() {
        return Ok(Vec::new());
    }

    let total = jobs.len();

    // Capacity = pool size: at most one queued job per worker
    let (job_tx, job_rx) = mpsc::channel::<Job>(pool_size);
    let (result_tx, mut result_rx) = mpsc::channel::<JobResult>(total);
    let job_rx: SharedJobs = Arc::new(Mutex::new(job_rx));

    let workers: Vec<JoinHandle<()>> = (0..pool_size)
        .map(|id| {
            // Each task needs its own handles ('static futures cannot borrow)
            let checker = checker.clone();
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            tokio::spawn(worker_loop(id, checker, jobs, results))
        })
        .collect();

    info!("Started {} workers for {} job(s)", pool_size, total);

    for job in jobs {
        info!("Enqueueing: {}", job);
        // Only fails when every worker is gone, which the join below reports
        if job_tx.send(job).await.is_err() {
            break;
        }
    }
    // Last job sender gone: workers get `None` once the channel is drained
    drop(job_tx);

    // A panicked worker shows up here as a JoinError
    for joined in join_all(workers).await {
        joined?;
    }
    // Our own result sender must go too, or `recv()` below never returns None
    drop(result_tx);

    let mut results = Vec::with_capacity(total);
    while let Some(result) = result_rx.recv().await {
        results.push(result);
    }

    Ok(results)
}

async fn worker_loop(
    id: usize,
    checker: RedirectChecker,
    jobs: SharedJobs,
    results: mpsc::Sender<JobResult>,
) {
    debug!("Worker {} started", id);

    loop {
        // The lock guard is a temporary, dropped at the end of this statement,
        // so other workers can take the next job while this one is checking.
        let next = jobs.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        debug!("Worker {} checking {}", id, job);
        let result = job.execute(&checker).await;

        // Only fails if the dispatcher is gone; nobody is left to report to
        if results.send(result).await.is_err() {
            break;
        }
    }

    debug!("Worker {} finished", id);
}
