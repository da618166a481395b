//! Verification worker pool
//!
//! A fixed number of long-lived tokio tasks pull candidates from one shared
//! queue, probe them, and send every outcome down a single channel:
//!
//! ```text
//! candidates → [job queue] → worker 0..N → [outcome channel] → aggregator
//! ```
//!
//! The job queue is filled up front and its sender dropped, so workers exit
//! once it runs dry. Each worker owns a clone of the outcome sender; the
//! outcome channel therefore closes exactly when the last worker has exited.
//! The outcome channel is unbounded so workers never wait on the aggregator.

use crate::census::probe::Probe;
use crate::state::{Instance, Outcome};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

type JobQueue = Arc<Mutex<mpsc::UnboundedReceiver<Instance>>>;

/// Handle to a running pool
pub struct PoolRun {
    /// Outcomes, one per submitted candidate; closes when all workers are done
    pub outcomes: mpsc::UnboundedReceiver<Outcome>,

    workers: Vec<JoinHandle<usize>>,
}

impl PoolRun {
    /// Number of workers actually spawned
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker task to exit
    ///
    /// Call after draining `outcomes`. Returns the number of candidates each
    /// worker probed; a worker that panicked is logged and counted as zero.
    pub async fn join(self) -> Vec<usize> {
        let mut probed = Vec::with_capacity(self.workers.len());
        for (id, handle) in self.workers.into_iter().enumerate() {
            match handle.await {
                Ok(count) => probed.push(count),
                Err(e) => {
                    tracing::error!("Worker {} did not finish cleanly: {}", id, e);
                    probed.push(0);
                }
            }
        }
        probed
    }
}

/// Starts the pool over a list of candidates
///
/// The worker count is clamped to the number of candidates; an empty list
/// spawns nothing and yields an already-closed outcome channel.
///
/// Must be called from within a tokio runtime.
pub fn spawn_pool<P: Probe>(prober: Arc<P>, candidates: Vec<Instance>, workers: usize) -> PoolRun {
    let worker_count = workers.max(1).min(candidates.len());

    let (job_tx, job_rx) = mpsc::unbounded_channel();
    for instance in candidates {
        // Receiver is alive in this scope
        let _ = job_tx.send(instance);
    }
    drop(job_tx);

    let jobs: JobQueue = Arc::new(Mutex::new(job_rx));
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

    let workers = (0..worker_count)
        .map(|id| {
            tokio::spawn(worker(
                id,
                Arc::clone(&prober),
                Arc::clone(&jobs),
                outcome_tx.clone(),
            ))
        })
        .collect();

    // Only workers hold senders from here on
    drop(outcome_tx);

    PoolRun {
        outcomes: outcome_rx,
        workers,
    }
}

async fn worker<P: Probe>(
    id: usize,
    prober: Arc<P>,
    jobs: JobQueue,
    outcomes: mpsc::UnboundedSender<Outcome>,
) -> usize {
    let mut probed = 0;

    loop {
        // Lock is released at the end of this statement, before probing
        let next = jobs.lock().await.recv().await;
        let Some(instance) = next else {
            break;
        };

        let outcome = prober.probe(instance).await;
        probed += 1;

        if outcomes.send(outcome).is_err() {
            tracing::warn!("Worker {}: outcome receiver dropped, stopping", id);
            break;
        }
    }

    tracing::trace!("Worker {} finished after {} probes", id, probed);
    probed
}
