//! Worker pool.
//!
//! `W` named threads share one index receiver. Crossbeam channels are
//! multi-consumer, so each index is delivered to exactly one worker without
//! any locking on our side. A worker exits once the index channel is closed
//! and drained, or when the accumulator has hung up the results channel.
//!
//! The pool creates the index channel itself and hands the sender back, so a
//! failed spawn can close it and join whatever already started.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use rug::Float;

use crate::error::{PiError, Result};
use crate::model::term::TermCalculator;
use crate::utils::telemetry::TelemetryBlackboard;
use crate::utils::threading::{join_named, spawn_named};

/// A term value tagged with the index it was computed for.
#[derive(Debug, Clone)]
pub struct ComputedTerm {
    pub index: u64,
    pub value: Float,
}

/// Running pool of term workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Spawn `width` workers publishing to `results`.
    ///
    /// Returns the pool with the sending half of its bounded index channel.
    /// Dropping that sender is what tells the workers to finish. If a spawn
    /// fails, the workers already running are joined before the error is
    /// returned.
    pub fn spawn(
        width: NonZeroUsize,
        capacity: usize,
        calculator: Arc<TermCalculator>,
        results: Sender<ComputedTerm>,
        telemetry: Option<Arc<TelemetryBlackboard>>,
    ) -> Result<(Self, Sender<u64>)> {
        let (index_tx, index_rx) = bounded::<u64>(capacity);
        let mut pool = Self {
            handles: Vec::with_capacity(width.get()),
        };
        for worker_id in 0..width.get() {
            let calculator = calculator.clone();
            let indices = index_rx.clone();
            let results = results.clone();
            let telemetry = telemetry.clone();
            let spawned = spawn_named(format!("bbp-worker-{}", worker_id), move || {
                run_worker(worker_id, &calculator, indices, results, telemetry)
            });
            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    tracing::warn!(worker_id, error = %e, "worker spawn failed");
                    drop(index_tx);
                    return Err(pool.abandon(e));
                }
            }
        }
        Ok((pool, index_tx))
    }

    /// Join every worker and hand back `error`.
    ///
    /// The index sender must already be gone, otherwise the workers never
    /// see the channel close and this blocks.
    pub fn abandon(self, error: PiError) -> PiError {
        match self.join() {
            Ok(computed) => tracing::debug!(computed, "workers joined after failure"),
            Err(e) => tracing::warn!(error = %e, "worker failed while shutting down"),
        }
        error
    }

    /// Wait for every worker and return the total number of terms computed.
    ///
    /// All workers are joined even if one of them panicked; the first panic
    /// is reported.
    pub fn join(self) -> Result<u64> {
        let mut computed = 0u64;
        let mut first_err = None;
        for handle in self.handles {
            match join_named(handle) {
                Ok(n) => computed += n,
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(computed),
        }
    }
}

fn run_worker(
    worker_id: usize,
    calculator: &TermCalculator,
    indices: Receiver<u64>,
    results: Sender<ComputedTerm>,
    telemetry: Option<Arc<TelemetryBlackboard>>,
) -> u64 {
    let mut computed = 0u64;
    for index in indices.iter() {
        let value = calculator.term(index);
        computed += 1;
        if let Some(bb) = &telemetry {
            bb.record_computed();
        }
        if results.send(ComputedTerm { index, value }).is_err() {
            tracing::debug!(worker_id, index, "results channel closed");
            break;
        }
    }
    tracing::debug!(worker_id, computed, "worker exiting");
    computed
}
