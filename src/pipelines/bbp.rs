//! BBP Pipeline
//!
//! Wires the generator, the worker pool and the accumulator together:
//!
//! ```text
//! generator thread --(indices)--> W workers --(terms)--> accumulator (caller)
//! ```
//!
//! Both channels are bounded, so a slow accumulator backs up the workers and
//! a slow pool backs up the generator. Every spawned thread is joined before
//! `run` returns.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crossbeam_channel::bounded;
use tracing::{info_span, instrument};

use super::accumulator::{Accumulator, SummationOrder};
use super::generator::TermGenerator;
use super::workers::{ComputedTerm, WorkerPool};
use crate::error::Result;
use crate::model::approximation::PiApproximation;
use crate::model::precision::Precision;
use crate::model::term::{PowerMode, TermCalculator};
use crate::utils::telemetry::{Stage, TelemetryBlackboard};
use crate::utils::threading::{channel_capacity, default_worker_count, join_named, spawn_named};

/// Everything a computation needs besides the term count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiSettings {
    pub precision: Precision,
    pub workers: NonZeroUsize,
    pub powers: PowerMode,
    pub order: SummationOrder,
}

impl Default for PiSettings {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            workers: default_worker_count(),
            powers: PowerMode::default(),
            order: SummationOrder::default(),
        }
    }
}

impl PiSettings {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_powers(mut self, powers: PowerMode) -> Self {
        self.powers = powers;
        self
    }

    pub fn with_order(mut self, order: SummationOrder) -> Self {
        self.order = order;
        self
    }
}

pub struct BbpPipeline {
    settings: PiSettings,
    calculator: Arc<TermCalculator>,
    telemetry: Option<Arc<TelemetryBlackboard>>,
}

impl BbpPipeline {
    pub fn new(settings: PiSettings) -> Self {
        let calculator = Arc::new(TermCalculator::new(settings.precision, settings.powers));
        Self {
            settings,
            calculator,
            telemetry: None,
        }
    }

    /// Report progress into `telemetry` while running.
    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryBlackboard>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Sum the first `rounds` terms.
    #[instrument(name = "bbp_pipeline", skip(self), fields(precision = self.settings.precision.bits(), workers = self.settings.workers.get()))]
    pub fn run(&self, rounds: u64) -> Result<PiApproximation> {
        let capacity = channel_capacity();
        let (term_tx, term_rx) = bounded::<ComputedTerm>(capacity);

        if let Some(bb) = &self.telemetry {
            bb.set_total_terms(rounds);
            bb.set_stage(Stage::Summing);
        }

        let (pool, index_tx) = WorkerPool::spawn(
            self.settings.workers,
            capacity,
            self.calculator.clone(),
            term_tx,
            self.telemetry.clone(),
        )?;

        // A failed spawn drops the closure and with it the index sender.
        let feeder_telemetry = self.telemetry.clone();
        let feeder = match spawn_named("bbp-generator".to_string(), move || {
            TermGenerator::new(rounds).feed(index_tx, feeder_telemetry)
        }) {
            Ok(handle) => handle,
            Err(e) => {
                drop(term_rx);
                return Err(pool.abandon(e));
            }
        };

        let accumulator = Accumulator::new(self.settings.precision, self.settings.order);
        let summed = info_span!("accumulate", rounds).in_scope(|| {
            accumulator.accumulate(rounds, &term_rx, self.telemetry.as_ref())
        });
        // Unblocks any worker still trying to publish if we bailed out early.
        drop(term_rx);

        if let Some(bb) = &self.telemetry {
            bb.set_stage(Stage::Joining);
        }
        let joined = info_span!("join_threads").in_scope(|| -> Result<u64> {
            let dispatched = join_named(feeder)?;
            let computed = pool.join()?;
            tracing::debug!(dispatched, computed, "pipeline threads joined");
            Ok(computed)
        });

        // A panicked thread explains a starved accumulator, so report it first.
        joined?;
        let approx = summed?;

        if let Some(bb) = &self.telemetry {
            bb.set_stage(Stage::Complete);
        }
        Ok(approx)
    }
}

/// Sum the first `rounds` terms of the series with the given settings.
pub fn compute_pi(rounds: u64, settings: &PiSettings) -> Result<PiApproximation> {
    BbpPipeline::new(*settings).run(rounds)
}
