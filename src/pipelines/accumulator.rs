//! Accumulator.
//!
//! Receives exactly `n` computed terms and sums them at the computation's
//! precision. With [`SummationOrder::Index`] terms are parked in a reorder
//! buffer until every lower index has been added, so the sum does not depend
//! on which worker finished first.

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use rug::float::Round;
use rug::ops::AddAssignRound;
use rug::Float;

use super::workers::ComputedTerm;
use crate::error::{PiError, Result};
use crate::model::approximation::{Accuracy, PiApproximation};
use crate::model::precision::Precision;
use crate::utils::telemetry::TelemetryBlackboard;

/// Order in which received terms are added into the sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummationOrder {
    /// Ascending index; bit-identical for any worker count.
    #[default]
    Index,
    /// As terms arrive; rounding may differ between runs.
    Arrival,
}

/// Sole owner of the running sum.
#[derive(Debug)]
pub struct Accumulator {
    sum: Float,
    accuracy: Accuracy,
    order: SummationOrder,
    pending: BTreeMap<u64, Float>,
    next_index: u64,
    received: u64,
}

impl Accumulator {
    pub fn new(precision: Precision, order: SummationOrder) -> Self {
        Self {
            sum: precision.zero(),
            accuracy: Accuracy::Exact,
            order,
            pending: BTreeMap::new(),
            next_index: 0,
            received: 0,
        }
    }

    /// Number of terms received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Take one term.
    pub fn push(&mut self, term: ComputedTerm) {
        self.received += 1;
        match self.order {
            SummationOrder::Arrival => self.add(&term.value),
            SummationOrder::Index => {
                self.pending.insert(term.index, term.value);
                while let Some(value) = self.pending.remove(&self.next_index) {
                    self.add(&value);
                    self.next_index += 1;
                }
            }
        }
    }

    fn add(&mut self, value: &Float) {
        let dir = self.sum.add_assign_round(value, Round::Nearest);
        self.accuracy = Accuracy::from(dir);
    }

    /// Block until `expected` terms have arrived, then return the sum.
    ///
    /// There is no timeout. The only way out short of `expected` terms is the
    /// channel disconnecting, which happens once every worker has exited.
    pub fn accumulate(
        mut self,
        expected: u64,
        results: &Receiver<ComputedTerm>,
        telemetry: Option<&Arc<TelemetryBlackboard>>,
    ) -> Result<PiApproximation> {
        while self.received < expected {
            let term = results.recv().map_err(|_| PiError::Starved {
                received: self.received,
                expected,
            })?;
            self.push(term);
            if let Some(bb) = telemetry {
                bb.record_summed();
            }
        }
        Ok(self.finish())
    }

    /// Close the sum over everything received.
    ///
    /// Index-ordered terms still waiting on a lower index are added in
    /// ascending order.
    pub fn finish(mut self) -> PiApproximation {
        let pending = std::mem::take(&mut self.pending);
        for value in pending.into_values() {
            self.add(&value);
        }
        PiApproximation::new(self.sum, self.accuracy, self.received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn term(index: u64, value: f64) -> ComputedTerm {
        ComputedTerm {
            index,
            value: Float::with_val(64, value),
        }
    }

    #[test]
    fn test_empty_sum_is_exact_zero() {
        let acc = Accumulator::new(Precision::new(80).unwrap(), SummationOrder::Index);
        let approx = acc.finish();
        assert!(approx.value().is_zero());
        assert_eq!(approx.accuracy(), Accuracy::Exact);
        assert_eq!(approx.precision_bits(), 80);
        assert_eq!(approx.terms(), 0);
    }

    #[test]
    fn test_index_order_reorders_out_of_order_arrivals() {
        let mut acc = Accumulator::new(Precision::default(), SummationOrder::Index);
        acc.push(term(2, 4.0));
        acc.push(term(1, 2.0));
        assert!(acc.sum.is_zero());
        acc.push(term(0, 1.0));
        assert_eq!(acc.sum, 7);
        assert!(acc.pending.is_empty());
        assert_eq!(acc.received(), 3);
    }

    #[test]
    fn test_arrival_order_adds_immediately() {
        let mut acc = Accumulator::new(Precision::default(), SummationOrder::Arrival);
        acc.push(term(5, 1.5));
        assert_eq!(acc.sum, 1.5);
    }

    #[test]
    fn test_accuracy_tracks_last_addition() {
        let mut acc = Accumulator::new(Precision::new(2).unwrap(), SummationOrder::Arrival);
        acc.push(term(0, 1.0));
        assert_eq!(acc.accuracy, Accuracy::Exact);
        // 1 + 0.25 is not representable in 2 bits and rounds down to 1.
        acc.push(term(1, 0.25));
        assert_eq!(acc.accuracy, Accuracy::Below);
    }

    #[test]
    fn test_accumulate_receives_exactly_expected() {
        let (tx, rx) = unbounded();
        for k in 0..5u64 {
            tx.send(term(k, 1.0)).unwrap();
        }
        let acc = Accumulator::new(Precision::default(), SummationOrder::Index);
        let approx = acc.accumulate(3, &rx, None).unwrap();
        assert_eq!(approx.terms(), 3);
        assert_eq!(*approx.value(), 3);
        // The remaining terms were left in the channel.
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn test_accumulate_reports_starvation() {
        let (tx, rx) = unbounded();
        tx.send(term(0, 1.0)).unwrap();
        drop(tx);
        let acc = Accumulator::new(Precision::default(), SummationOrder::Index);
        match acc.accumulate(4, &rx, None) {
            Err(PiError::Starved { received, expected }) => {
                assert_eq!(received, 1);
                assert_eq!(expected, 4);
            }
            other => panic!("unexpected {:?}", other.map(|a| a.terms())),
        }
    }
}
