//! Term index generator.
//!
//! Produces `0, 1, ..., n-1` lazily. The feeder variant pushes the indices
//! into the bounded index channel and closes it by dropping the sender, which
//! is how workers learn the sequence is exhausted.

use std::ops::Range;
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::utils::telemetry::TelemetryBlackboard;

/// Lazy, finite sequence of term indices. Restart by constructing a new one.
#[derive(Debug, Clone)]
pub struct TermGenerator {
    indices: Range<u64>,
}

impl TermGenerator {
    pub fn new(n: u64) -> Self {
        Self { indices: 0..n }
    }

    /// Send every remaining index, then close the channel.
    ///
    /// Returns the number of indices sent. Stops early if every receiver has
    /// been dropped.
    pub fn feed(self, sender: Sender<u64>, telemetry: Option<Arc<TelemetryBlackboard>>) -> u64 {
        let mut sent = 0u64;
        for k in self {
            if sender.send(k).is_err() {
                tracing::debug!(sent, "index channel closed by workers");
                break;
            }
            sent += 1;
            if let Some(bb) = &telemetry {
                bb.record_dispatched();
            }
        }
        sent
    }
}

impl Iterator for TermGenerator {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.indices.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}
