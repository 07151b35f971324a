//! # Pipelines
//!
//! Concurrent orchestration of the series summation: index generation,
//! the worker pool, and the accumulator, tied together by [`BbpPipeline`].

pub mod accumulator;
pub mod bbp;
pub mod generator;
pub mod workers;

pub use accumulator::{Accumulator, SummationOrder};
pub use bbp::{compute_pi, BbpPipeline, PiSettings};
pub use generator::TermGenerator;
pub use workers::{ComputedTerm, WorkerPool};
