//! # bbp-pi Library
//!
//! Arbitrary-precision approximation of pi from the series
//!
//! ```text
//! pi = sum_k (-1)^k / 4^k * ( 2/(4k+1) + 2/(4k+2) + 1/(4k+3) )
//! ```
//!
//! summed by a fixed pool of worker threads.
//!
//! ## Modules
//! - `config`: CLI argument parsing and validation
//! - `error`: Error types and result aliases
//! - `io`: Fixed-point rendering of the result
//! - `model`: Precision, shared constants, term evaluation, result type
//! - `pipelines`: Generator, worker pool, accumulator and their wiring
//! - `utils`: Telemetry and threading helpers
//!
//! ## Example
//! ```no_run
//! use bbp_pi::{compute_pi, PiSettings, Precision};
//!
//! let settings = PiSettings::default().with_precision(Precision::new(128)?);
//! let pi = compute_pi(1000, &settings)?;
//! println!("{}", bbp_pi::io::to_fixed(pi.value(), 30));
//! # Ok::<(), bbp_pi::PiError>(())
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PiError, Result};
pub use model::{Accuracy, PiApproximation, PowerMode, Precision, TermCalculator};
pub use pipelines::{compute_pi, BbpPipeline, PiSettings, SummationOrder};
