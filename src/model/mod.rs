//! # Series Model
//!
//! Pure numeric pieces of the computation: precision, the shared constants
//! bundle, per-term evaluation and the result type.

pub mod approximation;
pub mod precision;
pub mod term;

pub use approximation::{Accuracy, PiApproximation};
pub use precision::{Constants, Precision};
pub use term::{PowerMode, TermCalculator};
