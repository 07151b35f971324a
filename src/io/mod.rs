//! # I/O Module
//!
//! Output rendering for the binary.

pub mod report;

pub use report::{to_fixed, write_report};
