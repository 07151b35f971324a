//! # Utilities Module
//!
//! ## Role
//! Cross-cutting helpers that don't belong in the numeric model or the
//! pipeline.
//!
//! ## Sub-modules
//! - `telemetry`: Atomic progress blackboard and heartbeat thread
//! - `threading`: Pool sizing and named thread spawn/join

pub mod telemetry;
pub mod threading;
