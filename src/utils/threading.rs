//! # Threading Configuration
//!
//! Sizing of the worker pool and channels, and named thread spawn/join with
//! panics mapped into [`PiError`].

use std::num::NonZeroUsize;
use std::thread::{self, JoinHandle};

use crate::error::{PiError, Result};

/// Workers spawned per available CPU when no count is given.
pub const WORKERS_PER_CPU: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

/// Parallelism reported by the OS, or one if it cannot be queried.
pub fn available_cpus() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// Default pool width: available parallelism times [`WORKERS_PER_CPU`].
pub fn default_worker_count() -> NonZeroUsize {
    available_cpus().saturating_mul(WORKERS_PER_CPU)
}

/// Capacity of the index and result channels.
pub fn channel_capacity() -> usize {
    available_cpus().get()
}

/// Spawn a named OS thread.
pub fn spawn_named<F, T>(name: String, f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(thread::Builder::new().name(name).spawn(f)?)
}

/// Join a thread spawned with [`spawn_named`], turning a panic into an error.
pub fn join_named<T>(handle: JoinHandle<T>) -> Result<T> {
    let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
    handle.join().map_err(|_| PiError::worker_panicked(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_worker_count_doubles_cpus() {
        assert_eq!(
            default_worker_count().get(),
            available_cpus().get() * WORKERS_PER_CPU.get()
        );
        assert!(channel_capacity() >= 1);
    }

    #[test]
    fn test_spawn_and_join_named() {
        let handle = spawn_named("bbp-test".to_string(), || {
            thread::current().name().map(str::to_string)
        })
        .unwrap();
        assert_eq!(join_named(handle).unwrap().as_deref(), Some("bbp-test"));
    }

    #[test]
    fn test_join_reports_panicking_thread() {
        let handle = spawn_named("bbp-doomed".to_string(), || -> u64 { panic!("boom") }).unwrap();
        match join_named(handle) {
            Err(PiError::WorkerPanicked { name }) => assert_eq!(name, "bbp-doomed"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
