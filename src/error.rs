//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.

use thiserror::Error;

/// One-line usage shown for any malformed invocation.
pub const USAGE: &str = "bbp-pi [-p <precision>] <rounds>";

/// Main error type for pi computations
#[derive(Error, Debug)]
pub enum PiError {
    /// Missing, malformed or negative `<rounds>` argument
    #[error("Usage: {}", USAGE)]
    Usage,

    /// Configuration errors (precision out of range, zero workers)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O errors (thread spawn failures, writing the report)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generator or worker thread panicked
    #[error("Thread {name} panicked")]
    WorkerPanicked { name: String },

    /// Every producer exited before the expected number of terms arrived
    #[error("Results channel closed after {received} of {expected} terms")]
    Starved { received: u64, expected: u64 },
}

/// Type alias for Results using PiError
pub type Result<T> = std::result::Result<T, PiError>;

impl PiError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a panicked-thread error
    pub fn worker_panicked(name: impl Into<String>) -> Self {
        Self::WorkerPanicked { name: name.into() }
    }

    /// Whether this error should be reported as the bare usage line
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_display_is_one_line() {
        let err = PiError::Usage;
        let text = err.to_string();
        assert_eq!(text, "Usage: bbp-pi [-p <precision>] <rounds>");
        assert!(!text.contains('\n'));
        assert!(err.is_usage());
    }

    #[test]
    fn test_starved_display() {
        let err = PiError::Starved {
            received: 3,
            expected: 10,
        };
        assert_eq!(err.to_string(), "Results channel closed after 3 of 10 terms");
        assert!(!err.is_usage());
    }
}
