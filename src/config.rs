//! # Configuration Logic
//!
//! ## Role
//! CLI argument parsing and validation.
//!
//! ## Example CLI
//! ```bash
//! bbp-pi -p 128 1000
//! bbp-pi --nthreads 4 --exact-powers -p 4096 2000
//! ```

use std::num::NonZeroUsize;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::{PiError, Result};
use crate::model::precision::Precision;
use crate::model::term::PowerMode;
use crate::pipelines::accumulator::SummationOrder;
use crate::pipelines::bbp::PiSettings;
use crate::utils::threading::default_worker_count;

/// Approximate pi by summing a BBP-type series on a pool of worker threads.
#[derive(Parser, Debug, Clone)]
#[command(name = "bbp-pi", version, about)]
pub struct Config {
    /// Bits of precision; also the number of digits printed after the point
    #[arg(short = 'p', long = "precision", default_value_t = Precision::DEFAULT_BITS)]
    pub precision: u32,

    /// Number of series terms to sum
    #[arg(allow_negative_numbers = true)]
    pub rounds: i64,

    /// Worker threads (default: available parallelism x 2)
    #[arg(long)]
    pub nthreads: Option<usize>,

    /// Evaluate (-1)^k / 4^k exactly instead of through f64
    #[arg(long)]
    pub exact_powers: bool,

    /// Add terms as they arrive instead of in index order
    #[arg(long)]
    pub arrival_order: bool,

    /// Print periodic progress lines to stderr
    #[arg(long)]
    pub progress: bool,

    /// Enable span timing output to stderr
    #[arg(long)]
    pub profile: bool,
}

impl Config {
    /// Parse the process arguments and validate them.
    pub fn parse_and_validate() -> Result<Self> {
        Self::from_args(std::env::args_os())
    }

    /// Parse and validate an explicit argument list (first item is the program name).
    ///
    /// `--help` and `--version` print and exit the process, as clap does.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = match Self::try_parse_from(args) {
            Ok(config) => config,
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
                _ => return Err(PiError::Usage),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.rounds < 0 {
            return Err(PiError::Usage);
        }
        Precision::new(self.precision)?;
        if self.nthreads == Some(0) {
            return Err(PiError::config("--nthreads must be at least 1"));
        }
        Ok(())
    }

    /// Number of terms to sum.
    pub fn rounds(&self) -> u64 {
        self.rounds.max(0) as u64
    }

    /// Digits printed after the decimal point.
    pub fn digits(&self) -> u32 {
        self.precision
    }

    pub fn nthreads(&self) -> NonZeroUsize {
        self.nthreads
            .and_then(NonZeroUsize::new)
            .unwrap_or_else(default_worker_count)
    }

    /// Core settings for the pipeline.
    pub fn settings(&self) -> Result<PiSettings> {
        Ok(PiSettings {
            precision: Precision::new(self.precision)?,
            workers: self.nthreads(),
            powers: if self.exact_powers {
                PowerMode::Exact
            } else {
                PowerMode::Float64
            },
            order: if self.arrival_order {
                SummationOrder::Arrival
            } else {
                SummationOrder::Index
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        Config::from_args(std::iter::once("bbp-pi").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["1000"]).unwrap();
        assert_eq!(config.rounds(), 1000);
        assert_eq!(config.precision, 64);
        assert_eq!(config.digits(), 64);
        assert_eq!(config.nthreads(), default_worker_count());

        let settings = config.settings().unwrap();
        assert_eq!(settings.precision.bits(), 64);
        assert_eq!(settings.powers, PowerMode::Float64);
        assert_eq!(settings.order, SummationOrder::Index);
    }

    #[test]
    fn test_precision_flag() {
        let config = parse(&["-p", "10", "5"]).unwrap();
        assert_eq!(config.precision, 10);
        assert_eq!(config.rounds(), 5);
    }

    #[test]
    fn test_optional_switches() {
        let config = parse(&[
            "--nthreads",
            "3",
            "--exact-powers",
            "--arrival-order",
            "--progress",
            "7",
        ])
        .unwrap();
        assert!(config.progress);
        let settings = config.settings().unwrap();
        assert_eq!(settings.workers.get(), 3);
        assert_eq!(settings.powers, PowerMode::Exact);
        assert_eq!(settings.order, SummationOrder::Arrival);
    }

    #[test]
    fn test_zero_rounds_accepted() {
        assert_eq!(parse(&["0"]).unwrap().rounds(), 0);
    }

    #[test]
    fn test_missing_rounds_is_usage_error() {
        assert!(parse(&[]).unwrap_err().is_usage());
        assert!(parse(&["-p", "32"]).unwrap_err().is_usage());
    }

    #[test]
    fn test_malformed_rounds_is_usage_error() {
        assert!(parse(&["pi"]).unwrap_err().is_usage());
        assert!(parse(&["1.5"]).unwrap_err().is_usage());
        assert!(parse(&["99999999999999999999"]).unwrap_err().is_usage());
    }

    #[test]
    fn test_negative_rounds_is_usage_error() {
        assert!(parse(&["-3"]).unwrap_err().is_usage());
    }

    #[test]
    fn test_invalid_precision_and_threads() {
        assert!(matches!(parse(&["-p", "0", "5"]), Err(PiError::Config { .. })));
        assert!(matches!(
            parse(&["--nthreads", "0", "5"]),
            Err(PiError::Config { .. })
        ));
    }
}
