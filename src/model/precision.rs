//! # Precision and Shared Constants
//!
//! Every `Float` created during one computation uses the same number of
//! significant bits. The bits and the handful of small constants the series
//! needs are built once and handed to the calculator and accumulator.

use std::fmt;

use rug::Float;

use crate::error::{PiError, Result};

/// Number of significant bits used for every high-precision value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u32);

impl Precision {
    /// Precision used when `-p` is not given.
    pub const DEFAULT_BITS: u32 = 64;

    /// Validate a bit count against the range MPFR accepts.
    pub fn new(bits: u32) -> Result<Self> {
        let min = rug::float::prec_min();
        let max = rug::float::prec_max();
        if bits < min || bits > max {
            return Err(PiError::config(format!(
                "precision must be between {} and {} bits, got {}",
                min, max, bits
            )));
        }
        Ok(Self(bits))
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// A zero at this precision.
    pub fn zero(self) -> Float {
        Float::new(self.0)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(Self::DEFAULT_BITS)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

/// Small constants shared read-only by every term evaluation.
#[derive(Debug, Clone)]
pub struct Constants {
    pub minus_one: Float,
    pub one: Float,
    pub two: Float,
    pub three: Float,
    pub four: Float,
}

impl Constants {
    pub fn new(precision: Precision) -> Self {
        let bits = precision.bits();
        Self {
            minus_one: Float::with_val(bits, -1),
            one: Float::with_val(bits, 1),
            two: Float::with_val(bits, 2),
            three: Float::with_val(bits, 3),
            four: Float::with_val(bits, 4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_bits() {
        assert!(matches!(Precision::new(0), Err(PiError::Config { .. })));
    }

    #[test]
    fn test_default_is_64_bits() {
        assert_eq!(Precision::default().bits(), 64);
        assert_eq!(Precision::new(64).unwrap(), Precision::default());
    }

    #[test]
    fn test_zero_has_requested_precision() {
        let p = Precision::new(200).unwrap();
        let z = p.zero();
        assert!(z.is_zero());
        assert_eq!(z.prec(), 200);
    }

    #[test]
    fn test_constants_are_exact() {
        let c = Constants::new(Precision::new(8).unwrap());
        assert_eq!(c.minus_one, -1);
        assert_eq!(c.one, 1);
        assert_eq!(c.two, 2);
        assert_eq!(c.three, 3);
        assert_eq!(c.four, 4);
        assert_eq!(c.four.prec(), 8);
    }
}
