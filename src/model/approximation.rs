//! # Summation Result
//!
//! The final sum together with the rounding direction of the last addition.

use std::cmp::Ordering;
use std::fmt;

use rug::Float;

/// Direction of the rounding error of a high-precision value relative to the
/// exact result of the operation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    /// Rounded value is below the exact value
    Below,
    /// No rounding happened
    #[default]
    Exact,
    /// Rounded value is above the exact value
    Above,
}

impl Accuracy {
    pub fn as_str(self) -> &'static str {
        match self {
            Accuracy::Below => "Below",
            Accuracy::Exact => "Exact",
            Accuracy::Above => "Above",
        }
    }
}

impl From<Ordering> for Accuracy {
    /// MPFR reports the rounded value compared with the exact value.
    fn from(dir: Ordering) -> Self {
        match dir {
            Ordering::Less => Accuracy::Below,
            Ordering::Equal => Accuracy::Exact,
            Ordering::Greater => Accuracy::Above,
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approximation of pi produced by summing `terms` series terms.
#[derive(Debug, Clone)]
pub struct PiApproximation {
    value: Float,
    accuracy: Accuracy,
    terms: u64,
}

impl PiApproximation {
    pub fn new(value: Float, accuracy: Accuracy, terms: u64) -> Self {
        Self {
            value,
            accuracy,
            terms,
        }
    }

    pub fn value(&self) -> &Float {
        &self.value
    }

    /// Rounding direction of the last addition into the sum.
    pub fn accuracy(&self) -> Accuracy {
        self.accuracy
    }

    /// Precision of the sum in bits.
    pub fn precision_bits(&self) -> u32 {
        self.value.prec()
    }

    /// Number of terms that went into the sum.
    pub fn terms(&self) -> u64 {
        self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_from_ordering() {
        assert_eq!(Accuracy::from(Ordering::Less), Accuracy::Below);
        assert_eq!(Accuracy::from(Ordering::Equal), Accuracy::Exact);
        assert_eq!(Accuracy::from(Ordering::Greater), Accuracy::Above);
    }

    #[test]
    fn test_accuracy_display() {
        assert_eq!(Accuracy::Below.to_string(), "Below");
        assert_eq!(Accuracy::default().to_string(), "Exact");
        assert_eq!(Accuracy::Above.to_string(), "Above");
    }

    #[test]
    fn test_precision_bits_follow_value() {
        let approx = PiApproximation::new(Float::with_val(96, 3), Accuracy::Exact, 1);
        assert_eq!(approx.precision_bits(), 96);
        assert_eq!(approx.terms(), 1);
        assert_eq!(*approx.value(), 3);
    }
}
