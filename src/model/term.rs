//! # Series Term Evaluation
//!
//! Evaluates one summand of the series
//!
//! ```text
//! term(k) = (-1)^k / 4^k * ( 2/(4k+1) + 2/(4k+2) + 1/(4k+3) )
//! ```
//!
//! Every intermediate is rounded to the calculator's precision except the
//! denominators `4k+1`, `4k+2`, `4k+3`, which are held in 64-bit floats and
//! are exact for `k < 2^62`.
//!
//! ## Accuracy
//! With [`PowerMode::Float64`] the factors `(-1)^k` and `4^k` go through
//! `f64` first. `4^k` is exact up to `k = 511` and overflows to infinity from
//! `k = 512`, after which every term is exactly zero. That caps the useful
//! result at roughly 1024 bits no matter how large `P` is.
//! [`PowerMode::Exact`] applies the scale as a binary shift instead.

use rug::Float;

use super::precision::{Constants, Precision};

/// Bits used for `4k` and the three denominators.
const INDEX_BITS: u32 = 64;

/// Bits of an `f64` significand.
const F64_BITS: u32 = 53;

/// First index whose `4^k` no longer fits in an `f64`.
pub const F64_SCALE_LIMIT: u64 = 512;

/// How `(-1)^k / 4^k` is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerMode {
    /// Through `f64::powf`, then lifted to full precision.
    #[default]
    Float64,
    /// Sign from the constants bundle, scale as an exact shift by `2k`.
    Exact,
}

/// Pure evaluator for series terms at a fixed precision.
#[derive(Debug, Clone)]
pub struct TermCalculator {
    precision: Precision,
    constants: Constants,
    powers: PowerMode,
}

impl TermCalculator {
    pub fn new(precision: Precision, powers: PowerMode) -> Self {
        Self {
            precision,
            constants: Constants::new(precision),
            powers,
        }
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    #[inline]
    pub fn powers(&self) -> PowerMode {
        self.powers
    }

    /// Evaluate `term(k)` at this calculator's precision.
    pub fn term(&self, k: u64) -> Float {
        let bits = self.precision.bits();
        let c = &self.constants;

        let four_k = Float::with_val(INDEX_BITS, k) * &c.four;
        let sign_and_scale = self.sign_and_scale(k);

        // 2 / (4k+1)
        let first = Float::with_val(bits, &c.two / &Float::with_val(INDEX_BITS, &four_k + &c.one));
        // 2 / (4k+2)
        let second = Float::with_val(bits, &c.two / &Float::with_val(INDEX_BITS, &four_k + &c.two));
        // 1 / (4k+3)
        let third = Float::with_val(bits, &c.one / &Float::with_val(INDEX_BITS, &four_k + &c.three));

        let mut paren = Float::with_val(bits, &first + &second);
        paren += &third;

        Float::with_val(bits, &sign_and_scale * &paren)
    }

    /// `(-1)^k / 4^k` at full precision.
    fn sign_and_scale(&self, k: u64) -> Float {
        let bits = self.precision.bits();
        match self.powers {
            PowerMode::Float64 => {
                let exponent = k as f64;
                let sign = Float::with_val(F64_BITS, (-1.0f64).powf(exponent));
                let scale = Float::with_val(F64_BITS, 4.0f64.powf(exponent));
                Float::with_val(bits, &sign / &scale)
            }
            PowerMode::Exact => {
                let mut value = if k % 2 == 0 {
                    self.constants.one.clone()
                } else {
                    self.constants.minus_one.clone()
                };
                // 4^k == 2^(2k); shifts past the exponent range underflow to zero
                let shift = u32::try_from(k.saturating_mul(2)).unwrap_or(u32::MAX);
                value >>= shift;
                value
            }
        }
    }
}
