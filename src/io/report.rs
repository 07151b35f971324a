//! # Result Report
//!
//! Renders the final sum as a fixed-point decimal string and writes the
//! two-line report printed by the binary:
//!
//! ```text
//! 3.1415926536
//! prec = 64, acc = Below
//! ```
//!
//! The decimal expansion is exact: the binary value is multiplied by `10^d`
//! with enough bits that no rounding happens, and only the final conversion
//! to an integer rounds (to nearest, ties to even).

use std::io::{self, Write};

use rug::{Float, Integer};

use crate::model::approximation::PiApproximation;

/// Format `value` with exactly `digits` digits after the decimal point.
pub fn to_fixed(value: &Float, digits: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-Inf" } else { "+Inf" }.to_string();
    }

    let ten_pow = Integer::from(Integer::u_pow_u(10, digits));
    let bits = value
        .prec()
        .saturating_add(ten_pow.significant_bits())
        .min(rug::float::prec_max());
    let scaled = Float::with_val(bits, value * &ten_pow);
    let magnitude = scaled.to_integer().unwrap_or_default().abs().to_string();

    let mut out = String::with_capacity(magnitude.len() + digits as usize + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    if digits == 0 {
        out.push_str(&magnitude);
        return out;
    }

    let digits = digits as usize;
    let padded = if magnitude.len() <= digits {
        format!("{}{}", "0".repeat(digits + 1 - magnitude.len()), magnitude)
    } else {
        magnitude
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - digits);
    out.push_str(int_part);
    out.push('.');
    out.push_str(frac_part);
    out
}

/// Write the value line and the precision/accuracy line.
pub fn write_report<W: Write>(out: &mut W, approx: &PiApproximation, digits: u32) -> io::Result<()> {
    writeln!(out, "{}", to_fixed(approx.value(), digits))?;
    writeln!(
        out,
        "prec = {}, acc = {}",
        approx.precision_bits(),
        approx.accuracy()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::approximation::Accuracy;

    fn f(value: f64) -> Float {
        Float::with_val(64, value)
    }

    #[test]
    fn test_zero_digits_has_no_point() {
        assert_eq!(to_fixed(&f(3.0), 0), "3");
        assert_eq!(to_fixed(&f(41.75), 0), "42");
    }

    #[test]
    fn test_zero_is_padded() {
        assert_eq!(to_fixed(&Float::new(64), 3), "0.000");
        assert_eq!(to_fixed(&f(0.05), 4), "0.0500");
        assert_eq!(to_fixed(&f(0.001), 3), "0.001");
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(to_fixed(&f(0.5), 0), "0");
        assert_eq!(to_fixed(&f(1.5), 0), "2");
        assert_eq!(to_fixed(&f(2.5), 0), "2");
        assert_eq!(to_fixed(&f(0.125), 2), "0.12");
        assert_eq!(to_fixed(&f(0.375), 2), "0.38");
    }

    #[test]
    fn test_negative_keeps_sign() {
        assert_eq!(to_fixed(&f(-1.25), 1), "-1.2");
        assert_eq!(to_fixed(&f(-2.0), 2), "-2.00");
    }

    #[test]
    fn test_repeating_fraction() {
        let third = Float::with_val(64, 1) / 3u32;
        assert_eq!(to_fixed(&third, 5), "0.33333");
        let two_thirds = Float::with_val(64, 2) / 3u32;
        assert_eq!(to_fixed(&two_thirds, 5), "0.66667");
    }

    #[test]
    fn test_expansion_is_exact_beyond_precision() {
        // 2^-10 = 0.0009765625 exactly, even at 2 bits of precision.
        let tiny = Float::with_val(2, 0.0009765625);
        assert_eq!(to_fixed(&tiny, 12), "0.000976562500");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(to_fixed(&Float::with_val(53, f64::INFINITY), 3), "+Inf");
        assert_eq!(to_fixed(&Float::with_val(53, f64::NEG_INFINITY), 3), "-Inf");
        assert_eq!(to_fixed(&Float::with_val(53, f64::NAN), 3), "NaN");
    }

    #[test]
    fn test_write_report_lines() {
        let approx = PiApproximation::new(f(3.25), Accuracy::Below, 2);
        let mut buf = Vec::new();
        write_report(&mut buf, &approx, 3).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "3.250\nprec = 64, acc = Below\n");
    }
}
