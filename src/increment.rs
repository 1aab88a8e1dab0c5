//! Increment parsing and floor-to-increment quantization.
//!
//! Coinbase publishes a `base_increment` and `price_increment` for every
//! product. Order sizes and prices must be multiples of these, so values are
//! floored to the nearest legal step before an order is built.
//!
//! Only two increment forms are accepted:
//! - `"1"` (whole-unit step)
//! - power-of-ten decimals such as `"0.1"`, `"0.01"`, `"0.00000001"`
//!
//! # Example
//!
//! ```rust
//! use coinbase_brokerage_client::increment::to_increment;
//!
//! assert_eq!(to_increment("0.01", 123.47999).unwrap(), "123.47");
//! assert_eq!(to_increment("1", 3.7).unwrap(), "3");
//! assert_eq!(to_increment("0.00000001", 0.1234).unwrap(), "0.12340000");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoinbaseError;

/// Bias applied to scaled values before flooring so that products like
/// `1.23 * 100 = 122.99999999999999` land on the intended integer.
const FLOOR_EPSILON: f64 = 1e-12;

/// Largest scale a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// A parsed increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Increment {
    decimal_places: u32,
    step_units: u64,
}

impl Increment {
    /// Parse an increment string.
    ///
    /// Trailing zeros in the fractional part are ignored, so `"0.0100"` is the
    /// same increment as `"0.01"`.
    pub fn parse(increment: &str) -> Result<Self, CoinbaseError> {
        if increment.trim().is_empty() {
            return Err(CoinbaseError::InvalidIncrement(
                "expected non-empty string".to_string(),
            ));
        }

        if increment == "1" {
            return Ok(Self {
                decimal_places: 0,
                step_units: 1,
            });
        }

        if is_positive_integer(increment) {
            return Err(CoinbaseError::InvalidIncrement(format!(
                r#"integer increment must be "1" or a power-of-ten decimal, got {increment:?}"#
            )));
        }

        let fraction = increment
            .strip_prefix("0.")
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| {
                CoinbaseError::InvalidIncrement(format!(
                    "must be integer or power-of-ten decimal, got {increment:?}"
                ))
            })?;

        // After trimming, only "1", "01", "001", ... remain valid.
        let trimmed = fraction.trim_end_matches('0');
        let is_power_of_ten = trimmed
            .strip_suffix('1')
            .is_some_and(|zeros| zeros.bytes().all(|b| b == b'0'));
        if !is_power_of_ten {
            return Err(CoinbaseError::InvalidIncrement(format!(
                "only power-of-ten decimals are allowed, got {increment:?}"
            )));
        }

        Ok(Self {
            decimal_places: trimmed.len() as u32,
            step_units: 1,
        })
    }

    /// Digits after the decimal point in quantized output.
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Smallest units per step at `decimal_places` precision.
    pub fn step_units(&self) -> u64 {
        self.step_units
    }

    /// Floor `value` down to a multiple of this increment.
    ///
    /// Returns a fixed-point string with exactly [`decimal_places`] digits
    /// after the decimal point. The result never exceeds `value`.
    ///
    /// [`decimal_places`]: Increment::decimal_places
    pub fn floor(&self, value: f64) -> Result<String, CoinbaseError> {
        validate_value(value)?;

        let scale = i32::try_from(self.decimal_places)
            .map(|dp| 10f64.powi(dp))
            .unwrap_or(f64::INFINITY);
        if !scale.is_finite() {
            return Err(CoinbaseError::InvalidValue(format!(
                "increment with {} decimal places is out of range",
                self.decimal_places
            )));
        }
        let scaled = scaled_floor(value, scale)?;

        let step = i128::from(self.step_units);
        let units = (scaled / step) * step;

        let rounded = units as f64 / scale;
        Ok(format!("{:.*}", self.decimal_places as usize, rounded))
    }

    /// Floor a decimal value down to a multiple of this increment.
    ///
    /// Works in exact decimal arithmetic, so no epsilon is involved. The
    /// result carries exactly [`decimal_places`] fractional digits.
    ///
    /// [`decimal_places`]: Increment::decimal_places
    pub fn floor_decimal(&self, value: Decimal) -> Result<Decimal, CoinbaseError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CoinbaseError::InvalidValue(
                "negative values are not supported for order increments".to_string(),
            ));
        }
        if self.decimal_places > MAX_DECIMAL_SCALE {
            return Err(CoinbaseError::InvalidValue(format!(
                "increment with {} decimal places exceeds decimal precision",
                self.decimal_places
            )));
        }

        let mut floored =
            value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::ToZero);
        floored.rescale(self.decimal_places);
        Ok(floored)
    }
}

impl FromStr for Increment {
    type Err = CoinbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimal_places == 0 {
            return write!(f, "{}", self.step_units);
        }
        let zeros = "0".repeat(self.decimal_places as usize - 1);
        write!(f, "0.{zeros}{}", self.step_units)
    }
}

/// Floor `value` to a multiple of `increment`, returning a fixed-point string.
///
/// Shorthand for [`Increment::parse`] followed by [`Increment::floor`].
pub fn to_increment(increment: &str, value: f64) -> Result<String, CoinbaseError> {
    validate_value(value)?;
    Increment::parse(increment)?.floor(value)
}

fn validate_value(value: f64) -> Result<(), CoinbaseError> {
    if !value.is_finite() {
        return Err(CoinbaseError::InvalidValue(
            "expected a finite number".to_string(),
        ));
    }
    if value < 0.0 {
        return Err(CoinbaseError::InvalidValue(
            "negative values are not supported for order increments".to_string(),
        ));
    }
    Ok(())
}

fn is_positive_integer(s: &str) -> bool {
    let mut bytes = s.bytes();
    matches!(bytes.next(), Some(b'1'..=b'9')) && bytes.all(|b| b.is_ascii_digit())
}

/// Scale `value` and floor toward negative infinity with a small bias.
///
/// Fails when the scaled value does not fit in an `i128`.
fn scaled_floor(value: f64, scale: f64) -> Result<i128, CoinbaseError> {
    let n = value * scale;
    let floored = if n >= 0.0 {
        (n + FLOOR_EPSILON).floor()
    } else {
        (n - FLOOR_EPSILON).floor()
    };
    // i128::MAX as f64 rounds up to 2^127, which is itself out of range.
    if !floored.is_finite() || floored >= i128::MAX as f64 || floored < i128::MIN as f64 {
        return Err(CoinbaseError::InvalidValue(format!(
            "{value} is too large to quantize at this increment"
        )));
    }
    Ok(floored as i128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(to_increment("0.01", 123.47).unwrap(), "123.47");
        assert_eq!(to_increment("0.01", 123.47999).unwrap(), "123.47");
        assert_eq!(to_increment("1", 3.7).unwrap(), "3");
        assert_eq!(to_increment("0.00000001", 0.1234).unwrap(), "0.12340000");
    }

    #[test]
    fn test_whole_unit_increment() {
        assert_eq!(to_increment("1", 34.0).unwrap(), "34");
        assert_eq!(to_increment("1", 39.999).unwrap(), "39");
        assert_eq!(to_increment("1", 10.0).unwrap(), "10");
        assert_eq!(to_increment("1", 0.0).unwrap(), "0");
    }

    #[test]
    fn test_fixed_precision_output() {
        assert_eq!(to_increment("0.1", 1.29).unwrap(), "1.2");
        assert_eq!(to_increment("0.01", 1.0).unwrap(), "1.00");
        assert_eq!(to_increment("0.0100", 1.237).unwrap(), "1.23");
    }

    #[test]
    fn test_floating_point_noise_near_boundaries() {
        assert_eq!(to_increment("0.01", 1.23).unwrap(), "1.23");
        assert_eq!(to_increment("0.01", 0.3).unwrap(), "0.30");
        assert_eq!(to_increment("0.01", 1.229999999999).unwrap(), "1.22");
    }

    #[test]
    fn test_trailing_zeros_normalize() {
        let a = Increment::parse("0.0100").unwrap();
        let b = Increment::parse("0.01").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.decimal_places(), 2);
        assert_eq!(a.step_units(), 1);
        assert_eq!(a.to_string(), "0.01");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for raw in ["1", "0.1", "0.01", "0.00000001"] {
            let increment: Increment = raw.parse().unwrap();
            assert_eq!(increment.to_string(), raw);
        }
    }

    #[test]
    fn test_rejects_invalid_increments() {
        let invalid = [
            "", " ", "0", "-1", "+1", "2", "3", "10", "01", "00.010", "2.5", "0.05", "0.00120",
            "0.", ".1", "abc", " 0.01", "0.01 ", "0.0",
        ];
        for increment in invalid {
            let err = to_increment(increment, 1.0).unwrap_err();
            assert!(
                matches!(err, CoinbaseError::InvalidIncrement(_)),
                "{increment:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_values() {
        for value in [-1.0001, -0.11, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = to_increment("0.01", value).unwrap_err();
            assert!(matches!(err, CoinbaseError::InvalidValue(_)), "{value}");
        }
    }

    #[test]
    fn test_output_shape_and_bounds() {
        let increments = ["1", "0.1", "0.01", "0.001", "0.0001", "0.00000001"];
        let values = [0.0, 0.5, 1.0, 2.75, 19.125, 123.456, 1000.0, 54321.5];

        for raw in increments {
            let increment = Increment::parse(raw).unwrap();
            let dp = increment.decimal_places() as usize;
            for value in values {
                let out = increment.floor(value).unwrap();
                let fractional = out.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
                assert_eq!(fractional, dp, "{raw} {value} -> {out}");

                let parsed: f64 = out.parse().unwrap();
                assert!(parsed <= value, "{raw} {value} -> {out}");

                let step = 10f64.powi(-(dp as i32));
                assert!(value - parsed < step, "{raw} {value} -> {out}");
            }
        }
    }

    #[test]
    fn test_floor_is_idempotent() {
        let increments = ["1", "0.1", "0.01", "0.00000001"];
        let values = [0.3, 1.23, 3.7, 123.47999, 0.1234, 99.99];

        for raw in increments {
            for value in values {
                let once = to_increment(raw, value).unwrap();
                let twice = to_increment(raw, once.parse().unwrap()).unwrap();
                assert_eq!(once, twice, "{raw} {value}");
            }
        }
    }

    #[test]
    fn test_floor_decimal_is_exact() {
        let increment = Increment::parse("0.01").unwrap();
        let value: Decimal = "123.479999999999999".parse().unwrap();
        assert_eq!(increment.floor_decimal(value).unwrap().to_string(), "123.47");

        let increment = Increment::parse("0.00000001").unwrap();
        let value: Decimal = "0.29".parse().unwrap();
        assert_eq!(
            increment.floor_decimal(value).unwrap().to_string(),
            "0.29000000"
        );

        let increment = Increment::parse("1").unwrap();
        let value: Decimal = "3.7".parse().unwrap();
        assert_eq!(increment.floor_decimal(value).unwrap().to_string(), "3");
    }

    #[test]
    fn test_floor_decimal_rejects_negative() {
        let increment = Increment::parse("0.01").unwrap();
        let value: Decimal = "-0.5".parse().unwrap();
        assert!(matches!(
            increment.floor_decimal(value),
            Err(CoinbaseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_floor_rejects_values_beyond_integer_range() {
        assert!(matches!(
            to_increment("1", 1e40),
            Err(CoinbaseError::InvalidValue(_))
        ));
        assert!(matches!(
            to_increment("0.00000001", 1e35),
            Err(CoinbaseError::InvalidValue(_))
        ));
        assert_eq!(to_increment("1", 1e15).unwrap(), "1000000000000000");
    }

    #[test]
    fn test_floor_rejects_unrepresentable_scale() {
        let increment = format!("0.{}1", "0".repeat(400));
        let parsed = Increment::parse(&increment).unwrap();
        assert_eq!(parsed.decimal_places(), 401);
        assert!(matches!(
            to_increment(&increment, 5.0),
            Err(CoinbaseError::InvalidValue(_))
        ));
        assert!(matches!(
            parsed.floor_decimal(Decimal::ONE),
            Err(CoinbaseError::InvalidValue(_))
        ));
    }
}
