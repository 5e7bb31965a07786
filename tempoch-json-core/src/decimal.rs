// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fractional-seconds decimal codec.
//!
//! High-precision instants travel through JSON as a decimal number of
//! seconds with exactly nine fractional digits, e.g. `15.000000072`.  This
//! module converts between that form and the `(seconds, nanoseconds)` pair
//! used everywhere else in the crate.
//!
//! # Sign convention
//!
//! A pair always holds **floor** seconds and a **non-negative** nanosecond
//! part, the way [`chrono::DateTime::from_timestamp`] expects it.  The
//! decimal rendering is the true value of the pair, so `(-1, 250_000_000)`
//! renders as `-0.750000000`.  On the way back the integer part of the
//! decimal is truncated toward zero and [`split_decimal`] folds a negative
//! fraction back into the floor form.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Number of fractional digits in the decimal form.
pub const FRACTION_DIGITS: u32 = 9;

/// Render `seconds + nanoseconds / 10⁹` as `<integer>.<9 digits>`.
///
/// The fraction is always nine digits, zero padded, never trimmed or
/// rounded.
///
/// ```
/// use tempoch_json_core::decimal::to_decimal_string;
///
/// assert_eq!(to_decimal_string(15, 72), "15.000000072");
/// assert_eq!(to_decimal_string(0, 0), "0.000000000");
/// ```
///
/// # Panics
///
/// Panics if `nanoseconds` is not below [`NANOS_PER_SECOND`].
pub fn to_decimal_string(seconds: i64, nanoseconds: u32) -> String {
    assert!(nanoseconds < NANOS_PER_SECOND, "nanoseconds out of range");
    if seconds < 0 && nanoseconds > 0 {
        // floor seconds plus a positive fraction: -1 s + 0.25 s is -0.75
        let whole = (seconds + 1).unsigned_abs();
        format!("-{}.{:09}", whole, NANOS_PER_SECOND - nanoseconds)
    } else {
        format!("{seconds}.{nanoseconds:09}")
    }
}

/// The exact decimal value of `seconds + nanoseconds / 10⁹`, at scale 9.
///
/// # Panics
///
/// Panics if `nanoseconds` is not below [`NANOS_PER_SECOND`].
pub fn to_decimal(seconds: i64, nanoseconds: u32) -> Decimal {
    assert!(nanoseconds < NANOS_PER_SECOND, "nanoseconds out of range");
    let mantissa = i128::from(seconds) * i128::from(NANOS_PER_SECOND) + i128::from(nanoseconds);
    Decimal::from_i128_with_scale(mantissa, FRACTION_DIGITS)
}

/// The fractional part of `value`, in nanoseconds.
///
/// `whole_seconds` must be the integer part of `value`, either truncated
/// toward zero or floored; the result carries the sign of
/// `value - whole_seconds`.  Fractions with fewer than nine digits are
/// scaled up (`15.72` yields `720_000_000`), longer ones are truncated
/// toward zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use tempoch_json_core::decimal::extract_nanosecond_fraction;
///
/// let value: Decimal = "15.72".parse().unwrap();
/// assert_eq!(extract_nanosecond_fraction(&value, 15), 720_000_000);
/// ```
///
/// # Panics
///
/// Panics if `value - whole_seconds` is one second or more in magnitude,
/// i.e. `whole_seconds` is not the integer part of `value`.
pub fn extract_nanosecond_fraction(value: &Decimal, whole_seconds: i64) -> i32 {
    let fraction = (*value - Decimal::from(whole_seconds)) * Decimal::from(NANOS_PER_SECOND);
    fraction
        .trunc()
        .to_i32()
        .expect("whole_seconds must be the integer part of the decimal value")
}

/// Split a decimal number of seconds into floor seconds and non-negative
/// nanoseconds.
///
/// Returns `None` when the integer part does not fit an `i64`.
pub fn split_decimal(value: &Decimal) -> Option<(i64, u32)> {
    let whole = value.trunc().to_i64()?;
    let fraction = extract_nanosecond_fraction(value, whole);
    if fraction < 0 {
        let nanos = (fraction + NANOS_PER_SECOND as i32) as u32;
        Some((whole.checked_sub(1)?, nanos))
    } else {
        Some((whole, fraction as u32))
    }
}

/// Convert the text of a JSON number into a [`Decimal`].
///
/// Fractional digits beyond the ninth are dropped before the value is
/// built, since they cannot change the truncated nanosecond value.
/// Exponent notation (`1.5e3`, `5E-29`) is first rewritten in plain
/// notation, so values below one nanosecond read as zero instead of
/// overflowing the decimal scale.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let invalid = |reason: String| Error::InvalidNumber {
        input: text.to_owned(),
        reason,
    };
    let trimmed = text.trim();
    let plain = if trimmed.contains(['e', 'E']) {
        expand_exponent(trimmed).map_err(invalid)?
    } else {
        trimmed.to_owned()
    };

    let truncated = match plain.split_once('.') {
        Some((whole, fraction)) if fraction.len() > FRACTION_DIGITS as usize => {
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("fraction is not a digit sequence".to_owned()));
            }
            Some(format!("{whole}.{}", &fraction[..FRACTION_DIGITS as usize]))
        }
        _ => None,
    };
    let exact = truncated.as_deref().unwrap_or(&plain);
    Decimal::from_str_exact(exact).map_err(|e| invalid(e.to_string()))
}

// Widest integer part a Decimal can hold, plus headroom for leading zeros.
const MAX_INTEGER_DIGITS: i64 = 40;

/// Rewrite `<mantissa>e<exponent>` in plain notation, dropping every digit
/// past the ninth fractional place.
fn expand_exponent(text: &str) -> std::result::Result<String, String> {
    let (mantissa, exponent) = text
        .split_once(['e', 'E'])
        .ok_or_else(|| "missing exponent".to_owned())?;
    let exponent: i64 = exponent
        .parse()
        .map_err(|_| "exponent is not an integer".to_owned())?;
    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = format!("{int}{frac}");
    if all_digits.is_empty() || !all_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("mantissa is not a digit sequence".to_owned());
    }

    let digits = all_digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok("0".to_owned());
    }
    // position of the decimal point relative to the first significant digit
    let leading = (all_digits.len() - digits.len()) as i64;
    let point = (int.len() as i64 - leading)
        .checked_add(exponent)
        .ok_or_else(|| "exponent out of range".to_owned())?;
    if point > MAX_INTEGER_DIGITS {
        return Err("exponent out of range".to_owned());
    }
    if point <= -(FRACTION_DIGITS as i64) {
        return Ok("0".to_owned());
    }

    let len = digits.len() as i64;
    Ok(if point <= 0 {
        format!("{sign}0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point >= len {
        format!("{sign}{digits}{}", "0".repeat((point - len) as usize))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{sign}{whole}.{fraction}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn to_decimal_string_pads_fraction() {
        assert_eq!(to_decimal_string(0, 0), "0.000000000");
        assert_eq!(to_decimal_string(15, 72), "15.000000072");
        assert_eq!(to_decimal_string(19_827_342_231, 192_837_465), "19827342231.192837465");
        assert_eq!(to_decimal_string(19_827_342_231, 0), "19827342231.000000000");
        assert_eq!(to_decimal_string(19_827_342_231, 999_999_999), "19827342231.999999999");
    }

    #[test]
    fn to_decimal_string_negative_seconds() {
        assert_eq!(to_decimal_string(-1, 0), "-1.000000000");
        assert_eq!(to_decimal_string(-1, 250_000_000), "-0.750000000");
        assert_eq!(to_decimal_string(-2, 1), "-1.999999999");
        assert_eq!(
            to_decimal_string(i64::MIN, 1),
            format!("-{}.999999999", (i64::MIN + 1).unsigned_abs())
        );
    }

    #[test]
    fn rendering_is_fixed_width() {
        for (s, n) in [(0, 0), (1, 1), (-5, 999_999_999), (i64::MAX, 123), (i64::MIN, 0)] {
            let text = to_decimal_string(s, n);
            assert_eq!(text.matches('.').count(), 1, "{text}");
            let (_, fraction) = text.split_once('.').unwrap();
            assert_eq!(fraction.len(), 9, "{text}");
            assert!(fraction.bytes().all(|b| b.is_ascii_digit()), "{text}");
        }
    }

    #[test]
    fn to_decimal_matches_string_form() {
        for (s, n) in [(0, 0), (15, 72), (-1, 250_000_000), (1_700_000_000, 999_999_999)] {
            assert_eq!(to_decimal(s, n).to_string(), to_decimal_string(s, n));
        }
    }

    #[test]
    fn extract_reference_values() {
        assert_eq!(extract_nanosecond_fraction(&dec("0"), 0), 0);
        assert_eq!(extract_nanosecond_fraction(&dec("15.000000072"), 15), 72);
        assert_eq!(extract_nanosecond_fraction(&dec("15.72"), 15), 720_000_000);
        assert_eq!(
            extract_nanosecond_fraction(&dec("19827342231.192837465"), 19_827_342_231),
            192_837_465
        );
        assert_eq!(extract_nanosecond_fraction(&dec("19827342231"), 19_827_342_231), 0);
        assert_eq!(
            extract_nanosecond_fraction(&dec("19827342231.999999999"), 19_827_342_231),
            999_999_999
        );
    }

    #[test]
    fn extract_truncates_extra_digits() {
        assert_eq!(extract_nanosecond_fraction(&dec("1.1234567899"), 1), 123_456_789);
        assert_eq!(extract_nanosecond_fraction(&dec("-1.5"), -1), -500_000_000);
    }

    #[test]
    fn round_trip_through_decimal() {
        let seconds = [0, 1, 15, -1, -2, 1_700_000_000, -62_135_596_800, i64::MAX / 2];
        let nanos = [0, 1, 72, 500_000_000, 999_999_999];
        for &s in &seconds {
            for &n in &nanos {
                let value = dec(&to_decimal_string(s, n));
                assert_eq!(extract_nanosecond_fraction(&value, s), n as i32, "({s}, {n})");
                assert_eq!(split_decimal(&value), Some((s, n)), "({s}, {n})");
            }
        }
    }

    #[test]
    fn split_normalises_negative_fraction() {
        assert_eq!(split_decimal(&dec("-1.5")), Some((-2, 500_000_000)));
        assert_eq!(split_decimal(&dec("-0.000000001")), Some((-1, 999_999_999)));
        assert_eq!(split_decimal(&dec("15.72")), Some((15, 720_000_000)));
        assert_eq!(split_decimal(&dec("99999999999999999999.5")), None);
    }

    #[test]
    fn parse_decimal_forms() {
        assert_eq!(parse_decimal("15.72").unwrap(), dec("15.72"));
        assert_eq!(
            parse_decimal("19827342231.192837465").unwrap(),
            dec("19827342231.192837465")
        );
        assert_eq!(parse_decimal("1.1234567891234").unwrap(), dec("1.123456789"));
        assert_eq!(parse_decimal("1.5e3").unwrap(), dec("1500"));
        assert!(matches!(parse_decimal("abc"), Err(Error::InvalidNumber { .. })));
        assert!(matches!(parse_decimal("1.12345678x9"), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn exponent_notation_is_expanded() {
        assert_eq!(parse_decimal("1.5e3").unwrap(), dec("1500"));
        assert_eq!(parse_decimal("15E-1").unwrap(), dec("1.5"));
        assert_eq!(parse_decimal("1.5e-8").unwrap(), dec("0.000000015"));
        assert_eq!(parse_decimal("-2.5e+0").unwrap(), dec("-2.5"));
        assert_eq!(parse_decimal("0.0125e2").unwrap(), dec("1.25"));
        assert_eq!(
            parse_decimal("1.370000000500e9").unwrap(),
            dec("1370000000.5")
        );
        assert_eq!(parse_decimal("1.23456789123e0").unwrap(), dec("1.234567891"));
    }

    #[test]
    fn sub_nanosecond_exponents_read_as_zero() {
        for text in ["1e-30", "5E-29", "1e-28", "-1e-40", "9.99e-10", "0e5"] {
            let value = parse_decimal(text).unwrap();
            assert!(value.is_zero(), "{text}");
            assert_eq!(split_decimal(&value), Some((0, 0)), "{text}");
        }
    }

    #[test]
    fn malformed_exponents_are_rejected() {
        for text in ["1e400", "1e", "e5", "1.2.3e4", "1ex", "-e-3", "1e99999999999999999999"] {
            assert!(matches!(parse_decimal(text), Err(Error::InvalidNumber { .. })), "{text}");
        }
    }

    #[test]
    #[should_panic(expected = "nanoseconds out of range")]
    fn to_decimal_string_rejects_whole_second_of_nanos() {
        let _ = to_decimal_string(1, NANOS_PER_SECOND);
    }

    #[test]
    #[should_panic(expected = "nanoseconds out of range")]
    fn to_decimal_rejects_whole_second_of_nanos() {
        let _ = to_decimal(1, NANOS_PER_SECOND);
    }
}
