//! Decimal string (DS) and integer string (IS) handling
//!
//! DS values are carried as [`Decimal`] so that values read from a dataset
//! compare and re-encode without binary floating point drift.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

/// Significant digits kept when formatting non-integral values
pub const SIGNIFICANT_DIGITS: u32 = 10;

/// Maximum length of a single DS value in bytes
pub const DS_MAX_LENGTH: usize = 16;

/// Parse a DS value
///
/// Accepts plain decimals, a leading sign, and exponent notation.
pub fn parse_decimal_string(value: &str) -> Option<Decimal> {
    let value = value.trim_matches([' ', '\0']);
    if value.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(value) {
        return Some(d);
    }
    if let Ok(d) = Decimal::from_scientific(value) {
        return Some(d);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Decimal::from_f64)
}

/// Format a DS value
///
/// Integral values are written without a fractional part; other values are
/// rounded to ten significant digits with trailing zeros removed. Values
/// that would still exceed the 16 byte DS limit are written in exponent
/// notation.
pub fn format_decimal_string(value: Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let candidate = if value.fract().is_zero() {
        value.trunc().normalize().to_string()
    } else {
        value
            .round_sf(SIGNIFICANT_DIGITS)
            .unwrap_or(value)
            .normalize()
            .to_string()
    };

    if candidate.len() <= DS_MAX_LENGTH {
        return candidate;
    }
    exponent_form(value).unwrap_or(candidate)
}

/// Format an `f64` as a DS value
pub fn format_f64_decimal_string(value: f64) -> String {
    match Decimal::from_f64(value) {
        Some(d) => format_decimal_string(d),
        None => exponent_form_f64(value).unwrap_or_else(|| "0".to_string()),
    }
}

fn exponent_form(value: Decimal) -> Option<String> {
    exponent_form_f64(value.to_f64()?)
}

fn exponent_form_f64(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let max_precision = (SIGNIFICANT_DIGITS - 1) as usize;
    (0..=max_precision)
        .rev()
        .map(|precision| format!("{:.*E}", precision, value))
        .find(|s| s.len() <= DS_MAX_LENGTH)
}

/// Format an IS value
pub fn format_integer_string(value: i64) -> String {
    value.to_string()
}
