//! Tolerant parsing for raw form values.
//!
//! Every function here is total: input that cannot be read as a valid
//! non-negative value becomes zero (or `false`). Nothing is rejected, the
//! presentation layer is expected to have warned the user already.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Trims whitespace and removes `,` thousands separators.
fn normalize(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a currency amount, defaulting to zero.
///
/// Accepts `"1,234.56"`, `" 42 "`, and scientific notation such as `"1e5"`.
/// Empty, non-numeric and negative input all yield zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::parse::parse_amount;
///
/// assert_eq!(parse_amount("1,234.56"), dec!(1234.56));
/// assert_eq!(parse_amount("abc"), dec!(0));
/// assert_eq!(parse_amount("-10"), dec!(0));
/// ```
pub fn parse_amount(s: &str) -> Decimal {
    let normalized = normalize(s);
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(&normalized).or_else(|_| Decimal::from_scientific(&normalized));
    match parsed {
        Ok(value) if value.is_sign_negative() && !value.is_zero() => {
            tracing::debug!(input = %s, "negative amount, using 0");
            Decimal::ZERO
        }
        Ok(value) => value.normalize(),
        Err(e) => {
            tracing::debug!(input = %s, "unparseable amount, using 0: {}", e);
            Decimal::ZERO
        }
    }
}

/// Converts a numeric form value into an amount. Non-finite and negative
/// values become zero.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() || value < 0.0 {
        return Decimal::ZERO;
    }
    Decimal::try_from(value)
        .map(|d| d.normalize())
        .unwrap_or(Decimal::ZERO)
}

/// Parses a non-negative whole count (dependents, age).
///
/// Fractional input such as `"2.7"` is truncated. Anything else that is not a
/// non-negative number yields zero.
pub fn parse_count(s: &str) -> u32 {
    let normalized = normalize(s);
    if let Ok(n) = normalized.parse::<u32>() {
        return n;
    }
    count_from_decimal(parse_amount(&normalized))
}

/// Truncates a non-negative amount to a count, saturating at `u32::MAX`.
pub fn count_from_decimal(value: Decimal) -> u32 {
    let whole = value.trunc();
    if whole.is_sign_negative() {
        return 0;
    }
    whole.to_u32().unwrap_or(u32::MAX)
}

/// Parses a checkbox-style flag. `true`, `yes`, `y`, `1`, `on` and `checked`
/// (any case) are true; everything else is false.
pub fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on" | "checked"
    )
}
