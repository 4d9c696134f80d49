//! Percentage arithmetic.
//!
//! Operators type commission splits as percentages (`6.5` meaning 6.5%), the
//! database stores them as fractions (`0.065`). Every conversion is exact
//! decimal arithmetic with half-up rounding so that twelve summed slots never
//! drift.
//!
//! CRITICAL: Never use floating-point here.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CommissionError;

/// Decimal places kept for stored fractions (and for form display values).
pub const FRACTION_SCALE: u32 = 6;

/// Decimal places used for read-only percentage labels.
pub const LABEL_SCALE: u32 = 2;

/// Decimal places for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds half away from zero ("half-up" in accounting terms).
#[must_use]
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a monetary amount to cents.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    round_half_up(value, MONEY_SCALE)
}

/// Parses a human-entered decimal, accepting plain or scientific notation.
///
/// # Errors
///
/// Returns `CommissionError::InvalidPercentage` when the input is not a number.
pub fn parse_decimal(input: &str) -> Result<Decimal, CommissionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommissionError::InvalidPercentage(input.to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CommissionError::InvalidPercentage(input.to_string()))
}

/// Converts a display percentage (0-100 scale) to a stored fraction (0-1 scale).
///
/// # Errors
///
/// Returns `CommissionError::InvalidPercentage` when the input is not a number.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use alianza_core::percent::percent_to_fraction;
///
/// assert_eq!(percent_to_fraction("6.5").unwrap(), dec!(0.065));
/// ```
pub fn percent_to_fraction(input: &str) -> Result<Decimal, CommissionError> {
    Ok(percent_value_to_fraction(parse_decimal(input)?))
}

/// Converts an already-parsed display percentage to a stored fraction.
#[must_use]
pub fn percent_value_to_fraction(percent: Decimal) -> Decimal {
    round_half_up(percent / Decimal::ONE_HUNDRED, FRACTION_SCALE)
}

/// Converts a stored fraction to the value shown in an editable form field.
#[must_use]
pub fn fraction_to_percent(fraction: Decimal) -> Decimal {
    round_half_up(fraction * Decimal::ONE_HUNDRED, FRACTION_SCALE)
}

/// Converts a stored fraction to a two-decimal read-only label value.
#[must_use]
pub fn fraction_to_percent_label(fraction: Decimal) -> Decimal {
    round_half_up(fraction * Decimal::ONE_HUNDRED, LABEL_SCALE)
}
