//! Money helpers.
//!
//! Amounts are carried as integer cents (`i64`); rates and multipliers are
//! `Decimal`. These helpers are the only place cents and decimals meet.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal amount of cents to whole cents, half away from zero.
/// Amounts beyond the `i64` range saturate.
#[must_use]
pub fn round_cents(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Rounds a derived ratio to 2 decimal places for storage and display.
#[must_use]
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Divides, returning zero when the denominator is zero.
#[must_use]
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Formats cents as a dollar string, e.g. `-$12.05`.
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(1379.5)), 1380);
        assert_eq!(round_cents(dec!(1379.49)), 1379);
        assert_eq!(round_cents(dec!(-2.5)), -3);
        assert_eq!(round_cents(Decimal::ZERO), 0);
    }

    #[test]
    fn test_round_ratio() {
        assert_eq!(round_ratio(dec!(3.14159)), dec!(3.14));
        assert_eq!(round_ratio(dec!(2.005)), dec!(2.01));
    }

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_round_cents_saturates_out_of_range() {
        let huge = Decimal::from(i64::MAX) * dec!(1000);
        assert_eq!(round_cents(huge), i64::MAX);
        assert_eq!(round_cents(-huge), i64::MIN);
        assert_eq!(round_cents(Decimal::from(i64::MAX)), i64::MAX);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1234), "$12.34");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(-1205), "-$12.05");
        assert_eq!(format_cents(0), "$0.00");
    }
}
