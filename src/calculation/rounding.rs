//! Currency rounding helpers.
//!
//! Korean withholding rounds down to whole won or to the nearest 10 won
//! below. All amounts handled here are non-negative.

use rust_decimal::{Decimal, RoundingStrategy};

const TEN: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Truncates to a whole currency unit.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::truncate_won;
/// use rust_decimal::Decimal;
///
/// assert_eq!(truncate_won(Decimal::new(1234567, 2)), Decimal::new(12345, 0));
/// ```
pub fn truncate_won(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Rounds down to the nearest 10 currency units.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::floor_to_ten;
/// use rust_decimal::Decimal;
///
/// assert_eq!(floor_to_ten(Decimal::new(13815585, 3)), Decimal::new(13810, 0));
/// ```
pub fn floor_to_ten(amount: Decimal) -> Decimal {
    (amount / TEN).floor() * TEN
}

/// Rounds to two decimal places, halves away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
