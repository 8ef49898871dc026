//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative amounts in the store currency. Line totals and cart
//! totals are computed with [`Price::times`] and `Sum`, never with floats, so
//! `42.50` stays `42.50` through every computation and round-trip.
//!
//! Arithmetic saturates at [`Price::MAX`] instead of overflowing.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
///
/// Serialized as the decimal string form (e.g. `"42.50"`); deserialization
/// accepts strings or JSON numbers and rejects negative amounts.
///
/// ```
/// use rust_decimal::Decimal;
/// use softbenny_core::Price;
///
/// let unit = Price::from_cents(1999);
/// assert_eq!(unit.times(3).to_string(), "$59.97");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable price.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The total for `quantity` units at this price, saturating at
    /// [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    /// Formats as `$` followed by the amount rounded to two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let a = Price::from_cents(1050).times(2);
        let b = Price::from_cents(2150);
        let total: Price = [a, b].into_iter().sum();
        assert_eq!(total.amount(), Decimal::new(4250, 2));
    }

    #[test]
    fn test_arithmetic_saturates() {
        assert_eq!(Price::MAX.times(2), Price::MAX);
        assert_eq!(Price::MAX + Price::from_cents(1), Price::MAX);
        let total: Price = [Price::MAX, Price::MAX].into_iter().sum();
        assert_eq!(total, Price::MAX);
        assert_eq!(Price::from_cents(1).times(0), Price::ZERO);
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(4250).to_string(), "$42.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
        assert_eq!(Price::new(Decimal::new(5, 0)).unwrap().to_string(), "$5.00");
    }

    #[test]
    fn test_deserialize_accepts_number_and_string() {
        let from_str: Price = serde_json::from_str("\"42.50\"").unwrap();
        let from_num: Price = serde_json::from_str("42.5").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Price>("\"-3\"").is_err());
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_cents(4250)).unwrap();
        assert_eq!(json, "\"42.50\"");
    }
}
