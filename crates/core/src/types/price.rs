//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are held exactly as entered. Rounding only ever happens at display
//! time (see [`crate::Locale::format_amount`]) or where a discount rule
//! explicitly asks for it.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Unit prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative unit price in the store currency.
///
/// Serialized as a decimal string so stored carts round-trip exactly;
/// numbers are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Extract a price from free-form display text such as `"450 ج.م"`.
    ///
    /// Every character other than an ASCII digit or `.` is discarded and the
    /// remainder is parsed as a decimal, after dropping the single trailing
    /// dot a currency label leaves behind. Text that yields no number (empty,
    /// several decimal points) is a price of zero.
    ///
    /// ```
    /// use oud_cart_core::Price;
    ///
    /// assert_eq!(Price::from_text("1,250 ج.م").to_string(), "1250");
    /// assert_eq!(Price::from_text("free"), Price::ZERO);
    /// ```
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let digits: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        // Currency labels like "ج.م" leave one stray dot behind
        let digits = digits.strip_suffix('.').unwrap_or(&digits);
        if digits.is_empty() || digits.ends_with('.') {
            return Self::ZERO;
        }
        let digits = if digits.starts_with('.') {
            format!("0{digits}")
        } else {
            digits.to_owned()
        };
        Decimal::from_str(&digits).map_or(Self::ZERO, Self)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_from_text_strips_currency_and_grouping() {
        assert_eq!(Price::from_text("450 ج.م"), Price::from_units(450));
        assert_eq!(Price::from_text("EGP 1,200.50"), Price::new(Decimal::new(120_050, 2)).unwrap());
        assert_eq!(Price::from_text(".5"), Price::new(Decimal::new(5, 1)).unwrap());
    }

    #[test]
    fn test_from_text_falls_back_to_zero() {
        assert_eq!(Price::from_text(""), Price::ZERO);
        assert_eq!(Price::from_text("no price"), Price::ZERO);
        assert_eq!(Price::from_text("1.2.3"), Price::ZERO);
    }

    #[test]
    fn test_from_text_drops_only_one_trailing_dot() {
        assert_eq!(Price::from_text("450."), Price::from_units(450));
        assert_eq!(Price::from_text("450 ج.م."), Price::ZERO);
        assert_eq!(Price::from_text("12.5 ج.م"), Price::new(Decimal::new(125, 1)).unwrap());
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::from_units(50).times(3), Decimal::from(150));
        assert_eq!(Price::from_units(50).times(0), Decimal::ZERO);
    }

    #[test]
    fn test_times_saturates() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.times(2), Decimal::MAX);
        assert_eq!(max.times(1), Decimal::MAX);
        let large = Price::new(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)).unwrap();
        assert_eq!(large.times(u32::MAX), Decimal::MAX);
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("50").unwrap();
        let from_text: Price = serde_json::from_str("\"50\"").unwrap();
        assert_eq!(from_number, from_text);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_precision() {
        let price = Price::new(Decimal::new(1999, 2)).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
