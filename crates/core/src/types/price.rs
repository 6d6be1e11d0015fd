//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as decimal strings (`"45.00"`) so clients never see
//! binary floating point. Deserialization also accepts JSON numbers, which
//! is how hand-edited catalog files tend to spell them.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative monetary amount.
///
/// The currency is implied by the storefront (rubles); formatting for
/// display is a client concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price from a decimal string such as `"45.00"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Sum of two prices, or `None` if the result does not fit a decimal.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_scale() {
        let price = Price::parse("45.00").expect("valid price");
        assert_eq!(price.to_string(), "45.00");
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Price::parse("forty"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::parse("52.00").expect("valid price");
        assert_eq!(serde_json::to_string(&price).expect("serialize"), "\"52.00\"");
    }

    #[test]
    fn test_deserializes_from_number_or_string() {
        let from_str: Price = serde_json::from_str("\"125.00\"").expect("string");
        let from_num: Price = serde_json::from_str("125").expect("number");
        assert_eq!(from_str.amount(), from_num.amount());
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-3.50\"").is_err());
    }

    #[test]
    fn test_checked_add() {
        let a = Price::parse("10.50").expect("valid");
        let b = Price::parse("4.50").expect("valid");
        assert_eq!(a.checked_add(b).map(|p| p.amount()), Some(Decimal::new(1500, 2)));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Price::new(Decimal::MAX).expect("valid");
        assert_eq!(max.checked_add(Price::parse("1").expect("valid")), None);
        assert_eq!(max.checked_add(Price::ZERO), Some(max));
    }
}
