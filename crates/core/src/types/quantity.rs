//! Cart and order line quantities.

use core::fmt;

use serde::Serialize;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative quantity.
    #[error("quantity must be at least {min}")]
    TooSmall {
        /// Minimum allowed quantity.
        min: u32,
    },
    /// Quantity above the per-line limit.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// A line quantity of at least one.
///
/// A zero or negative quantity is not representable, so anything holding a
/// `Quantity` never has to decide what "zero items" means. Callers that
/// receive `<= 0` from a client treat it as a removal before reaching the
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// One unit.
    pub const ONE: Self = Self(1);

    /// Largest quantity a client may request for one line.
    pub const MAX_REQUEST: u32 = 999;

    /// Create a quantity from a client-supplied number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is below 1 or above
    /// [`Quantity::MAX_REQUEST`].
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::TooSmall { min: 1 });
        }
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX_REQUEST)
            .map(Self)
            .ok_or(QuantityError::TooLarge {
                max: Self::MAX_REQUEST,
            })
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Add two quantities, saturating at `u32::MAX`.
    ///
    /// Merged cart rows may exceed the per-request limit; only a single
    /// request is bounded.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::TooSmall { min: 1 }));
        assert_eq!(Quantity::new(-4), Err(QuantityError::TooSmall { min: 1 }));
    }

    #[test]
    fn test_rejects_above_request_limit() {
        assert_eq!(
            Quantity::new(1000),
            Err(QuantityError::TooLarge { max: 999 })
        );
        assert!(Quantity::new(i64::MAX).is_err());
    }

    #[test]
    fn test_accepts_range() {
        assert_eq!(Quantity::new(1).map(|q| q.get()), Ok(1));
        assert_eq!(Quantity::new(999).map(|q| q.get()), Ok(999));
    }

    #[test]
    fn test_saturating_add() {
        let a = Quantity::new(2).expect("valid");
        let b = Quantity::new(3).expect("valid");
        assert_eq!(a.saturating_add(b).get(), 5);
    }
}
