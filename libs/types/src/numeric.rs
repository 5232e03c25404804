//! Scalar tick types for prices and quantities
//!
//! Prices are signed tick counts and quantities are unsigned lot counts, so
//! all arithmetic is exact integer math. No rounding anywhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Price expressed as a signed number of ticks.
///
/// Carries a reserved sentinel, [`Price::INVALID`], used by Market orders
/// before they are repriced at admission. Every other `i64` value is a
/// tradable price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Sentinel for orders that have no price yet (Market orders prior to
    /// admission-time conversion).
    pub const INVALID: Price = Price(i64::MIN);

    /// Create a new tradable Price.
    ///
    /// # Panics
    /// Panics if the value is the reserved sentinel.
    pub fn new(ticks: i64) -> Self {
        assert!(ticks != i64::MIN, "Price must be a tradable value");
        Self(ticks)
    }

    /// Try to create a tradable Price, returning None for the sentinel.
    pub fn try_new(ticks: i64) -> Option<Self> {
        if ticks != i64::MIN {
            Some(Self(ticks))
        } else {
            None
        }
    }

    /// Whether this is a tradable price rather than the sentinel.
    pub fn is_valid(&self) -> bool {
        self.0 != i64::MIN
    }

    /// Get the raw tick count.
    pub fn ticks(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "<invalid>")
        }
    }
}

impl From<i64> for Price {
    fn from(ticks: i64) -> Self {
        Self::new(ticks)
    }
}

/// Quantity expressed as an unsigned number of lots.
///
/// Subtraction is checked: underflow is an invariant violation and panics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    /// Create a new Quantity.
    pub fn new(lots: u64) -> Self {
        Self(lots)
    }

    /// Zero quantity.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Check if the quantity is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Get the raw lot count.
    pub fn lots(&self) -> u64 {
        self.0
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(
            self.0 >= rhs.0,
            "Quantity subtraction would result in negative"
        );
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(lots: u64) -> Self {
        Self::new(lots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_creation() {
        let price = Price::new(100);
        assert_eq!(price.ticks(), 100);
        assert!(price.is_valid());
    }

    #[test]
    fn test_price_negative_ticks_are_tradable() {
        let price = Price::new(-5);
        assert!(price.is_valid());
        assert_eq!(price.ticks(), -5);
    }

    #[test]
    fn test_price_invalid_sentinel() {
        assert!(!Price::INVALID.is_valid());
        assert_eq!(Price::try_new(i64::MIN), None);
    }

    #[test]
    #[should_panic(expected = "Price must be a tradable value")]
    fn test_price_sentinel_construction_panics() {
        Price::new(i64::MIN);
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::new(99) < Price::new(100));
        assert!(Price::INVALID < Price::new(i64::MIN + 1));
    }

    #[test]
    fn test_price_serialization() {
        let price = Price::new(101);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "101");

        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    #[test]
    fn test_quantity_zero() {
        let qty = Quantity::zero();
        assert!(qty.is_zero());
    }

    #[test]
    fn test_quantity_arithmetic() {
        let q1 = Quantity::new(25);
        let q2 = Quantity::new(15);

        assert_eq!(q1 + q2, Quantity::new(40));
        assert_eq!(q1 - q2, Quantity::new(10));

        let mut q3 = q1;
        q3 -= q2;
        assert_eq!(q3, Quantity::new(10));
    }

    #[test]
    #[should_panic(expected = "Quantity subtraction would result in negative")]
    fn test_quantity_underflow_panics() {
        let _ = Quantity::new(1) - Quantity::new(2);
    }

    #[test]
    fn test_quantity_sum() {
        let total: Quantity = [10u64, 20, 30].into_iter().map(Quantity::new).sum();
        assert_eq!(total, Quantity::new(60));
    }

    #[test]
    fn test_quantity_serialization() {
        let qty = Quantity::new(42);
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "42");

        let deserialized: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(qty, deserialized);
    }
}
