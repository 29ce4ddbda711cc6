//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Product prices, line totals and order totals are all i64 cents.  │
//! │    Only display code ever formats them as decimals.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line_total = price.checked_mul(3).unwrap();
//! assert_eq!(line_total.cents(), 3297);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: keeps arithmetic total, negativity is caught by
///   validation rather than by the type
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support, serialized as a bare integer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Usage
    /// Line totals: `unit_price.checked_mul(quantity)`.
    #[inline]
    pub fn checked_mul(self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Adds another amount, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl fmt::Display for Money {
    /// Formats as a decimal amount, e.g. `10.99` or `-5.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_roundtrip() {
        let m = Money::from_cents(1099);
        assert_eq!(m.cents(), 1099);
        assert!(!m.is_zero());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_checked_mul() {
        let price = Money::from_cents(250);
        assert_eq!(price.checked_mul(4), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn test_accumulation() {
        let mut total = Money::zero();
        total += Money::from_cents(1099);
        total += Money::from_cents(250).checked_mul(2).unwrap();
        assert_eq!(total.cents(), 1599);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }
}
