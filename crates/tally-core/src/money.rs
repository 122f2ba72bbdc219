//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many discount engines:                                              │
//! │    $10.00 split 3 ways = $3.33 (×3 = $9.99)  → Lost $0.01!             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    A fixed-amount discount split across tax groups is computed as       │
//! │    amount × group_subtotal / order_total in i128, rounded half-up.      │
//! │    Any cent lost to rounding is deterministic and testable.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // $15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Discount lines are negative amounts by definition
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes the portion of this amount at a basis-point rate.
    ///
    /// ## Implementation
    /// Integer math in i128: `(cents * bps + 5000) / 10000`
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use tally_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_cents(15000);      // $150.00
    /// let rate = DiscountRate::from_bps(1000);      // 10%
    /// assert_eq!(subtotal.apply_rate(rate).cents(), 1500); // $15.00
    /// ```
    pub fn apply_rate(&self, rate: DiscountRate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Returns this amount after deducting a basis-point discount.
    ///
    /// A line priced $100.00 carrying a 25% line discount retains $75.00.
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let discount = self.apply_rate(rate);
        Money::from_cents(self.0 - discount.cents())
    }

    /// Computes `self × part / whole` with half-up rounding.
    ///
    /// This is the fixed-amount split: a $20.00 discount shared by a tax
    /// group holding $50.00 of a $200.00 order contributes
    /// `2000 × 5000 / 20000 = 500` cents.
    ///
    /// Callers must guarantee `whole` is non-zero and all operands are
    /// non-negative; the discount algorithm short-circuits a zero order
    /// total before reaching this point.
    pub fn proportional_share(&self, part: Money, whole: Money) -> Money {
        let num = self.0 as i128 * part.0 as i128;
        let den = whole.0 as i128;
        Money::from_cents(((num + den / 2) / den) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and descriptions. Hosts needing localized
/// currency display should format from `cents()` themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Negation (discount lines are negated subtotals).
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);
    }

    #[test]
    fn test_apply_rate_basic() {
        // $150.00 at 10% = $15.00
        let subtotal = Money::from_cents(15000);
        let rate = DiscountRate::from_bps(1000);
        assert_eq!(subtotal.apply_rate(rate).cents(), 1500);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let amount = Money::from_cents(1000);
        let rate = DiscountRate::from_bps(825);
        assert_eq!(amount.apply_rate(rate).cents(), 83);
    }

    #[test]
    fn test_apply_discount() {
        // $100.00 minus 25% = $75.00
        let price = Money::from_cents(10000);
        let rate = DiscountRate::from_bps(2500);
        assert_eq!(price.apply_discount(rate).cents(), 7500);
    }

    #[test]
    fn test_proportional_share() {
        // $20.00 split for a $50.00 group of a $200.00 order = $5.00
        let amount = Money::from_cents(2000);
        let share = amount.proportional_share(
            Money::from_cents(5000),
            Money::from_cents(20000),
        );
        assert_eq!(share.cents(), 500);
    }

    #[test]
    fn test_proportional_share_rounding() {
        // $10.00 split over thirds: 1000 × 1 / 3 = 333.33… → 333
        let amount = Money::from_cents(1000);
        let share = amount.proportional_share(
            Money::from_cents(100),
            Money::from_cents(300),
        );
        assert_eq!(share.cents(), 333);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    /// Documents the intentional precision loss of a three-way split.
    #[test]
    fn test_split_precision_loss_documented() {
        let amount = Money::from_cents(1000);
        let third = Money::from_cents(100);
        let whole = Money::from_cents(300);

        let share = amount.proportional_share(third, whole);
        let reconstructed = share.multiply_quantity(3); // 999 cents

        // We intentionally lose 1 cent - this is documented behavior
        let lost = amount - reconstructed;
        assert_eq!(lost.cents(), 1);
    }
}
