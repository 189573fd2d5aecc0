//! # Money Module
//!
//! Provides the `Money` type for handling peso amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a month of tickets as floats drifts:                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                        │
//! │    $5.000 is stored as 500000 centavos                                 │
//! │    Totals, breakdowns and trends all add exact integers                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ohana_core::money::Money;
//!
//! let valet = Money::from_pesos(5_000);
//! let ticket = valet * 2 + Money::from_pesos(29_000);
//! assert_eq!(ticket.to_string(), "$39.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of an Argentine peso).
///
/// ## Where Money is Used
/// ```text
/// valet price ──┬──► Ticket.total_cents ──► PeriodSummary.total_sales
///               │                                │
/// item price ───┘                                ├──► PaymentBreakdown
///                                                └──► Trend / Dashboard
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use ohana_core::money::Money;
    ///
    /// let price = Money::from_cents(550); // $5,50
    /// assert_eq!(price.cents(), 550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    ///
    /// Price lists are quoted in whole pesos, so this is the usual entry point.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion (truncated toward zero).
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
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
    /// use ohana_core::money::Money;
    ///
    /// let corbata = Money::from_pesos(7_000);
    /// assert_eq!(corbata.multiply_quantity(3), Money::from_pesos(21_000));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// `multiply_quantity` that returns `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Addition that returns `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way the shop writes it: `$5.000`, `$5,50`, `-$12`.
///
/// Thousands are grouped with `.`; centavos appear after `,` only when
/// they are non-zero.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.pesos().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if self.cents_part() == 0 {
            write!(f, "{}${}", sign, grouped)
        } else {
            write!(f, "{}${},{:02}", sign, grouped, self.cents_part())
        }
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(5_000);
        assert_eq!(money.cents(), 500_000);
        assert_eq!(money.pesos(), 5_000);
        assert_eq!(money.cents_part(), 0);
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_pesos(5_000).to_string(), "$5.000");
        assert_eq!(Money::from_pesos(1_234_567).to_string(), "$1.234.567");
        assert_eq!(Money::from_pesos(999).to_string(), "$999");
        assert_eq!(Money::zero().to_string(), "$0");
    }

    #[test]
    fn test_display_centavos_and_sign() {
        assert_eq!(Money::from_cents(550).to_string(), "$5,50");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5,50");
        assert_eq!(Money::from_pesos(-12).to_string(), "-$12");
        assert_eq!(Money::from_cents(100_005).to_string(), "$1.000,05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(10);
        let b = Money::from_pesos(5);

        assert_eq!((a + b).pesos(), 15);
        assert_eq!((a - b).pesos(), 5);
        assert_eq!((a * 3).pesos(), 30);

        let mut c = a;
        c += b;
        c -= Money::from_pesos(1);
        assert_eq!(c.pesos(), 14);
    }

    #[test]
    fn test_checked_arithmetic() {
        let traje = Money::from_pesos(29_000);
        assert_eq!(traje.checked_multiply_quantity(2), Some(Money::from_pesos(58_000)));
        assert_eq!(traje.checked_add(traje), Some(Money::from_pesos(58_000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::from_pesos(1), Money::from_pesos(2), Money::from_pesos(3)];
        let by_ref: Money = amounts.iter().sum();
        let by_value: Money = amounts.into_iter().sum();
        assert_eq!(by_ref, Money::from_pesos(6));
        assert_eq!(by_value, by_ref);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-250).abs().cents(), 250);
    }
}
