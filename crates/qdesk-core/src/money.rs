//! # Money Module
//!
//! Provides the `Money` type for rupee amounts that have crossed the
//! rounding boundary.
//!
//! ## Two Number Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Decimal (rust_decimal)              Money (this module)               │
//! │  ─────────────────────               ──────────────────                │
//! │  quantity, rate, discount %, GST %   subtotal, GST, SGST, total ...    │
//! │  every intermediate step             every figure a user ever sees     │
//! │  unbounded scale                     integer paise (scale 2)           │
//! │                                                                         │
//! │  Decimal ──► Money::from_decimal() ──► Money                           │
//! │              (round half away from zero, the ONLY rounding step)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reverse GST needs `gross / 1.18`, which integer paise cannot express
//! exactly, so intermediates stay `Decimal` and only outputs become `Money`.
//!
//! ## Usage
//! ```rust
//! use qdesk_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let gst = Money::from_decimal(Decimal::new(32405, 3)); // 32.405
//! assert_eq!(gst.paise(), 3241);                          // 32.41
//!
//! let total = gst + Money::from_paise(18000);
//! assert_eq!(total.to_string(), "212.41");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Number of decimal places every monetary output carries.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01).
pub const MONEY_TOLERANCE: Money = Money::from_paise(1);

// =============================================================================
// Money Type
// =============================================================================

/// Represents a rupee amount in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences (e.g. reconciliation deltas) may go negative
/// - **Serialized as a decimal string** (`"212.40"`): consumers get a decimal
///   number, never a formatted display string to reparse
///
/// ## Where Money is Used
/// ```text
/// LineItem ──► compute_line() ──► LineTotals { subtotal, gst, sgst, ... }
///                                      │
///                                      ▼
///                              aggregate() ──► QuotationSummary
///                                      │
///                                      ▼
///                        render() / CLI output / totalAmount on save
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Decimal", from = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use qdesk_core::money::Money;
    ///
    /// let price = Money::from_paise(21240); // ₹212.40
    /// assert_eq!(price.rupees(), 212);
    /// assert_eq!(price.paise_part(), 40);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Rounds a decimal amount to paise, half away from zero.
    ///
    /// ## Rounding Rule
    /// ```text
    ///   16.205  →  16.21
    ///   16.2049 →  16.20
    ///  -16.205  → -16.21   (away from zero, not toward +∞)
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use qdesk_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal(Decimal::new(16205, 3)).paise(), 1621);
    /// assert_eq!(Money::from_decimal(Decimal::new(-16205, 3)).paise(), -1621);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_DECIMAL_PLACES);

        match i64::try_from(rounded.mantissa()) {
            Ok(paise) => Money(paise),
            Err(_) => {
                tracing::error!(%amount, "Amount exceeds representable range, saturating");
                if amount.is_sign_negative() {
                    Money(i64::MIN)
                } else {
                    Money(i64::MAX)
                }
            }
        }
    }

    /// Returns the exact decimal value with scale 2.
    ///
    /// ## Example
    /// ```rust
    /// use qdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(21240).to_decimal().to_string(), "212.40");
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_DECIMAL_PLACES)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// True when `other` is within one paisa of `self`.
    ///
    /// Used where a figure is derived two different ways, e.g. forward vs
    /// reverse GST for the same economic line.
    pub fn approx_eq(&self, other: Money) -> bool {
        (*self - other).abs() <= MONEY_TOLERANCE
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal text (`212.40`, `-5.50`).
///
/// ## Note
/// This is not the user-facing format. Grouping and currency symbols
/// belong to [`crate::format`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money::from_decimal(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
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
