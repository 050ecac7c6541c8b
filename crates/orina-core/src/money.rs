//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    140 × 0.15 + 450 × 0.2 = 111.00000000000001  ❌ WRONG!               │
//! │                                                                         │
//! │  Recipes weigh ingredients in fractions (0.15 kg sugar, 0.005 kg        │
//! │  preservative), so integer cents alone are not enough: the quantity     │
//! │  side of every multiplication is fractional too.                        │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    140 × 0.15 = 21.00 exactly, 450 × 0.2 = 90.0 exactly                 │
//! │    Rounding only happens when a value is displayed                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orina_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let sugar = Money::from_major(140);            // Rs 140 per kg
//! let qty = Decimal::new(15, 2);                 // 0.15 kg
//! assert_eq!(sugar.times(qty), Money::new(Decimal::new(21, 0)));
//! ```
//!
//! ## Persisted Shape
//! `Money` serializes as a plain JSON number (`"costPrice": 140`), the same
//! shape the document has always had.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Decimal places shown for any amount.
const DISPLAY_DP: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the major currency unit (rupees, dollars).
///
/// ## Design Decisions
/// - **Decimal**: exact base-10 arithmetic, fractional quantities are safe
/// - **Signed**: negative values appear in net profit and margins
/// - **Transparent serde**: stored as a JSON number
///
/// ## Where Money is Used
/// ```text
/// Product.costPrice ──► Costing Engine ──► unit cost ──► report totalCost
///
/// Product.retailPrice / wholesalePrice ──► SaleDraft line ──► totalAmount
///
/// Expense.amount ──► report totalExpenses ──► netProfit
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a whole amount in the major unit.
    ///
    /// ## Example
    /// ```rust
    /// use orina_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(350).to_string(), "350.00");
    /// ```
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a unit amount by a (possibly fractional) quantity.
    ///
    /// ## Example
    /// ```rust
    /// use orina_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let preservative = Money::from_major(1200);
    /// let line = preservative.times(Decimal::new(5, 3)); // 0.005 kg
    /// assert_eq!(line, Money::from_major(6));
    /// ```
    ///
    /// Saturates at `Decimal::MAX` / `Decimal::MIN` instead of panicking,
    /// as do the operator impls below.
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Self {
        Money(self.0.saturating_mul(quantity))
    }

    /// Rounds to two places using Bankers Rounding (round half to even).
    ///
    /// ```text
    /// 2.345 → 2.34     2.355 → 2.36     (ties go to the even digit)
    /// ```
    ///
    /// Only used for display; stored values keep full precision.
    pub fn rounded(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Formats the amount with a currency code and thousands separators.
    ///
    /// Trailing `.00` is dropped, matching how whole-rupee prices are
    /// printed on invoices.
    ///
    /// ## Example
    /// ```rust
    /// use orina_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_major(6160).format("PKR"), "PKR 6,160");
    /// assert_eq!(Money::new(Decimal::new(-12345, 1)).format("PKR"), "-PKR 1,234.50");
    /// ```
    pub fn format(&self, currency: &str) -> String {
        let rounded = self.rounded().0.abs();
        let text = format!("{:.2}", rounded);
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        if frac == "00" {
            format!("{}{} {}", sign, currency, grouped)
        } else {
            format!("{}{} {}.{}", sign, currency, grouped, frac)
        }
    }
}

// =============================================================================
// Operator Implementations
// =============================================================================

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    #[inline]
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    #[inline]
    fn mul(self, quantity: Decimal) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
