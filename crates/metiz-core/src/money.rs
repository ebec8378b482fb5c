//! # Money Module
//!
//! Provides the `Money` type for handling prices and cart totals safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers (99.9) or, for DECIMAL       │
//! │  columns, as strings ("99.90"). Summing 0.1 + 0.2 in floats gives      │
//! │  0.30000000000000004, which is not a price.                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Kopecks                                          │
//! │    Both wire forms are decoded ONCE into i64 kopecks.                  │
//! │    Every cart total after that is integer arithmetic.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use metiz_core::money::Money;
//!
//! let price = Money::from_kopecks(10050); // 100.50 ₽
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.kopecks(), 20100);
//! assert_eq!(line.to_string(), "201 ₽");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use thiserror::Error;

/// Kopecks per ruble.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative monetary value in the smallest currency unit (kopecks).
///
/// ## Wire Format
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Backend JSON             Money                 Outgoing JSON          │
/// │  ────────────             ─────                 ─────────────          │
/// │  100          ──────────► 10000 kopecks ──────► 100                    │
/// │  "99.90"      ──────────►  9990 kopecks ──────► 99.9                   │
/// │  -5           ──────────► decode error                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

/// Failure to read a price from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative: {0}")]
    Negative(String),

    #[error("amount is not a number: {0}")]
    NotANumber(String),

    #[error("amount is too large: {0}")]
    Overflow(String),
}

impl Money {
    /// Creates a Money value from kopecks.
    #[inline]
    pub const fn from_kopecks(kopecks: i64) -> Self {
        Money(kopecks)
    }

    /// Creates a Money value from whole rubles.
    ///
    /// ```rust
    /// use metiz_core::money::Money;
    ///
    /// assert_eq!(Money::from_rubles(250).kopecks(), 25000);
    /// ```
    #[inline]
    pub const fn from_rubles(rubles: i64) -> Self {
        Money(rubles * MINOR_PER_MAJOR)
    }

    /// Returns the value in kopecks.
    #[inline]
    pub const fn kopecks(&self) -> i64 {
        self.0
    }

    /// Returns the whole-ruble portion.
    #[inline]
    pub const fn rubles(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the kopeck portion (always 0-99).
    #[inline]
    pub const fn kopecks_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Multiplies a unit price by a line quantity, saturating at the `i64`
    /// bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Parses a decimal string such as `"99.90"` or `"100"`.
    ///
    /// More than two fractional digits are rounded half-up to the kopeck.
    ///
    /// ```rust
    /// use metiz_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("99.9").unwrap().kopecks(), 9990);
    /// assert_eq!(Money::parse_decimal("0.125").unwrap().kopecks(), 13);
    /// assert!(Money::parse_decimal("-1").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Self, MoneyParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(MoneyParseError::Negative(s.to_string()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyParseError::NotANumber(s.to_string()));
        }

        let overflow = || MoneyParseError::Overflow(s.to_string());

        let rubles: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tens = digits.next().unwrap_or(0);
        let ones = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let kopecks = rubles
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|k| k.checked_add(tens * 10 + ones + i64::from(round_up)))
            .ok_or_else(overflow)?;

        Ok(Money(kopecks))
    }

    /// Converts a JSON float into kopecks, rounding to the nearest kopeck.
    pub fn from_float(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() {
            return Err(MoneyParseError::NotANumber(value.to_string()));
        }
        if value < 0.0 {
            return Err(MoneyParseError::Negative(value.to_string()));
        }
        let kopecks = (value * MINOR_PER_MAJOR as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        if kopecks >= i64::MAX as f64 {
            return Err(MoneyParseError::Overflow(value.to_string()));
        }
        Ok(Money(kopecks as i64))
    }
}

// =============================================================================
// Serde
// =============================================================================

/// Serialized as a plain JSON number of rubles, the form the backend stores.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.kopecks_part() == 0 {
            serializer.serialize_i64(self.rubles())
        } else {
            serializer.serialize_f64(self.0 as f64 / MINOR_PER_MAJOR as f64)
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative price as a number or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|r| r.checked_mul(MINOR_PER_MAJOR))
            .map(Money)
            .ok_or_else(|| E::custom(MoneyParseError::Overflow(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        if v < 0 {
            return Err(E::custom(MoneyParseError::Negative(v.to_string())));
        }
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyParseError::Overflow(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_float(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse_decimal(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates: backend amounts are untrusted and a total must never
// panic or wrap.

/// Shows rubles the way the storefront prints them: `250 ₽`, `99.90 ₽`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        if self.kopecks_part() == 0 {
            write!(f, "{}{} ₽", sign, self.rubles().abs())
        } else {
            write!(f, "{}{}.{:02} ₽", sign, self.rubles().abs(), self.kopecks_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rubles() {
        let money = Money::from_rubles(100);
        assert_eq!(money.kopecks(), 10000);
        assert_eq!(money.rubles(), 100);
        assert_eq!(money.kopecks_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rubles(250).to_string(), "250 ₽");
        assert_eq!(Money::from_kopecks(9990).to_string(), "99.90 ₽");
        assert_eq!(Money::from_kopecks(5).to_string(), "0.05 ₽");
        assert_eq!(Money::zero().to_string(), "0 ₽");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("100").unwrap().kopecks(), 10000);
        assert_eq!(Money::parse_decimal(" 12.5 ").unwrap().kopecks(), 1250);
        assert_eq!(Money::parse_decimal(".5").unwrap().kopecks(), 50);
        assert_eq!(Money::parse_decimal("1.004").unwrap().kopecks(), 100);
        assert_eq!(Money::parse_decimal("1.005").unwrap().kopecks(), 101);

        assert_eq!(Money::parse_decimal(""), Err(MoneyParseError::Empty));
        assert!(matches!(
            Money::parse_decimal("-3"),
            Err(MoneyParseError::Negative(_))
        ));
        assert!(matches!(
            Money::parse_decimal("1,50"),
            Err(MoneyParseError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_decimal("."),
            Err(MoneyParseError::NotANumber(_))
        ));
        assert!(matches!(
            Money::parse_decimal("99999999999999999999"),
            Err(MoneyParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_int: Money = serde_json::from_str("100").unwrap();
        let from_float: Money = serde_json::from_str("99.9").unwrap();
        let from_str: Money = serde_json::from_str("\"99.90\"").unwrap();

        assert_eq!(from_int, Money::from_rubles(100));
        assert_eq!(from_float.kopecks(), 9990);
        assert_eq!(from_float, from_str);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Money>("-1").is_err());
        assert!(serde_json::from_str::<Money>("-0.5").is_err());
        assert!(serde_json::from_str::<Money>("\"-2\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Money::from_rubles(250)).unwrap(), "250");
        assert_eq!(serde_json::to_string(&Money::from_kopecks(9990)).unwrap(), "99.9");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_rubles(100);
        let b = Money::from_rubles(50);

        assert_eq!((a + b).kopecks(), 15000);
        assert_eq!((a * 2).kopecks(), 20000);

        let total: Money = vec![a * 2, b].into_iter().sum();
        assert_eq!(total, Money::from_rubles(250));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_kopecks(i64::MAX);

        assert_eq!(Money::from_rubles(1).multiply_quantity(i64::MAX), max);
        assert_eq!(max * 2, max);
        assert_eq!(max + Money::from_rubles(1), max);

        let mut acc = max;
        acc += Money::from_kopecks(1);
        assert_eq!(acc, max);

        let total: Money = vec![max, max].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_from_float_rejects_out_of_range() {
        assert!(matches!(
            Money::from_float(2f64.powi(61)),
            Err(MoneyParseError::Overflow(_))
        ));
        assert!(matches!(
            Money::from_float(9.3e16),
            Err(MoneyParseError::Overflow(_))
        ));
        assert_eq!(Money::from_float(12.34).unwrap().kopecks(), 1234);
    }

    /// 0.1 + 0.2 must be exactly 0.30 once decoded.
    #[test]
    fn test_no_float_drift() {
        let a: Money = serde_json::from_str("0.1").unwrap();
        let b: Money = serde_json::from_str("0.2").unwrap();
        assert_eq!((a + b).kopecks(), 30);
    }
}
