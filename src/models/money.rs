//! Money type for representing currency amounts
//!
//! Amounts are exact decimals, so a stored `12.345` is written back as
//! `12.345`. On the wire amounts are plain JSON numbers in currency units
//! (`50000`, `12.5`), matching what exported ledger files contain. Display
//! rounds to cents; arithmetic saturates instead of overflowing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// How thousands are grouped when formatting an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// 12,34,567.00
    #[default]
    Indian,
    /// 1,234,567.00
    Western,
    /// 1234567.00
    None,
}

impl fmt::Display for DigitGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indian => write!(f, "indian"),
            Self::Western => write!(f, "western"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A monetary amount in currency units, kept at the precision it was entered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use notebook_ledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a Money amount from whole currency units
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a Money amount from a floating point value
    ///
    /// The shortest decimal text that reads back as `value` is kept, so
    /// `12.345` stays `12.345`. Returns `None` for NaN, infinite or
    /// out-of-range input.
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        value.to_string().parse::<Decimal>().ok().map(Self)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the amount in cents, rounded half away from zero and saturating at the i64 range
    pub fn cents(&self) -> i64 {
        self.to_cent()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .unwrap_or(if self.is_negative() {
                i64::MIN
            } else {
                i64::MAX
            })
    }

    /// Get the whole units portion (truncated toward zero), saturating at the i64 range
    pub fn units(&self) -> i64 {
        self.0.trunc().to_i64().unwrap_or(if self.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Get the cents portion (0-99) of the amount rounded to cents
    pub fn cents_part(&self) -> i64 {
        let rounded = self.to_cent().abs();
        ((rounded - rounded.trunc()) * Decimal::ONE_HUNDRED)
            .to_i64()
            .unwrap_or(0)
    }

    fn to_cent(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The amount as a floating point number of currency units
    pub fn as_decimal(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// The exact stored value
    pub const fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The larger of this amount and zero
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Self::zero()
        } else {
            self
        }
    }

    /// Add, clamping to the representable range instead of overflowing
    pub fn saturating_add(self, other: Self) -> Self {
        match self.0.checked_add(other.0) {
            Some(sum) => Self(sum),
            None if other.is_negative() => Self(Decimal::MIN),
            None => Self(Decimal::MAX),
        }
    }

    /// Subtract, clamping to the representable range instead of overflowing
    pub fn saturating_sub(self, other: Self) -> Self {
        self.saturating_add(-other)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "₹10.50", "$10.50", "10", "1,23,456.5".
    /// Every fractional digit given is kept.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s
            .strip_prefix('₹')
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s)
            .trim();
        let s: String = s.chars().filter(|c| *c != ',').collect();

        let (whole, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !digits_only(whole) || !digits_only(frac) {
            return Err(MoneyParseError::InvalidFormat(s.clone()));
        }

        let normalized = match (whole.is_empty(), frac.is_empty()) {
            (_, true) => whole.to_string(),
            (true, false) => format!("0.{}", frac),
            (false, false) => format!("{}.{}", whole, frac),
        };
        let value = Decimal::from_str_exact(&normalized)
            .map_err(|_| MoneyParseError::OutOfRange(s.clone()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol and no digit grouping
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        self.format_grouped(symbol, DigitGrouping::None)
    }

    /// Format with a currency symbol and the given digit grouping, rounded to cents
    pub fn format_grouped(&self, symbol: &str, grouping: DigitGrouping) -> String {
        let fixed = format!("{:.2}", self.to_cent().abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}{}.{}", sign, symbol, group_digits(whole, grouping), cents)
    }
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let (head, tail) = match grouping {
        DigitGrouping::None => return digits.to_string(),
        _ if digits.len() <= 3 => return digits.to_string(),
        _ => digits.split_at(digits.len() - 3),
    };

    let group = match grouping {
        DigitGrouping::Indian => 2,
        _ => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_grouped("₹", DigitGrouping::Indian))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract().is_zero() {
            if let Some(whole) = self.0.trunc().to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        // Up to 15 significant digits survive the f64 and print back unchanged
        let float = self
            .0
            .normalize()
            .to_string()
            .parse::<f64>()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(float)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a finite decimal amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        Ok(Money(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).ok_or_else(|| E::custom("amount is not a finite number in range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.saturating_sub(other)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = self.saturating_sub(other);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
