//! Money types with fixed display and storage precision
//!
//! Amounts are held as `rust_decimal::Decimal` so no floating-point error can
//! creep into bill totals or splits. Two precisions are in play:
//!
//! - **Storage precision** (4 fractional digits) is used for every internal
//!   calculation so intermediate results do not accumulate rounding error.
//! - **Display precision** (2 fractional digits) is used for anything that
//!   crosses a boundary: API payloads, totals typed in by a user, and any
//!   comparison against such a value.
//!
//! All rounding is round-half-up (midpoint away from zero).
//!
//! Parsed amounts are bounded by [`MAX_AMOUNT`] in magnitude, far below the
//! range of `Decimal`, so sums over any realistic number of parsed amounts
//! cannot overflow. Values built directly from a `Decimal` are not bounded;
//! use the `checked_*` methods when combining those.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Fractional digits used at system boundaries
pub const DISPLAY_PRECISION: u32 = 2;

/// Fractional digits used for internal calculations and persistence
pub const STORAGE_PRECISION: u32 = 4;

/// Largest magnitude accepted from a literal (one quadrillion)
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Rounds half-up to `dp` places and pins the scale to exactly `dp`
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid money value '{input}': {reason}")]
    InvalidMoney {
        input: String,
        reason: String,
    },

    #[error("Invalid percentage '{input}': {reason}")]
    InvalidPercentage {
        input: String,
        reason: String,
    },

    #[error("Money {operation} overflowed")]
    Overflow {
        operation: &'static str,
    },
}

impl MoneyError {
    fn invalid_money(input: impl fmt::Display, reason: impl Into<String>) -> Self {
        MoneyError::InvalidMoney {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    fn invalid_percentage(input: impl fmt::Display, reason: impl Into<String>) -> Self {
        MoneyError::InvalidPercentage {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// The precision a Money value was established at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Two fractional digits, validated at a boundary
    Display,
    /// Four fractional digits, produced internally
    Storage,
}

impl Precision {
    /// Returns the number of fractional digits for this precision
    pub fn decimal_places(&self) -> u32 {
        match self {
            Precision::Display => DISPLAY_PRECISION,
            Precision::Storage => STORAGE_PRECISION,
        }
    }

    /// The precision with fewer fractional digits
    pub fn coarser(self, other: Precision) -> Precision {
        if self == Precision::Display || other == Precision::Display {
            Precision::Display
        } else {
            Precision::Storage
        }
    }

    /// The precision with more fractional digits
    pub fn finer(self, other: Precision) -> Precision {
        if self == Precision::Storage || other == Precision::Storage {
            Precision::Storage
        } else {
            Precision::Display
        }
    }
}

/// A monetary amount
///
/// Money never carries more than four fractional digits. Values parsed at a
/// boundary with [`Money::parse_strict`] remember that they are display
/// precision; comparisons between two values happen at the coarser of their
/// precisions, so `10.0000` produced internally equals a user-supplied `10.00`.
///
/// Because of that rule equality is not transitive across precisions, which is
/// why Money implements `PartialEq`/`PartialOrd` but not `Eq`/`Ord`/`Hash`.
#[derive(Debug, Clone, Copy)]
pub struct Money {
    amount: Decimal,
    precision: Precision,
}

impl Money {
    /// Creates a storage-precision value, rounding half-up to 4 places
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: round_half_up(amount, STORAGE_PRECISION),
            precision: Precision::Storage,
        }
    }

    /// Creates a display-precision value, rounding half-up to 2 places
    pub fn display(amount: Decimal) -> Self {
        Self {
            amount: round_half_up(amount, DISPLAY_PRECISION),
            precision: Precision::Display,
        }
    }

    /// Creates Money from an integer amount of cents
    pub fn from_minor(cents: i64) -> Self {
        Self::display(Decimal::new(cents, DISPLAY_PRECISION))
    }

    /// Zero at display precision
    pub fn zero() -> Self {
        Self::display(Decimal::ZERO)
    }

    /// Parses a boundary value
    ///
    /// Fails when the literal is malformed or carries more significant
    /// fractional digits than display precision allows. Trailing zeros are
    /// not significant: `"10.500"` is accepted, `"10.505"` is not.
    pub fn parse_strict(input: &str) -> Result<Self, MoneyError> {
        let value = parse_decimal(input)?;
        Self::from_decimal_strict(value)
    }

    /// Parses an internal value, rounding half-up to storage precision
    pub fn parse_lenient(input: &str) -> Result<Self, MoneyError> {
        let value = parse_decimal(input)?;
        check_magnitude(value)?;
        Ok(Self::new(value))
    }

    /// Validates a decimal against display precision without rounding
    pub fn from_decimal_strict(value: Decimal) -> Result<Self, MoneyError> {
        check_magnitude(value)?;
        if value.normalize().scale() > DISPLAY_PRECISION {
            return Err(MoneyError::invalid_money(
                value,
                format!("more than {} significant fractional digits", DISPLAY_PRECISION),
            ));
        }
        Ok(Self::display(value))
    }

    /// Returns the amount as held internally
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the precision this value was established at
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Boundary representation: exactly 2 fractional digits, half-up
    pub fn to_display(&self) -> Decimal {
        round_half_up(self.amount, DISPLAY_PRECISION)
    }

    /// Persistence representation: exactly 4 fractional digits
    pub fn to_storage(&self) -> Decimal {
        round_half_up(self.amount, STORAGE_PRECISION)
    }

    /// Returns this value rounded to display precision
    pub fn rounded_to_display(&self) -> Money {
        Self::display(self.amount)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            precision: self.precision,
        }
    }

    /// Multiplies by a scalar; the result is storage precision
    pub fn scale_by(&self, factor: Decimal) -> Result<Self, MoneyError> {
        self.amount
            .checked_mul(factor)
            .map(Self::new)
            .ok_or(MoneyError::Overflow { operation: "multiplication" })
    }

    pub fn checked_add(&self, other: &Money) -> Result<Self, MoneyError> {
        self.amount
            .checked_add(other.amount)
            .map(|amount| self.combine(other, amount))
            .ok_or(MoneyError::Overflow { operation: "addition" })
    }

    pub fn checked_sub(&self, other: &Money) -> Result<Self, MoneyError> {
        self.amount
            .checked_sub(other.amount)
            .map(|amount| self.combine(other, amount))
            .ok_or(MoneyError::Overflow { operation: "subtraction" })
    }

    /// Sums amounts, failing instead of panicking on overflow
    pub fn checked_sum<I>(amounts: I) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(&m))
    }

    /// Compares at the coarser of the two precisions
    pub fn compare_to(&self, other: &Money) -> Ordering {
        let dp = self.precision.coarser(other.precision).decimal_places();
        round_half_up(self.amount, dp).cmp(&round_half_up(other.amount, dp))
    }

    fn combine(&self, other: &Money, amount: Decimal) -> Self {
        match self.precision.finer(other.precision) {
            Precision::Display => Self::display(amount),
            Precision::Storage => Self::new(amount),
        }
    }
}

fn check_magnitude(value: Decimal) -> Result<(), MoneyError> {
    if value.abs() > MAX_AMOUNT {
        return Err(MoneyError::invalid_money(
            value,
            format!("magnitude exceeds {}", MAX_AMOUNT),
        ));
    }
    Ok(())
}

fn parse_decimal(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::invalid_money(input, "empty value"));
    }
    Decimal::from_str(trimmed).map_err(|e| MoneyError::invalid_money(input, e.to_string()))
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(other) == Ordering::Equal
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare_to(other))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s)
    }
}

// The operators panic on overflow like `Decimal`'s; amounts that did not
// come through a parser go through `checked_add`/`checked_sub`.
impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.combine(&other, self.amount + other.amount)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.combine(&other, self.amount - other.amount)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            amount: -self.amount,
            precision: self.precision,
        }
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

// Only the display representation crosses a JSON boundary.
impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_display().to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match MoneyRepr::deserialize(deserializer)? {
            MoneyRepr::Text(s) => s,
            MoneyRepr::Number(n) => n.to_string(),
        };
        Money::parse_strict(&text).map_err(serde::de::Error::custom)
    }
}

/// A percentage between 0 and 100 inclusive
///
/// Used for rollout thresholds and for scaling amounts. At most four
/// fractional digits are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage from a value such as `12.5` for 12.5%
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value < Decimal::ZERO || value > dec!(100) {
            return Err(MoneyError::invalid_percentage(value, "must be between 0 and 100"));
        }
        if value.normalize().scale() > STORAGE_PRECISION {
            return Err(MoneyError::invalid_percentage(
                value,
                format!("more than {} fractional digits", STORAGE_PRECISION),
            ));
        }
        Ok(Self(value.normalize()))
    }

    /// Parses a percentage literal; a trailing `%` is allowed
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim().trim_end_matches('%').trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|e| MoneyError::invalid_percentage(input, e.to_string()))?;
        Self::new(value)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn full() -> Self {
        Self(dec!(100))
    }

    /// Returns the value as a percentage (e.g. 12.5)
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (e.g. 0.125)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / dec!(100)
    }

    /// Applies this percentage to an amount
    pub fn apply(&self, money: &Money) -> Result<Money, MoneyError> {
        money.scale_by(self.as_fraction())
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(p: Percentage) -> Decimal {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
