//! Fixed-point money amounts.
//!
//! The commerce API transmits amounts as decimal strings (`"300.00"`). They are
//! held here as signed minor units so subtotals and thresholds can be compared
//! without floating point.

use crate::domain::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Number of minor units per major unit (two decimal places).
const MINOR_PER_MAJOR: i64 = 100;

/// A money amount in minor units (cents, halalas).
///
/// Serializes as a two-decimal string to match the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    minor: i64,
}

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self { minor: 0 };

    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self { minor }
    }

    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self {
            minor: major * MINOR_PER_MAJOR,
        }
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.minor
    }

    /// Parses a decimal amount such as `"300"`, `"300.5"` or `"1249.99"`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Decode`] when the text is not a plain decimal
    /// number with at most two fractional digits.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (negative, digits) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let valid = !whole.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && fraction.len() <= 2
            && fraction.bytes().all(|b| b.is_ascii_digit());
        if !valid {
            return Err(StorefrontError::Decode(format!("invalid amount: {text:?}")));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|e| StorefrontError::Decode(format!("invalid amount {text:?}: {e}")))?;
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };

        let minor = whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(fraction))
            .ok_or_else(|| StorefrontError::Decode(format!("amount out of range: {text:?}")))?;

        Ok(Self::from_minor(if negative { -minor } else { minor }))
    }

    /// Subtracts without going below zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        let diff = self.minor - other.minor;
        Self {
            minor: if diff < 0 { 0 } else { diff },
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        let per = MINOR_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl TryFrom<String> for Money {
    type Error = StorefrontError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_minor(self.minor + rhs.minor)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_minor(self.minor - rhs.minor)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self::from_minor(self.minor * i64::from(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
