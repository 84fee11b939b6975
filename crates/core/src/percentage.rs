//! Percentages as integer basis points.

use std::{fmt, iter::Sum, ops::Add, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::money::{DecimalRepr, Money, parse_fixed, round_div};

/// A percentage with two decimals of precision, stored as basis points
/// (`1 bp = 0.01%`, `100% = 10_000 bp`).
///
/// ```rust
/// use splitledger_core::{Money, Percentage};
///
/// let share = Percentage::of(Money::from_cents(3334), Money::from_cents(10_000)).unwrap();
/// assert_eq!(share.to_string(), "33.34%");
/// assert_eq!("33.33".parse::<Percentage>().unwrap().basis_points(), 3333);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Percentage(i64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(10_000);

    #[must_use]
    pub const fn from_basis_points(bp: i64) -> Self {
        Self(bp)
    }

    #[must_use]
    pub const fn basis_points(self) -> i64 {
        self.0
    }

    /// The share `part / whole`, rounded to two decimals.
    pub fn of(part: Money, whole: Money) -> DomainResult<Percentage> {
        let bp = round_div(
            i128::from(part.cents()) * i128::from(Self::FULL.0),
            i128::from(whole.cents()),
        )?;
        i64::try_from(bp)
            .map(Percentage)
            .map_err(|_| DomainError::invalid_amount("percentage too large"))
    }

    /// One of `n` equal parts of 100%, rounded to two decimals.
    pub fn equal_part(n: usize) -> DomainResult<Percentage> {
        let n = i128::try_from(n).map_err(|_| DomainError::invalid_amount("too many parts"))?;
        let bp = round_div(i128::from(Self::FULL.0), n)?;
        Ok(Percentage(bp as i64))
    }

    /// Applies this percentage to `amount`, rounded to the nearest cent.
    pub fn apply_to(self, amount: Money) -> DomainResult<Money> {
        amount.mul_div_round(self.0, Self::FULL.0)
    }

    /// Converts a decimal percentage (`33.33`) to basis points.
    pub fn from_decimal(value: f64) -> DomainResult<Percentage> {
        if !value.is_finite() {
            return Err(DomainError::invalid_amount(format!("{value}% is not finite")));
        }
        let bp = (value * 100.0).round();
        if bp.abs() > i64::MAX as f64 {
            return Err(DomainError::invalid_amount("percentage too large"));
        }
        Ok(Percentage(bp as i64))
    }

    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}%", abs / 100, abs % 100)
    }
}

impl FromStr for Percentage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
        parse_fixed(trimmed, 2, "percentage").map(Percentage)
    }
}

impl Add for Percentage {
    type Output = Percentage;

    fn add(self, rhs: Percentage) -> Self::Output {
        Percentage(self.0 + rhs.0)
    }
}

impl Sum for Percentage {
    fn sum<I: Iterator<Item = Percentage>>(iter: I) -> Self {
        iter.fold(Percentage::ZERO, Add::add)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match DecimalRepr::deserialize(deserializer)? {
            DecimalRepr::Number(value) => Percentage::from_decimal(value),
            DecimalRepr::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
