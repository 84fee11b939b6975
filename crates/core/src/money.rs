//! Money as integer cents.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the ledger (expense amounts,
/// split shares, balances, settlements) so that "splits sum to the expense
/// amount" holds exactly instead of within a float tolerance.
///
/// The value is signed:
/// - positive = is owed money / a payment
/// - negative = owes money
///
/// Decimals only exist at the boundary: JSON numbers and strings are converted
/// to cents on the way in and back to two-decimal numbers on the way out.
///
/// ```rust
/// use splitledger_core::Money;
///
/// let amount = Money::from_cents(33_34);
/// assert_eq!(amount.to_string(), "33.34");
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// One cent, the smallest representable amount.
    pub const CENT: Money = Money(1);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns `self * numerator / denominator`, rounded to the nearest cent
    /// (halves away from zero).
    ///
    /// ```rust
    /// use splitledger_core::Money;
    ///
    /// // 60% of 100.00, with the percentage in basis points.
    /// let share = Money::from_cents(100_00).mul_div_round(6_000, 10_000).unwrap();
    /// assert_eq!(share, Money::from_cents(60_00));
    /// ```
    pub fn mul_div_round(self, numerator: i64, denominator: i64) -> DomainResult<Money> {
        let scaled = round_div(
            i128::from(self.0) * i128::from(numerator),
            i128::from(denominator),
        )?;
        i64::try_from(scaled)
            .map(Money)
            .map_err(|_| DomainError::invalid_amount("amount too large"))
    }

    /// Converts a decimal amount to cents, rounding to the nearest cent.
    pub fn from_decimal(value: f64) -> DomainResult<Money> {
        if !value.is_finite() {
            return Err(DomainError::invalid_amount(format!("{value} is not finite")));
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return Err(DomainError::invalid_amount("amount too large"));
        }
        Ok(Money(cents as i64))
    }

    /// Converts to a decimal amount (boundary use only).
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Integer division rounding halves away from zero.
pub(crate) fn round_div(numerator: i128, denominator: i128) -> DomainResult<i128> {
    if denominator == 0 {
        return Err(DomainError::invalid_amount("division by zero"));
    }
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        let away = if (numerator < 0) == (denominator < 0) { 1 } else { -1 };
        Ok(quotient + away)
    } else {
        Ok(quotient)
    }
}

/// Parses a decimal string with at most `scale` fractional digits into an
/// integer count of `10^-scale` units. Accepts `.` or `,` and a leading sign.
pub(crate) fn parse_fixed(s: &str, scale: u32, what: &str) -> DomainResult<i64> {
    let empty = || DomainError::invalid_amount(format!("empty {what}"));
    let invalid = || DomainError::invalid_amount(format!("invalid {what}: {s:?}"));
    let overflow = || DomainError::invalid_amount(format!("{what} too large"));

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().replace(',', ".");
    if rest.is_empty() {
        return Err(empty());
    }

    let mut parts = rest.split('.');
    let whole_str = parts.next().ok_or_else(invalid)?;
    let frac_str = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(invalid());
    }

    if whole_str.is_empty() || !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac_str.len() > scale as usize {
        return Err(DomainError::invalid_amount(format!(
            "{what} has more than {scale} decimals"
        )));
    }

    let whole: i64 = whole_str.parse().map_err(|_| overflow())?;
    let padded = format!("{frac_str:0<width$}", width = scale as usize);
    let frac: i64 = if padded.is_empty() {
        0
    } else {
        padded.parse().map_err(|_| invalid())?
    };

    let total = whole
        .checked_mul(10i64.pow(scale))
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(overflow)?;

    if negative {
        total.checked_neg().ok_or_else(overflow)
    } else {
        Ok(total)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parses a decimal string into cents; rejects more than 2 decimals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s, 2, "amount").map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum DecimalRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match DecimalRepr::deserialize(deserializer)? {
            DecimalRepr::Number(value) => Money::from_decimal(value),
            DecimalRepr::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
