use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use thiserror::Error;

/// Error returned when a decimal amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("too many decimals: {0}")]
    TooManyDecimals(String),
    #[error("amount too large: {0}")]
    Overflow(String),
}

/// Signed money amount represented as **integer cents**.
///
/// The remote API speaks decimals (`100.5`, `"12.34"`); every amount the
/// client holds is converted to cents on the way in so that sums never drift.
/// Parsing text rejects a third significant decimal; decoding server JSON
/// rounds it half-even instead, since the server keeps whatever was typed.
///
/// Arithmetic saturates at the `i64` bounds.
///
/// ```rust
/// use api_types::MoneyCents;
///
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!(MoneyCents::new(-3000).to_string(), "-30.00");
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
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
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(self.0.saturating_neg())
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MoneyCents> for MoneyCents {
    fn sum<I: Iterator<Item = &'a MoneyCents>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for MoneyCents {
    type Err = ParseMoneyError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Trailing zeros past the second decimal are tolerated (`1.500`), any
    /// other third decimal is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s, false)
    }
}

impl MoneyCents {
    /// Like [`FromStr`], but digits past the second decimal are rounded
    /// half-even (`12.345` -> `12.34`, `12.355` -> `12.36`).
    pub fn parse_rounded(s: &str) -> Result<Self, ParseMoneyError> {
        parse_decimal(s, true)
    }
}

fn parse_decimal(s: &str, round: bool) -> Result<MoneyCents, ParseMoneyError> {
    let invalid = || ParseMoneyError::Invalid(s.to_string());
    let overflow = || ParseMoneyError::Overflow(s.to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped.trim_start())
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped.trim_start())
    } else {
        (false, trimmed)
    };
    if rest.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let rest = rest.replace(',', ".");
    let (units_str, frac_str) = match rest.split_once('.') {
        Some((units, frac)) => (units, frac),
        None => (rest.as_str(), ""),
    };

    if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let significant = frac_str.trim_end_matches('0');
    let (kept, extra) = if significant.len() > 2 {
        if !round {
            return Err(ParseMoneyError::TooManyDecimals(s.to_string()));
        }
        significant.split_at(2)
    } else {
        (significant, "")
    };
    let cents: i64 = format!("{kept:0<2}").parse().map_err(|_| invalid())?;

    let units: i64 = units_str.parse().map_err(|_| overflow())?;
    let mut total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;
    if rounds_up(extra, total) {
        total = total.checked_add(1).ok_or_else(overflow)?;
    }

    Ok(MoneyCents(if negative { -total } else { total }))
}

/// Half-even on the magnitude: `extra` holds the digits past the cents.
fn rounds_up(extra: &str, cents: i64) -> bool {
    let mut digits = extra.bytes();
    match digits.next() {
        Some(b'6'..=b'9') => true,
        Some(b'5') => digits.any(|d| d != b'0') || cents % 2 == 1,
        _ => false,
    }
}

impl Serialize for MoneyCents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MoneyCents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = MoneyCents;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(100)
            .map(MoneyCents)
            .ok_or_else(|| E::custom(ParseMoneyError::Overflow(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(ParseMoneyError::Overflow(v.to_string())))
            .and_then(|v| self.visit_i64(v))
    }

    // f64's Display is the shortest representation that round-trips, so
    // `12.34` prints back as "12.34" and parses without float drift.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(ParseMoneyError::Invalid(v.to_string())));
        }
        MoneyCents::parse_rounded(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        MoneyCents::parse_rounded(v).map_err(E::custom)
    }
}
