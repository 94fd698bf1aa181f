use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, totals, goals) to avoid floating-point drift. The unit is
/// currency-agnostic: two fraction digits, no symbol.
///
/// Stored transaction amounts are never negative, but derived values such as
/// net profit can be.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Largest amount a single transaction or goal may carry.
    pub const MAX_ENTRY: MoneyCents = MoneyCents(10_000_000_000_000);

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

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Divides by `divisor`, rounding half away from zero.
    ///
    /// Returns zero when `divisor` is zero.
    #[must_use]
    pub fn div_round(self, divisor: u64) -> MoneyCents {
        if divisor == 0 {
            return MoneyCents::ZERO;
        }
        let divisor = i128::from(divisor);
        let value = i128::from(self.0);
        let half = divisor / 2;
        let rounded = if value >= 0 {
            (value + half) / divisor
        } else {
            (value - half) / divisor
        };
        // |rounded| <= |value|, so it always fits back in i64.
        MoneyCents(rounded as i64)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        f.pad(&format!("{sign}{units}.{cents:02}"))
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
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
    type Err = ValidationError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hundredths(s)
            .map(MoneyCents)
            .map_err(|reason| ValidationError::InvalidAmount(reason.to_string()))
    }
}

/// Fuel volume in hundredths of a liter.
///
/// Always non-negative; parsing rejects a leading `-`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Liters(u32);

impl Liters {
    #[must_use]
    pub const fn from_centiliters(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn centiliters(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Liters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Liters {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidLiters(reason.to_string());
        let value = parse_hundredths(s).map_err(invalid)?;
        if value < 0 {
            return Err(invalid("liters must be >= 0"));
        }
        u32::try_from(value)
            .map(Liters)
            .map_err(|_| invalid("value too large"))
    }
}

/// Parses a decimal with at most two fraction digits into hundredths.
fn parse_hundredths(s: &str) -> Result<i64, &'static str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("empty value");
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err("empty value");
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let units_str = parts.next().ok_or("invalid number")?;
    let frac_str = parts.next();

    if parts.next().is_some() {
        return Err("invalid number");
    }

    if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err("invalid number");
    }

    let units: i64 = units_str.parse().map_err(|_| "value too large")?;

    let hundredths: i64 = match frac_str {
        None | Some("") => 0,
        Some(frac) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err("invalid number");
            }
            match frac.len() {
                1 => frac.parse::<i64>().map_err(|_| "invalid number")? * 10,
                2 => frac.parse::<i64>().map_err(|_| "invalid number")?,
                _ => return Err("too many decimals"),
            }
        }
    };

    let total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(hundredths))
        .ok_or("value too large")?;

    if negative {
        total.checked_neg().ok_or("value too large")
    } else {
        Ok(total)
    }
}
