use std::{fmt, iter::Sum, ops::Add};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (unit prices,
/// item totals, shares) so that rounding happens exactly once, where the
/// split rules say it happens, and never as binary floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(1_234_56);
/// assert_eq!(amount.minor(), 123456);
/// assert_eq!(amount.to_string(), "1234.56");
/// assert_eq!(amount.format(Currency::Lkr), "LKR 1,234.56");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more decimals than the currency has):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse_major("10", Currency::Lkr).unwrap().minor(), 1000);
/// assert_eq!(Money::parse_major("10,5", Currency::Lkr).unwrap().minor(), 1050);
/// assert!(Money::parse_major("12.345", Currency::Lkr).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow). Bill totals are
    /// accumulated with it, see `Bill::add_item`.
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked multiplication by a quantity (returns `None` on overflow).
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Divides the amount into `parts` equal shares, rounding half away from
    /// zero to the nearest minor unit.
    ///
    /// Returns `None` when `parts` is 0: there is nobody to divide among.
    ///
    /// ```rust
    /// use engine::Money;
    ///
    /// assert_eq!(Money::new(1000).split_even(3), Some(Money::new(333)));
    /// assert_eq!(Money::new(200).split_even(3), Some(Money::new(67)));
    /// assert_eq!(Money::new(5).split_even(2), Some(Money::new(3)));
    /// assert_eq!(Money::new(100).split_even(0), None);
    /// ```
    #[must_use]
    pub fn split_even(self, parts: u32) -> Option<Money> {
        if parts == 0 {
            return None;
        }
        let parts = i64::from(parts);
        let quotient = self.0 / parts;
        let remainder = self.0 % parts;
        // |remainder| < parts <= u32::MAX, doubling cannot overflow.
        if remainder.abs() * 2 >= parts {
            Some(Money(quotient + self.0.signum()))
        } else {
            Some(Money(quotient))
        }
    }

    /// Parses a major-unit decimal string (e.g. `"12.50"`) into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - at most `currency.minor_units()` fractional digits
    /// - rejects empty/invalid strings and overflow
    pub fn parse_major(input: &str, currency: Currency) -> Result<Money, EngineError> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", input.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped.trim_start())
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped.trim_start())
        } else {
            (false, trimmed)
        };
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let digits = usize::from(currency.minor_units());
        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > digits {
                    return Err(EngineError::InvalidAmount("too many decimals".to_string()));
                }
                let padded = format!("{frac:0<digits$}");
                padded.parse().map_err(|_| invalid())?
            }
        };

        let total = major
            .checked_mul(currency.minor_per_major())
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }

    /// Formats the amount with the currency code and grouped thousands,
    /// e.g. `LKR 1,234.56`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = currency.minor_per_major().unsigned_abs();
        let major = abs / per_major;
        let minor = abs % per_major;
        let width = usize::from(currency.minor_units());

        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("{sign}{} {grouped}.{minor:0width$}", currency.code())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}
