use crate::error::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of fractional digits every stored balance carries.
pub const STORED_SCALE: u32 = 2;

/// Largest number of fractional digits a [`Decimal`] can hold exactly.
const MAX_INPUT_SCALE: usize = 28;

/// An exact decimal amount of currency.
///
/// Arithmetic keeps full precision; [`Money::to_stored`] is the single place
/// where values are rounded, and it is applied right before a balance is
/// written back to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses a textual amount of the form `[+-]digits[.digits]`.
    ///
    /// Only `.` is accepted as the decimal separator. Digit separators,
    /// exponents and inputs that `Decimal` could only hold after rounding are
    /// rejected, so the parsed value always equals the text exactly.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedAmount(text.to_string());
        let fraction_digits = plain_fraction_digits(text).ok_or_else(malformed)?;
        if fraction_digits > MAX_INPUT_SCALE {
            return Err(malformed());
        }
        let value = Decimal::from_str(text).map_err(|_| malformed())?;
        if value.scale() as usize != fraction_digits {
            return Err(malformed());
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn less_than(&self, other: Money) -> bool {
        self.0 < other.0
    }

    /// Rounds half-up to two fractional digits and pins the scale, so that
    /// `1000` renders as `1000.00`.
    pub fn to_stored(self) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(STORED_SCALE);
        Self(rounded)
    }
}

/// Number of fractional digits in `text` when it matches `[+-]digits[.digits]`.
fn plain_fraction_digits(text: &str) -> Option<usize> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    if unsigned.contains('.') && fraction.is_empty() {
        return None;
    }
    Some(fraction.len())
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
