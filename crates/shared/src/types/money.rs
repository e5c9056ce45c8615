//! Minor-unit amounts and ISO 4217 currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are integers in the smallest currency unit (centimes, cents).
//! Fractional intermediate values (rate products) go through
//! `rust_decimal::Decimal` and are rounded back exactly once.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// A monetary amount expressed in minor currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(pub i64);

impl MinorUnits {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Returns the raw minor-unit count.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition, `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the amount as an exact decimal.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Rounds a decimal to the nearest minor unit, halves rounded up.
    ///
    /// Halves move away from zero, which is round-half-up for the
    /// non-negative values provisioning produces. Returns `None` if the
    /// rounded value does not fit in 64 bits.
    #[must_use]
    pub fn round_half_up(value: Decimal) -> Option<Self> {
        value
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
    }
}

impl Add for MinorUnits {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for MinorUnits {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for MinorUnits {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MinorUnits> for MinorUnits {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<i64> for MinorUnits {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 alphabetic currency code (e.g. "XAF", "XOF", "EUR").
///
/// The engine never converts currencies, so any well-formed code is
/// accepted; the set is not closed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Central African CFA franc.
    #[must_use]
    pub fn xaf() -> Self {
        Self("XAF".to_string())
    }

    /// West African CFA franc.
    #[must_use]
    pub fn xof() -> Self {
        Self("XOF".to_string())
    }

    /// Euro.
    #[must_use]
    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(format!("Unknown currency: {s}"))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_minor_units_sum() {
        let amounts = [MinorUnits(100), MinorUnits(250), MinorUnits(0)];
        assert_eq!(amounts.iter().sum::<MinorUnits>(), MinorUnits(350));
        assert_eq!(
            Vec::<MinorUnits>::new().into_iter().sum::<MinorUnits>(),
            MinorUnits::ZERO
        );
    }

    #[test]
    fn test_minor_units_checked_add_overflow() {
        assert_eq!(MinorUnits(i64::MAX).checked_add(MinorUnits(1)), None);
        assert_eq!(
            MinorUnits(1).checked_add(MinorUnits(2)),
            Some(MinorUnits(3))
        );
    }

    #[test]
    fn test_minor_units_serializes_as_integer() {
        assert_eq!(
            serde_json::to_string(&MinorUnits(10_000_000)).unwrap(),
            "10000000"
        );
    }

    #[rstest]
    #[case(dec!(0), 0)]
    #[case(dec!(2.4), 2)]
    #[case(dec!(2.5), 3)]
    #[case(dec!(3.5), 4)]
    #[case(dec!(2.6), 3)]
    #[case(dec!(5000000.0), 5_000_000)]
    fn test_round_half_up(#[case] value: Decimal, #[case] expected: i64) {
        assert_eq!(MinorUnits::round_half_up(value), Some(MinorUnits(expected)));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(CurrencyCode::from_str("XAF").unwrap(), CurrencyCode::xaf());
        assert_eq!(CurrencyCode::from_str("xof").unwrap(), CurrencyCode::xof());
        assert_eq!(CurrencyCode::from_str(" eur ").unwrap(), CurrencyCode::eur());

        assert!(CurrencyCode::from_str("").is_err());
        assert!(CurrencyCode::from_str("EURO").is_err());
        assert!(CurrencyCode::from_str("E1R").is_err());
    }

    #[test]
    fn test_currency_deserialize_validates() {
        let ok: CurrencyCode = serde_json::from_str("\"xaf\"").unwrap();
        assert_eq!(ok.as_str(), "XAF");
        assert!(serde_json::from_str::<CurrencyCode>("\"FCFA\"").is_err());
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(CurrencyCode::xaf().to_string(), "XAF");
        assert_eq!(CurrencyCode::eur().to_string(), "EUR");
    }
}
