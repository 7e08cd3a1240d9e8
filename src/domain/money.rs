use std::fmt;
use std::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::LedgerError;

/// A monetary quantity with a fixed two-decimal rounding policy.
///
/// Arithmetic runs at full `Decimal` precision; rounding happens once, at
/// the point a value is stored or displayed, never in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Parse user-entered amount text.
    ///
    /// Surrounding whitespace is trimmed and the first comma, if any, is
    /// treated as the decimal point, so `"12,50"` and `"12.50"` are the
    /// same amount.
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        let trimmed = text.trim();
        trimmed
            .replacen(',', ".", 1)
            .parse::<Decimal>()
            .map(Money)
            .map_err(|_| LedgerError::InvalidAmount(trimmed.to_string()))
    }

    /// Round half away from zero at two decimal places.
    pub fn rounded(self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.rounded().0;
        // rescale pads trailing zeros so "5" renders as "5.00"
        value.rescale(2);
        write!(f, "{}", value)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Decimal>()
            .map(Money)
            .map_err(|_| serde::de::Error::custom(format!("invalid money value: {}", s)))
    }
}
