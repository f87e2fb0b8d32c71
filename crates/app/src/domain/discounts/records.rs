//! Discount Code Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    domain::discounts::{data::NewDiscountCode, errors::DiscountCodeError},
    uuids::TypedUuid,
};

/// Discount Code UUID
pub type DiscountCodeUuid = TypedUuid<DiscountCode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountKind {
    Fixed,
    Percentage,
}

impl DiscountKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKind {
    type Err = DiscountCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fixed" => Ok(Self::Fixed),
            "percentage" => Ok(Self::Percentage),
            other => Err(DiscountCodeError::UnknownKind(other.to_string())),
        }
    }
}

/// A validated discount amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountValue {
    /// Flat amount in minor units.
    Fixed(u64),
    /// Percentage of the cart subtotal, in `(0, 100]`.
    Percentage(Decimal),
}

impl DiscountValue {
    /// Validate a raw value against its discount kind.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is not positive, when a percentage
    /// exceeds 100, or when a fixed amount is not a whole number of minor units.
    pub fn new(kind: DiscountKind, value: Decimal) -> Result<Self, DiscountCodeError> {
        if value <= Decimal::ZERO {
            return Err(DiscountCodeError::NonPositiveValue);
        }

        match kind {
            DiscountKind::Percentage if value > Decimal::ONE_HUNDRED => {
                Err(DiscountCodeError::PercentageOutOfRange(value))
            }
            DiscountKind::Percentage => Ok(Self::Percentage(value)),
            DiscountKind::Fixed => {
                if !value.fract().is_zero() {
                    return Err(DiscountCodeError::FractionalFixedValue(value));
                }

                value
                    .to_u64()
                    .map(Self::Fixed)
                    .ok_or(DiscountCodeError::FractionalFixedValue(value))
            }
        }
    }

    #[must_use]
    pub const fn kind(self) -> DiscountKind {
        match self {
            Self::Fixed(_) => DiscountKind::Fixed,
            Self::Percentage(_) => DiscountKind::Percentage,
        }
    }

    /// The raw value as stored: minor units or percent.
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        match self {
            Self::Fixed(amount) => Decimal::from(amount),
            Self::Percentage(percent) => percent,
        }
    }

    /// Amount this discount takes off the given subtotal, in minor units.
    ///
    /// Percentages are always taken from the undiscounted subtotal.
    #[must_use]
    pub fn contribution(self, subtotal: u64) -> u64 {
        match self {
            Self::Fixed(amount) => amount,
            Self::Percentage(percent) => percent_of_minor(percent, subtotal),
        }
    }
}

fn percent_of_minor(percent: Decimal, minor: u64) -> u64 {
    Decimal::from(minor)
        .checked_mul(percent)
        .and_then(|applied| applied.checked_div(Decimal::ONE_HUNDRED))
        .map(|applied| applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        // percent <= 100, so the result never exceeds `minor`
        .unwrap_or(minor)
}

/// Discount Code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountCode {
    pub uuid: DiscountCodeUuid,
    pub code: String,
    pub value: DiscountValue,
    pub expiration_date: Timestamp,
    pub is_active: bool,
}

impl DiscountCode {
    /// Validate and build a new discount code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is blank, the value is invalid for its
    /// kind, or the expiration date is not strictly after `now`.
    pub fn new(data: NewDiscountCode, now: Timestamp) -> Result<Self, DiscountCodeError> {
        let code = data.code.trim();

        if code.is_empty() {
            return Err(DiscountCodeError::EmptyCode);
        }

        let value = DiscountValue::new(data.kind, data.value)?;

        if data.expiration_date <= now {
            return Err(DiscountCodeError::ExpirationNotInFuture);
        }

        Ok(Self {
            uuid: data.uuid,
            code: code.to_string(),
            value,
            expiration_date: data.expiration_date,
            is_active: data.is_active,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        self.value.kind()
    }

    /// Switched on and not yet expired at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.is_active && self.expiration_date > now
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    fn new_code(kind: DiscountKind, value: Decimal) -> NewDiscountCode {
        NewDiscountCode {
            uuid: DiscountCodeUuid::new(),
            code: "SAVE10".to_string(),
            kind,
            value,
            expiration_date: Timestamp::now() + SignedDuration::from_hours(24),
            is_active: true,
        }
    }

    #[test]
    fn builds_valid_percentage_code() -> TestResult {
        let code = DiscountCode::new(
            new_code(DiscountKind::Percentage, Decimal::from(10)),
            Timestamp::now(),
        )?;

        assert_eq!(code.kind(), DiscountKind::Percentage);
        assert!(code.is_active_at(Timestamp::now()));

        Ok(())
    }

    #[test]
    fn trims_code() -> TestResult {
        let mut data = new_code(DiscountKind::Fixed, Decimal::from(500));
        data.code = "  SAVE5 ".to_string();

        let code = DiscountCode::new(data, Timestamp::now())?;

        assert_eq!(code.code, "SAVE5");
        assert_eq!(code.value, DiscountValue::Fixed(500));

        Ok(())
    }

    #[test]
    fn rejects_blank_code() {
        let mut data = new_code(DiscountKind::Fixed, Decimal::from(500));
        data.code = "   ".to_string();

        assert_eq!(
            DiscountCode::new(data, Timestamp::now()),
            Err(DiscountCodeError::EmptyCode)
        );
    }

    #[test]
    fn rejects_non_positive_values() {
        for value in [Decimal::ZERO, Decimal::from(-5)] {
            assert_eq!(
                DiscountValue::new(DiscountKind::Fixed, value),
                Err(DiscountCodeError::NonPositiveValue)
            );
            assert_eq!(
                DiscountValue::new(DiscountKind::Percentage, value),
                Err(DiscountCodeError::NonPositiveValue)
            );
        }
    }

    #[test]
    fn rejects_percentage_above_one_hundred() {
        let value = Decimal::new(1001, 1);

        assert_eq!(
            DiscountValue::new(DiscountKind::Percentage, value),
            Err(DiscountCodeError::PercentageOutOfRange(value))
        );
        assert!(DiscountValue::new(DiscountKind::Percentage, Decimal::ONE_HUNDRED).is_ok());
    }

    #[test]
    fn rejects_fractional_fixed_amount() {
        let value = Decimal::new(4995, 2);

        assert_eq!(
            DiscountValue::new(DiscountKind::Fixed, value),
            Err(DiscountCodeError::FractionalFixedValue(value))
        );
    }

    #[test]
    fn rejects_expiration_in_the_past_or_now() {
        let now = Timestamp::now();
        let mut data = new_code(DiscountKind::Fixed, Decimal::from(100));
        data.expiration_date = now;

        assert_eq!(
            DiscountCode::new(data, now),
            Err(DiscountCodeError::ExpirationNotInFuture)
        );
    }

    #[test]
    fn activity_is_evaluated_against_the_given_instant() -> TestResult {
        let now = Timestamp::now();
        let code = DiscountCode::new(new_code(DiscountKind::Fixed, Decimal::from(100)), now)?;

        assert!(code.is_active_at(now));
        assert!(!code.is_active_at(code.expiration_date));
        assert!(!code.is_active_at(code.expiration_date + SignedDuration::from_secs(1)));

        let switched_off = DiscountCode {
            is_active: false,
            ..code
        };

        assert!(!switched_off.is_active_at(now));

        Ok(())
    }

    #[test]
    fn percentage_contribution_rounds_half_away_from_zero() {
        let value = DiscountValue::Percentage(Decimal::new(125, 1));

        // 12.5% of 1_00 = 12.5 -> 13
        assert_eq!(value.contribution(100), 13);
        assert_eq!(value.contribution(0), 0);
        assert_eq!(DiscountValue::Percentage(Decimal::from(10)).contribution(90_00), 9_00);
    }

    #[test]
    fn fixed_contribution_is_flat() {
        assert_eq!(DiscountValue::Fixed(5_00).contribution(90_00), 5_00);
        assert_eq!(DiscountValue::Fixed(5_00).contribution(1_00), 5_00);
    }
}
