use crate::error::{Result, SpendingError};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A positive user identifier, the unique key of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UserId(u64);

impl UserId {
    pub fn new(value: u64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(SpendingError::InvalidInput(
                "user_id must be a positive integer".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for UserId {
    type Error = SpendingError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for UserId {
    type Error = SpendingError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map_err(|_| {
                SpendingError::InvalidInput("user_id must be a positive integer".to_string())
            })
            .and_then(Self::new)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative currency amount.
///
/// Wraps `rust_decimal::Decimal` so that negative spending can never be
/// constructed, deserialized or stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            Err(SpendingError::InvalidInput(
                "total_spending must be a non-negative number".to_string(),
            ))
        } else {
            Ok(Self(value.abs()))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Sum of two amounts, `InvalidInput` when it exceeds the decimal range.
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or_else(|| {
            SpendingError::InvalidInput("total_spending exceeds the supported range".to_string())
        })
    }
}

impl TryFrom<Decimal> for Money {
    type Error = SpendingError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's spending record as held by the record store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SpendingRecord {
    pub user_id: UserId,
    /// Absent for users registered through the high-spender path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub total_spending: Money,
    /// Derived from `total_spending` at registration; never user-supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<u64>,
}

impl SpendingRecord {
    pub fn new(user_id: UserId, total_spending: Money) -> Self {
        Self {
            user_id,
            age: None,
            total_spending,
            bonus_points: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Result<Self> {
        if age == 0 {
            return Err(SpendingError::InvalidInput(
                "age must be a positive integer".to_string(),
            ));
        }
        self.age = Some(age);
        Ok(self)
    }

    pub fn is_high_spender(&self) -> bool {
        self.bonus_points.is_some()
    }
}

/// One imported spending line; several entries may belong to the same user.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct SpendingEntry {
    pub user_id: UserId,
    #[serde(default, deserialize_with = "positive_age")]
    pub age: Option<u32>,
    pub amount: Money,
}

fn positive_age<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u32>::deserialize(deserializer)? {
        Some(0) => Err(D::Error::custom("age must be a positive integer")),
        age => Ok(age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::new(1).is_ok());
        assert!(matches!(UserId::new(0), Err(SpendingError::InvalidInput(_))));
        assert!(UserId::try_from(-5i64).is_err());
        assert_eq!(UserId::try_from(7i64).unwrap().value(), 7);
    }

    #[test]
    fn test_money_validation() {
        assert!(Money::new(dec!(0)).is_ok());
        assert!(Money::new(dec!(-0.00)).is_ok());
        assert!(Money::new(dec!(12.50)).is_ok());
        assert!(matches!(
            Money::new(dec!(-0.01)),
            Err(SpendingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_money_addition() {
        let a = Money::new(dec!(100.0)).unwrap();
        let b = Money::new(dec!(150.0)).unwrap();
        assert_eq!(a.checked_add(b).unwrap().value(), dec!(250.0));
    }

    #[test]
    fn test_money_addition_overflow_is_invalid_input() {
        let max = Money::new(Decimal::MAX).unwrap();
        assert!(matches!(
            max.checked_add(max),
            Err(SpendingError::InvalidInput(_))
        ));
        assert_eq!(max.checked_add(Money::ZERO).unwrap(), max);
    }

    #[test]
    fn test_record_rejects_zero_age() {
        let record = SpendingRecord::new(UserId::new(1).unwrap(), Money::ZERO);
        assert!(record.clone().with_age(0).is_err());
        assert_eq!(record.with_age(30).unwrap().age, Some(30));
    }

    #[test]
    fn test_record_deserialization_rejects_negative_spending() {
        let json = r#"{"user_id": 1, "total_spending": "-3.00"}"#;
        assert!(serde_json::from_str::<SpendingRecord>(json).is_err());

        let json = r#"{"user_id": 0, "total_spending": "3.00"}"#;
        assert!(serde_json::from_str::<SpendingRecord>(json).is_err());
    }

    #[test]
    fn test_record_serialization_omits_missing_fields() {
        let record =
            SpendingRecord::new(UserId::new(5).unwrap(), Money::new(dec!(250.00)).unwrap());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"user_id":5,"total_spending":"250.00"}"#);

        let back: SpendingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
