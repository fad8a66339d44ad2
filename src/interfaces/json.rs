//! Typed request and response bodies for the presentation layer.
//!
//! Requests are parsed strictly: unknown fields and wrongly typed values are
//! rejected as `InvalidInput` before anything reaches the service.

use crate::domain::record::{Money, SpendingRecord, UserId};
use crate::error::{ErrorKind, Result, SpendingError};
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| SpendingError::InvalidInput(e.to_string()))
}

/// Accepts a JSON number only; quoted amounts are a type error.
fn json_number<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = serde_json::Number::deserialize(deserializer)?.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(D::Error::custom)
}

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct LookupRequest {
    pub user_id: i64,
}

impl LookupRequest {
    pub fn validate(&self) -> Result<UserId> {
        UserId::try_from(self.user_id)
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct TopSpendersRequest {
    #[serde(default)]
    pub n: Option<i64>,
}

impl TopSpendersRequest {
    pub fn validate(&self) -> Result<Option<usize>> {
        match self.n {
            None => Ok(None),
            Some(n) if n > 0 => usize::try_from(n)
                .map(Some)
                .map_err(|_| SpendingError::InvalidArgument(format!("n is too large: {}", n))),
            Some(n) => Err(SpendingError::InvalidArgument(format!(
                "n must be a positive integer, got {}",
                n
            ))),
        }
    }
}

/// Body of a high-spender registration.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct RegistrationRequest {
    pub user_id: i64,
    #[serde(deserialize_with = "json_number")]
    pub total_spending: Decimal,
}

impl RegistrationRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        parse(body)
    }

    pub fn validate(&self) -> Result<(UserId, Money)> {
        let user_id = UserId::try_from(self.user_id)?;
        let total_spending = Money::new(self.total_spending)?;
        Ok((user_id, total_spending))
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct RegistrationResponse {
    pub record: SpendingRecord,
    pub bonus_points: u64,
}

impl From<(SpendingRecord, u64)> for RegistrationResponse {
    fn from((record, bonus_points): (SpendingRecord, u64)) -> Self {
        Self {
            record,
            bonus_points,
        }
    }
}

/// Structured failure returned in place of a result.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SpendingError> for ErrorBody {
    fn from(err: &SpendingError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
