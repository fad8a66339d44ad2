//! Bonus-points scoring for registered high spenders.

use super::record::Money;
use crate::error::{Result, SpendingError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The scoring rule applied when a high spender registers.
///
/// ```text
/// spending < qualifying_threshold  ->  0
/// otherwise                        ->  base_points + floor((spending - qualifying_threshold) / points_per)
/// ```
///
/// The result is a pure, non-decreasing function of the spending amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPolicy {
    /// Minimum spending accepted by registration.
    pub qualifying_threshold: Decimal,
    /// Points granted for reaching the threshold.
    pub base_points: u64,
    /// Spending above the threshold that earns one additional point.
    pub points_per: Decimal,
}

impl Default for BonusPolicy {
    /// One point per 100 currency units, no minimum.
    fn default() -> Self {
        Self {
            qualifying_threshold: Decimal::ZERO,
            base_points: 0,
            points_per: dec!(100),
        }
    }
}

impl BonusPolicy {
    pub fn new(
        qualifying_threshold: Decimal,
        base_points: u64,
        points_per: Decimal,
    ) -> Result<Self> {
        let policy = Self {
            qualifying_threshold,
            base_points,
            points_per,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Qualify at 1499, one point for qualifying plus one per 2000 beyond it.
    pub fn tiered() -> Self {
        Self {
            qualifying_threshold: dec!(1499),
            base_points: 1,
            points_per: dec!(2000),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.points_per <= Decimal::ZERO {
            return Err(SpendingError::InvalidArgument(
                "points_per must be positive".to_string(),
            ));
        }
        if self.qualifying_threshold.is_sign_negative() && !self.qualifying_threshold.is_zero() {
            return Err(SpendingError::InvalidArgument(
                "qualifying_threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn qualifies(&self, spending: Money) -> bool {
        spending.value() >= self.qualifying_threshold
    }

    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn bonus_points(&self, spending: Money) -> u64 {
        if !self.qualifies(spending) {
            return 0;
        }
        let excess = spending.value() - self.qualifying_threshold;
        let extra = excess
            .checked_div(self.points_per)
            .map(|tiers| tiers.floor().to_u64().unwrap_or(u64::MAX))
            .unwrap_or(u64::MAX);
        self.base_points.saturating_add(extra)
    }
}
