//! Engine configuration.
//!
//! [`EngineConfig`] is passed explicitly into the service; the CLI builds it
//! from [`EngineArgs`], which also reads `SPENDING_*` environment variables.

use crate::domain::aggregation::{AgeBand, default_age_bands, validate_age_bands};
use crate::domain::bonus::BonusPolicy;
use crate::domain::ranking::DEFAULT_TOP_N;
use crate::error::{Result, SpendingError};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub bonus: BonusPolicy,
    /// Count used by the top-spenders view when the caller gives none.
    pub default_top_n: usize,
    pub age_bands: Vec<AgeBand>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bonus: BonusPolicy::default(),
            default_top_n: DEFAULT_TOP_N,
            age_bands: default_age_bands(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.bonus.validate()?;
        if self.default_top_n == 0 {
            return Err(SpendingError::InvalidArgument(
                "default_top_n must be positive".to_string(),
            ));
        }
        validate_age_bands(&self.age_bands)
    }
}

/// Engine settings accepted on the command line.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Minimum total spending accepted by high-spender registration
    #[arg(long, env = "SPENDING_BONUS_THRESHOLD", default_value = "0")]
    pub bonus_threshold: Decimal,

    /// Points granted for reaching the threshold
    #[arg(long, env = "SPENDING_BONUS_BASE", default_value_t = 0)]
    pub bonus_base: u64,

    /// Spending above the threshold that earns one more point
    #[arg(long, env = "SPENDING_BONUS_PER", default_value = "100")]
    pub bonus_per: Decimal,

    /// Use the tiered policy (qualify at 1499, +1 per 2000) instead of the flags above
    #[arg(long, conflicts_with_all = ["bonus_threshold", "bonus_base", "bonus_per"])]
    pub tiered_bonus: bool,

    /// Default number of entries in the top-spenders view
    #[arg(long, env = "SPENDING_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

impl TryFrom<EngineArgs> for EngineConfig {
    type Error = SpendingError;

    fn try_from(args: EngineArgs) -> Result<Self> {
        let bonus = if args.tiered_bonus {
            BonusPolicy::tiered()
        } else {
            BonusPolicy::new(args.bonus_threshold, args.bonus_base, args.bonus_per)?
        };
        let config = EngineConfig {
            bonus,
            default_top_n: args.top_n,
            ..EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> EngineArgs {
        EngineArgs {
            bonus_threshold: Decimal::ZERO,
            bonus_base: 0,
            bonus_per: dec!(100),
            tiered_bonus: false,
            top_n: DEFAULT_TOP_N,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_top_n, 100);
        assert_eq!(config.bonus, BonusPolicy::default());
    }

    #[test]
    fn test_args_into_config() {
        let config = EngineConfig::try_from(args()).unwrap();
        assert_eq!(config, EngineConfig::default());

        let tiered = EngineConfig::try_from(EngineArgs {
            tiered_bonus: true,
            ..args()
        })
        .unwrap();
        assert_eq!(tiered.bonus, BonusPolicy::tiered());
    }

    #[test]
    fn test_invalid_args_rejected() {
        let zero_per = EngineArgs {
            bonus_per: Decimal::ZERO,
            ..args()
        };
        assert!(matches!(
            EngineConfig::try_from(zero_per),
            Err(SpendingError::InvalidArgument(_))
        ));

        let zero_top = EngineArgs { top_n: 0, ..args() };
        assert!(EngineConfig::try_from(zero_top).is_err());
    }
}
