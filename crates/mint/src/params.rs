//! Mint module parameters and their validation.

use crate::errors::ParamsError;
use crate::vesting::MonthlyVestingAddress;
use furya_types::{validate_denom, Address, DEFAULT_BOND_DENOM};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fractional digits kept on every persisted decimal product.
pub const DECIMAL_PRECISION: u32 = 18;

/// Blocks per year at a 5 second block time (86400 * 365 / 5).
pub const BLOCKS_PER_YEAR: u64 = 6_307_200;

/// Share of each block's emission routed to every destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionProportions {
    pub grants_program: Decimal,
    pub community_pool: Decimal,
    pub usage_incentive: Decimal,
    pub staking: Decimal,
    pub developer_rewards: Decimal,
}

impl DistributionProportions {
    /// Named shares in distribution order.
    pub fn entries(&self) -> [(&'static str, Decimal); 5] {
        [
            ("grants program", self.grants_program),
            ("community pool", self.community_pool),
            ("usage incentive", self.usage_incentive),
            ("staking", self.staking),
            ("developer rewards", self.developer_rewards),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.entries().iter().map(|(_, share)| *share).sum()
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, share) in self.entries() {
            if share < Decimal::ZERO {
                return Err(ParamsError::NegativeProportion(name));
            }
        }
        let total = self.total();
        if total != Decimal::ONE {
            return Err(ParamsError::ProportionSum(total));
        }
        Ok(())
    }
}

impl Default for DistributionProportions {
    fn default() -> Self {
        Self {
            grants_program: Decimal::new(10, 2),
            community_pool: Decimal::new(10, 2),
            usage_incentive: Decimal::new(25, 2),
            staking: Decimal::new(40, 2),
            developer_rewards: Decimal::new(15, 2),
        }
    }
}

/// Static/on-chain configurable parameters controlling emission & distribution.
///
/// Adjustable only through genesis or a governance-gated update, both of which
/// go through [`Params::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Denomination of every emitted coin.
    pub mint_denom: String,
    /// Per-block emission at genesis.
    pub genesis_block_provisions: Decimal,
    /// Blocks between two reduction events.
    pub reduction_period_in_blocks: u64,
    /// Multiplier applied to block provisions at each reduction event.
    pub reduction_factor: Decimal,
    pub distribution_proportions: DistributionProportions,
    /// Fixed monthly payout table, one entry per developer recipient.
    pub weighted_developer_rewards_receivers: Vec<MonthlyVestingAddress>,
    pub usage_incentive_address: Address,
    pub grants_program_address: Address,
    /// Receives the developer-rewards share of every block.
    pub team_reserve_address: Address,
    /// Height from which emission is distributed. Earlier blocks emit nothing.
    pub minting_rewards_distribution_start_block: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mint_denom: DEFAULT_BOND_DENOM.to_string(),
            // 300 million / 6_307_200 blocks * 10^6
            genesis_block_provisions: Decimal::from(47_000_000u64),
            reduction_period_in_blocks: BLOCKS_PER_YEAR,
            reduction_factor: Decimal::new(6666, 4),
            distribution_proportions: DistributionProportions::default(),
            weighted_developer_rewards_receivers: Vec::new(),
            usage_incentive_address: Address::derive("furya/usage_incentive"),
            grants_program_address: Address::derive("furya/grants_program"),
            team_reserve_address: Address::derive("furya/team_reserve"),
            minting_rewards_distribution_start_block: 0,
        }
    }
}

impl Params {
    /// Validate every field. Returns the first violation found.
    pub fn validate(&self) -> Result<(), ParamsError> {
        validate_mint_denom(&self.mint_denom)?;
        validate_genesis_block_provisions(self.genesis_block_provisions)?;
        validate_reduction_period_in_blocks(self.reduction_period_in_blocks)?;
        validate_reduction_factor(self.reduction_factor)?;
        self.distribution_proportions.validate()?;
        Ok(())
    }
}

fn validate_mint_denom(denom: &str) -> Result<(), ParamsError> {
    if denom.trim().is_empty() {
        return Err(ParamsError::BlankDenom);
    }
    validate_denom(denom)?;
    Ok(())
}

fn validate_genesis_block_provisions(provisions: Decimal) -> Result<(), ParamsError> {
    if provisions < Decimal::ZERO {
        return Err(ParamsError::NegativeGenesisProvisions(provisions));
    }
    validate_provisions_precision(provisions)
}

/// Provisions must fit the fixed 18-digit precision kept across reductions.
pub fn validate_provisions_precision(provisions: Decimal) -> Result<(), ParamsError> {
    if provisions.normalize().scale() > DECIMAL_PRECISION {
        return Err(ParamsError::ExcessProvisionsPrecision(provisions));
    }
    Ok(())
}

fn validate_reduction_period_in_blocks(period: u64) -> Result<(), ParamsError> {
    if period == 0 {
        return Err(ParamsError::NonPositiveReductionPeriod(period));
    }
    Ok(())
}

fn validate_reduction_factor(factor: Decimal) -> Result<(), ParamsError> {
    if factor < Decimal::ZERO || factor > Decimal::ONE {
        return Err(ParamsError::ReductionFactorOutOfRange(factor));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn default_params_are_valid() {
        let params = Params::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.distribution_proportions.total(), Decimal::ONE);
    }

    #[test]
    fn proportions_must_sum_to_one() {
        let mut params = Params::default();
        params.distribution_proportions.staking = dec("0.41");
        assert_eq!(
            params.validate(),
            Err(ParamsError::ProportionSum(dec("1.01")))
        );

        params.distribution_proportions.staking = dec("0.39");
        assert!(matches!(params.validate(), Err(ParamsError::ProportionSum(_))));
    }

    #[test]
    fn negative_proportion_rejected_even_when_sum_is_one() {
        let mut params = Params::default();
        params.distribution_proportions.grants_program = dec("-0.10");
        params.distribution_proportions.staking = dec("0.60");
        assert_eq!(
            params.validate(),
            Err(ParamsError::NegativeProportion("grants program"))
        );
    }

    #[test]
    fn scalar_field_validation() {
        let mut params = Params::default();
        params.mint_denom = "  ".into();
        assert_eq!(params.validate(), Err(ParamsError::BlankDenom));

        let mut params = Params::default();
        params.mint_denom = "9fury".into();
        assert!(matches!(params.validate(), Err(ParamsError::InvalidDenom(_))));

        let mut params = Params::default();
        params.genesis_block_provisions = dec("-1");
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NegativeGenesisProvisions(_))
        ));

        let mut params = Params::default();
        params.genesis_block_provisions = dec("0.0000000000000000015");
        assert!(matches!(
            params.validate(),
            Err(ParamsError::ExcessProvisionsPrecision(_))
        ));
        // trailing zeros past 18 digits do not count
        params.genesis_block_provisions = dec("0.0000000000000000010000");
        assert!(params.validate().is_ok());

        let mut params = Params::default();
        params.reduction_period_in_blocks = 0;
        assert_eq!(
            params.validate(),
            Err(ParamsError::NonPositiveReductionPeriod(0))
        );

        let mut params = Params::default();
        params.reduction_factor = dec("1.0001");
        assert!(matches!(
            params.validate(),
            Err(ParamsError::ReductionFactorOutOfRange(_))
        ));

        params.reduction_factor = Decimal::ONE;
        assert!(params.validate().is_ok());
        params.reduction_factor = Decimal::ZERO;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn params_roundtrip_through_json() {
        let params = Params::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
