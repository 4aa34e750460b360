//! Per-block emission engine.
//!
//! [`process_block`] is a pure function of `(height, params, state)`. It never
//! touches a ledger; it returns the next state together with the transfers the
//! keeper must settle.

use crate::params::{Params, DECIMAL_PRECISION};
use crate::vesting::VestingMonthInfo;
use furya_ledger::{COMMUNITY_POOL_NAME, FEE_COLLECTOR_NAME};
use furya_types::{Address, Coin};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Mutable emission state, rewritten once per block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionState {
    /// Current per-block emission rate.
    pub block_provisions: Decimal,
    /// Height of the latest reduction event; 0 until the reduction clock is anchored.
    pub last_reduction_block_num: u64,
    pub vesting_month_info: VestingMonthInfo,
}

impl EmissionState {
    /// Initial state for a chain starting with `params`.
    pub fn genesis(params: &Params, vesting_month_info: VestingMonthInfo) -> Self {
        Self {
            block_provisions: params.genesis_block_provisions,
            last_reduction_block_num: 0,
            vesting_month_info,
        }
    }
}

/// What a transfer pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allocation {
    GrantsProgram,
    CommunityPool,
    UsageIncentive,
    Staking,
    DeveloperRewards,
    DeveloperVesting { month: u64 },
}

/// Where a transfer lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Account(Address),
    Module(String),
}

/// A single payout out of the mint module account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    pub allocation: Allocation,
    pub recipient: Recipient,
    pub amount: Coin,
}

/// Outcome of processing one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEmission {
    pub height: u64,
    pub state: EmissionState,
    /// Pools first, then vesting payouts in receiver order.
    pub transfers: Vec<TransferInstruction>,
    pub reduced: bool,
}

impl BlockEmission {
    /// Total amount to mint so that every transfer can be settled.
    pub fn total_minted(&self) -> u128 {
        self.transfers
            .iter()
            .fold(0u128, |acc, t| acc.saturating_add(t.amount.amount))
    }

    /// Sum of transfers for one allocation kind.
    pub fn allocated(&self, allocation: Allocation) -> u128 {
        self.transfers
            .iter()
            .filter(|t| t.allocation == allocation)
            .fold(0u128, |acc, t| acc.saturating_add(t.amount.amount))
    }

    /// Sum of vesting payouts made to `address` by this block.
    pub fn vested_to(&self, address: &Address) -> u128 {
        self.transfers
            .iter()
            .filter(|t| {
                matches!(t.allocation, Allocation::DeveloperVesting { .. })
                    && t.recipient == Recipient::Account(*address)
            })
            .fold(0u128, |acc, t| acc.saturating_add(t.amount.amount))
    }
}

/// Truncate a non-negative decimal to whole base units.
pub fn truncate_amount(value: Decimal) -> u128 {
    // `value` is a share of non-negative provisions and always fits.
    value.trunc().to_u128().unwrap_or(0)
}

/// Apply the reduction schedule for `height`. Returns true when provisions shrank.
///
/// The first eligible block only anchors the reduction clock.
pub fn apply_reduction(height: u64, params: &Params, state: &mut EmissionState) -> bool {
    if state.last_reduction_block_num == 0 {
        state.last_reduction_block_num = height;
        debug!(target: "mint", "reduction clock anchored at height {}", height);
        return false;
    }

    if height.saturating_sub(state.last_reduction_block_num) < params.reduction_period_in_blocks {
        return false;
    }

    let previous = state.block_provisions;
    // truncation keeps provisions non-increasing for any factor in [0, 1]
    state.block_provisions = (previous * params.reduction_factor)
        .round_dp_with_strategy(DECIMAL_PRECISION, RoundingStrategy::ToZero);
    state.last_reduction_block_num = height;
    info!(
        target: "mint",
        "block provisions reduced at height {}: {} -> {}",
        height,
        previous,
        state.block_provisions
    );
    true
}

/// Split `provisions` across the five destinations, dropping fractional remainders.
pub fn distribution_transfers(params: &Params, provisions: Decimal) -> Vec<TransferInstruction> {
    let shares = &params.distribution_proportions;
    let legs = [
        (
            Allocation::GrantsProgram,
            shares.grants_program,
            Recipient::Account(params.grants_program_address),
        ),
        (
            Allocation::CommunityPool,
            shares.community_pool,
            Recipient::Module(COMMUNITY_POOL_NAME.to_string()),
        ),
        (
            Allocation::UsageIncentive,
            shares.usage_incentive,
            Recipient::Account(params.usage_incentive_address),
        ),
        (
            Allocation::Staking,
            shares.staking,
            Recipient::Module(FEE_COLLECTOR_NAME.to_string()),
        ),
        (
            Allocation::DeveloperRewards,
            shares.developer_rewards,
            Recipient::Account(params.team_reserve_address),
        ),
    ];

    legs.into_iter()
        .filter_map(|(allocation, share, recipient)| {
            let amount = truncate_amount(provisions * share);
            (amount > 0).then(|| TransferInstruction {
                allocation,
                recipient,
                amount: Coin::new(params.mint_denom.clone(), amount),
            })
        })
        .collect()
}

/// Literal table payouts for every month in `months`, month-major, receiver order within a month.
pub fn vesting_transfers(params: &Params, months: RangeInclusive<u64>) -> Vec<TransferInstruction> {
    let receivers = &params.weighted_developer_rewards_receivers;
    let schedule_end = crate::vesting::schedule_length(receivers);
    let (first, last) = (*months.start(), (*months.end()).min(schedule_end));

    let mut transfers = Vec::new();
    for month in first..=last {
        for receiver in receivers {
            let amount = receiver.amount_for_month(month);
            if amount == 0 {
                continue;
            }
            transfers.push(TransferInstruction {
                allocation: Allocation::DeveloperVesting { month },
                recipient: Recipient::Account(receiver.address),
                amount: Coin::new(params.mint_denom.clone(), amount),
            });
        }
    }
    transfers
}

/// Run the emission schedule for one block.
pub fn process_block(height: u64, params: &Params, state: &EmissionState) -> BlockEmission {
    let mut next = state.clone();

    if height < params.minting_rewards_distribution_start_block {
        return BlockEmission {
            height,
            state: next,
            transfers: Vec::new(),
            reduced: false,
        };
    }

    let reduced = apply_reduction(height, params, &mut next);
    let months_entered = next.vesting_month_info.advance(height);

    let mut transfers = distribution_transfers(params, next.block_provisions);
    transfers.extend(vesting_transfers(params, months_entered));

    let emission = BlockEmission {
        height,
        state: next,
        transfers,
        reduced,
    };
    debug!(
        target: "mint",
        "height {}: provisions {}, minting {} across {} transfers",
        height,
        emission.state.block_provisions,
        emission.total_minted(),
        emission.transfers.len()
    );
    emission
}
