use furya_mint::{Allocation, BlockEmission, EmissionState, Recipient};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals accumulated over a simulated height range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimReport {
    pub start_height: u64,
    pub end_height: u64,
    pub blocks: u64,
    /// Heights at which block provisions were reduced.
    pub reductions: Vec<u64>,
    pub minted: u128,
    pub by_allocation: BTreeMap<&'static str, u128>,
    /// Vesting paid per recipient address.
    pub vested: BTreeMap<String, u128>,
    pub supply: u128,
    pub final_state: Option<EmissionState>,
}

fn label(allocation: Allocation) -> &'static str {
    match allocation {
        Allocation::GrantsProgram => "grants_program",
        Allocation::CommunityPool => "community_pool",
        Allocation::UsageIncentive => "usage_incentive",
        Allocation::Staking => "staking",
        Allocation::DeveloperRewards => "developer_rewards",
        Allocation::DeveloperVesting { .. } => "developer_vesting",
    }
}

impl SimReport {
    pub fn new(start_height: u64, end_height: u64) -> Self {
        Self {
            start_height,
            end_height,
            ..Self::default()
        }
    }

    pub fn record(&mut self, emission: &BlockEmission) {
        self.blocks += 1;
        if emission.reduced {
            self.reductions.push(emission.height);
        }
        for transfer in &emission.transfers {
            let amount = transfer.amount.amount;
            self.minted = self.minted.saturating_add(amount);
            let total = self.by_allocation.entry(label(transfer.allocation)).or_default();
            *total = total.saturating_add(amount);

            if let (Allocation::DeveloperVesting { .. }, Recipient::Account(address)) =
                (transfer.allocation, &transfer.recipient)
            {
                let vested = self.vested.entry(address.to_string()).or_default();
                *vested = vested.saturating_add(amount);
            }
        }
    }

    pub fn finish(mut self, state: EmissionState, supply: u128) -> Self {
        self.final_state = Some(state);
        self.supply = supply;
        self
    }
}
