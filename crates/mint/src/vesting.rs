//! Monthly developer vesting.
//!
//! The schedule is a read-only table `recipient -> [amount per month]`, indexed
//! by a single chain-wide month counter. Months outside a recipient's table pay
//! nothing; exhaustion is permanent.

use crate::errors::{ParamsError, VestingError};
use furya_types::{Address, MICRO_PER_FURY};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::info;

/// Blocks in one vesting month (one twelfth of a 5-second-block year).
pub const DEFAULT_ONE_MONTH_PERIOD_IN_BLOCKS: u64 = 525_600;

/// One developer recipient and its fixed payout per vesting month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVestingAddress {
    pub address: Address,
    /// `monthly_amounts[m - 1]` is paid when the chain enters month `m`.
    pub monthly_amounts: Vec<u64>,
}

impl MonthlyVestingAddress {
    pub fn new(address: Address, monthly_amounts: Vec<u64>) -> Self {
        Self {
            address,
            monthly_amounts,
        }
    }

    /// Amount owed for 1-based `month`; zero outside the schedule.
    pub fn amount_for_month(&self, month: u64) -> u128 {
        month
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.monthly_amounts.get(index))
            .map(|amount| u128::from(*amount))
            .unwrap_or(0)
    }

    pub fn total(&self) -> u128 {
        self.monthly_amounts
            .iter()
            .fold(0u128, |acc, amount| acc.saturating_add(u128::from(*amount)))
    }
}

/// Number of months after which every recipient's schedule is exhausted.
pub fn schedule_length(receivers: &[MonthlyVestingAddress]) -> u64 {
    receivers
        .iter()
        .map(|r| r.monthly_amounts.len() as u64)
        .max()
        .unwrap_or(0)
}

/// Cursor into the vesting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingMonthInfo {
    /// 1-based month index; 0 until the cursor is initialized.
    pub months_since_genesis: u64,
    /// Height at which the current month started. Meaningful once
    /// `months_since_genesis` is at least 1, which allows a start at height 0.
    pub month_started_block: u64,
    pub one_month_period_in_blocks: u64,
}

impl Default for VestingMonthInfo {
    fn default() -> Self {
        Self {
            months_since_genesis: 0,
            month_started_block: 0,
            one_month_period_in_blocks: DEFAULT_ONE_MONTH_PERIOD_IN_BLOCKS,
        }
    }
}

impl VestingMonthInfo {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.one_month_period_in_blocks == 0 {
            return Err(ParamsError::ZeroMonthPeriod);
        }
        Ok(())
    }

    /// Move the cursor to `height` and return the months entered by this call.
    ///
    /// The first call only initializes the cursor to month 1 at `height`. Later
    /// calls catch up every fully elapsed month, anchoring each new month at the
    /// exact boundary rather than at `height`.
    pub fn advance(&mut self, height: u64) -> RangeInclusive<u64> {
        if self.months_since_genesis == 0 {
            self.month_started_block = height;
            self.months_since_genesis = 1;
            info!(target: "mint", "vesting cursor initialized at height {}", height);
            return 1..=1;
        }

        let period = self.one_month_period_in_blocks;
        let first = self.months_since_genesis.saturating_add(1);
        if period == 0 {
            return first..=self.months_since_genesis;
        }

        let elapsed = height.saturating_sub(self.month_started_block) / period;
        if elapsed == 0 {
            return first..=self.months_since_genesis;
        }

        self.months_since_genesis = self.months_since_genesis.saturating_add(elapsed);
        self.month_started_block = self
            .month_started_block
            .saturating_add(elapsed.saturating_mul(period));
        info!(
            target: "mint",
            "vesting month advanced to {} (+{}) at height {}",
            self.months_since_genesis,
            elapsed,
            height
        );
        first..=self.months_since_genesis
    }
}

/// Parse a monthly vesting table.
///
/// The header row names each recipient by alias; every following row is one
/// month of whole-token decimal amounts, converted to micro units and truncated.
pub fn parse_monthly_vesting(
    csv_data: &str,
    aliases: &HashMap<String, Address>,
) -> Result<Vec<MonthlyVestingAddress>, VestingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let mut receivers = reader
        .headers()?
        .iter()
        .map(|alias| {
            aliases
                .get(alias)
                .map(|address| MonthlyVestingAddress::new(*address, Vec::new()))
                .ok_or_else(|| VestingError::UnknownAlias(alias.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let micro = Decimal::from(MICRO_PER_FURY as u64);
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let month = row + 1;
        for (column, raw) in record.iter().enumerate() {
            let amount: Decimal = raw.parse().map_err(|_| VestingError::InvalidAmount {
                month,
                column,
                value: raw.to_string(),
            })?;
            if amount < Decimal::ZERO {
                return Err(VestingError::InvalidAmount {
                    month,
                    column,
                    value: raw.to_string(),
                });
            }
            let micro_amount = amount
                .checked_mul(micro)
                .and_then(|v| v.trunc().to_u64())
                .ok_or_else(|| VestingError::AmountOverflow {
                    month,
                    value: raw.to_string(),
                })?;
            receivers[column].monthly_amounts.push(micro_amount);
        }
    }

    Ok(receivers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_outside_the_schedule_are_zero() {
        let receiver = MonthlyVestingAddress::new(Address::derive("dev"), vec![50, 60]);
        assert_eq!(receiver.amount_for_month(0), 0);
        assert_eq!(receiver.amount_for_month(1), 50);
        assert_eq!(receiver.amount_for_month(2), 60);
        assert_eq!(receiver.amount_for_month(3), 0);
        assert_eq!(receiver.amount_for_month(u64::MAX), 0);
        assert_eq!(receiver.total(), 110);
    }

    #[test]
    fn first_advance_only_initializes() {
        let mut info = VestingMonthInfo {
            one_month_period_in_blocks: 50,
            ..Default::default()
        };
        assert_eq!(info.advance(50), 1..=1);
        assert_eq!(info.months_since_genesis, 1);
        assert_eq!(info.month_started_block, 50);

        let entered = info.advance(99);
        assert!(entered.is_empty());
        assert_eq!(info.months_since_genesis, 1);
    }

    #[test]
    fn cursor_started_at_height_zero_is_not_reinitialized() {
        let mut info = VestingMonthInfo {
            one_month_period_in_blocks: 100,
            ..Default::default()
        };
        assert_eq!(info.advance(0), 1..=1);
        assert_eq!(info.month_started_block, 0);

        assert!(info.advance(1).is_empty());
        assert!(info.advance(99).is_empty());
        assert_eq!(info.months_since_genesis, 1);

        assert_eq!(info.advance(100), 2..=2);
        assert_eq!(info.month_started_block, 100);
    }

    #[test]
    fn advance_catches_up_elapsed_months() {
        let mut info = VestingMonthInfo {
            months_since_genesis: 1,
            month_started_block: 10,
            one_month_period_in_blocks: 100,
        };

        assert_eq!(info.advance(110), 2..=2);
        assert_eq!(info.month_started_block, 110);

        // two whole months later plus a partial one
        assert_eq!(info.advance(409), 3..=4);
        assert_eq!(info.months_since_genesis, 4);
        assert_eq!(info.month_started_block, 310);
    }

    #[test]
    fn zero_period_never_advances() {
        let mut info = VestingMonthInfo {
            months_since_genesis: 2,
            month_started_block: 5,
            one_month_period_in_blocks: 0,
        };
        assert!(info.advance(1_000_000).is_empty());
        assert_eq!(info.months_since_genesis, 2);
        assert!(info.validate().is_err());
    }

    #[test]
    fn parse_csv_schedule() {
        let aliases: HashMap<String, Address> = [
            ("adress1".to_string(), Address::derive("dev1")),
            ("adress2".to_string(), Address::derive("dev2")),
        ]
        .into_iter()
        .collect();

        let csv_data = "adress1,adress2\n1.5,0\n2.0000009, 3\n";
        let receivers = parse_monthly_vesting(csv_data, &aliases).unwrap();

        assert_eq!(receivers.len(), 2);
        assert_eq!(receivers[0].address, Address::derive("dev1"));
        assert_eq!(receivers[0].monthly_amounts, vec![1_500_000, 2_000_000]);
        assert_eq!(receivers[1].monthly_amounts, vec![0, 3_000_000]);
        assert_eq!(schedule_length(&receivers), 2);
    }

    #[test]
    fn parse_csv_rejects_bad_input() {
        let aliases: HashMap<String, Address> =
            [("a1".to_string(), Address::derive("dev1"))].into_iter().collect();

        assert!(matches!(
            parse_monthly_vesting("a9\n1\n", &aliases),
            Err(VestingError::UnknownAlias(alias)) if alias == "a9"
        ));
        assert!(matches!(
            parse_monthly_vesting("a1\nabc\n", &aliases),
            Err(VestingError::InvalidAmount { month: 1, column: 0, .. })
        ));
        assert!(matches!(
            parse_monthly_vesting("a1\n-4\n", &aliases),
            Err(VestingError::InvalidAmount { .. })
        ));
    }
}
