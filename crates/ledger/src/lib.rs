//! Furya account ledger
//!
//! Provides the account/balance interface consumed by the mint end-blocker and
//! the fee ante handler. Implementations only supply storage primitives; the
//! transfer, account creation and minting rules are provided methods so every
//! backend (including the cache overlay) applies them identically.

pub mod cache;
pub mod memory;

pub use cache::{CacheLedger, WriteSet};
pub use memory::InMemoryLedger;

use furya_types::{Address, CoinError, Coins};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Module account receiving transaction fees and staking rewards.
pub const FEE_COLLECTOR_NAME: &str = "fee_collector";
/// Module account that newly minted coins are credited to.
pub const MINT_MODULE_NAME: &str = "mint";
/// Module account backing the community pool.
pub const COMMUNITY_POOL_NAME: &str = "distribution";

/// Minimal account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub sequence: u64,
}

impl Account {
    /// A freshly materialized account with no history.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            sequence: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: {address} holds {available}{denom}, requires {required}{denom}")]
    InsufficientFunds {
        address: Address,
        denom: String,
        available: u128,
        required: u128,
    },
    #[error("module account {0} has not been set")]
    UnknownModule(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] CoinError),
    #[error("arithmetic overflow crediting {denom} to {address}")]
    Overflow { address: Address, denom: String },
}

/// Interface for account ledger operations.
pub trait Ledger {
    fn get_account(&self, address: &Address) -> Option<Account>;

    fn set_account(&mut self, account: Account);

    fn get_module_address(&self, name: &str) -> Option<Address>;

    fn balance(&self, address: &Address, denom: &str) -> u128;

    fn set_balance(&mut self, address: &Address, denom: &str, amount: u128);

    fn supply(&self, denom: &str) -> u128;

    fn set_supply(&mut self, denom: &str, amount: u128);

    fn has_account(&self, address: &Address) -> bool {
        self.get_account(address).is_some()
    }

    /// Materialize a minimal account for `address`, replacing nothing if it exists.
    fn create_account(&mut self, address: &Address) -> Account {
        if let Some(existing) = self.get_account(address) {
            return existing;
        }
        let account = Account::new(*address);
        self.set_account(account.clone());
        account
    }

    /// Move `amount` from one address to another. Either every coin moves or none does.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<(), LedgerError> {
        amount.validate()?;

        for coin in amount {
            let available = self.balance(from, &coin.denom);
            if available < coin.amount {
                return Err(LedgerError::InsufficientFunds {
                    address: *from,
                    denom: coin.denom.clone(),
                    available,
                    required: coin.amount,
                });
            }
        }
        if from == to {
            return Ok(());
        }

        let mut credits = Vec::with_capacity(amount.len());
        for coin in amount {
            let credited = self
                .balance(to, &coin.denom)
                .checked_add(coin.amount)
                .ok_or_else(|| LedgerError::Overflow {
                    address: *to,
                    denom: coin.denom.clone(),
                })?;
            credits.push(credited);
        }

        if !self.has_account(to) {
            self.create_account(to);
        }
        for (coin, credited) in amount.iter().zip(credits) {
            let debited = self.balance(from, &coin.denom) - coin.amount;
            self.set_balance(from, &coin.denom, debited);
            self.set_balance(to, &coin.denom, credited);
        }
        Ok(())
    }

    fn send_from_module(
        &mut self,
        module: &str,
        to: &Address,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        let from = self
            .get_module_address(module)
            .ok_or_else(|| LedgerError::UnknownModule(module.to_string()))?;
        self.transfer(&from, to, amount)
    }

    fn send_to_module(
        &mut self,
        from: &Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), LedgerError> {
        let to = self
            .get_module_address(module)
            .ok_or_else(|| LedgerError::UnknownModule(module.to_string()))?;
        self.transfer(from, &to, amount)
    }

    /// Create new coins in a module account, increasing total supply.
    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), LedgerError> {
        amount.validate()?;
        let address = self
            .get_module_address(module)
            .ok_or_else(|| LedgerError::UnknownModule(module.to_string()))?;

        for coin in amount {
            let overflow = || LedgerError::Overflow {
                address,
                denom: coin.denom.clone(),
            };
            let balance = self
                .balance(&address, &coin.denom)
                .checked_add(coin.amount)
                .ok_or_else(overflow)?;
            let supply = self
                .supply(&coin.denom)
                .checked_add(coin.amount)
                .ok_or_else(overflow)?;
            self.set_balance(&address, &coin.denom, balance);
            self.set_supply(&coin.denom, supply);
        }
        debug!(target: "ledger", "minted {} into module {}", amount, module);
        Ok(())
    }

    /// Open an isolated copy-on-write view over this ledger.
    ///
    /// Writes made through the view stay in the view; they reach this ledger
    /// only through [`CacheLedger::into_write_set`] and [`WriteSet::apply_to`].
    fn fork(&self) -> CacheLedger<'_, Self>
    where
        Self: Sized,
    {
        CacheLedger::new(self)
    }
}
