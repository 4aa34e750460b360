//! Copy-on-try ledger overlay.
//!
//! A [`CacheLedger`] reads through to its base ledger and keeps every write to
//! itself. Dropping it discards the writes; committing goes through an owned
//! [`WriteSet`] so the base borrow is released before the base is mutated.

use crate::{Account, Ledger};
use furya_types::Address;
use std::collections::BTreeMap;

pub struct CacheLedger<'a, L: Ledger + ?Sized> {
    base: &'a L,
    writes: WriteSet,
}

/// Writes collected by a [`CacheLedger`], detached from its base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    accounts: BTreeMap<Address, Account>,
    balances: BTreeMap<(Address, String), u128>,
    supply: BTreeMap<String, u128>,
}

impl<'a, L: Ledger + ?Sized> CacheLedger<'a, L> {
    pub fn new(base: &'a L) -> Self {
        Self {
            base,
            writes: WriteSet::default(),
        }
    }

    /// Detach the pending writes so they can be applied to the base.
    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }

    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }
}

impl WriteSet {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.balances.is_empty() && self.supply.is_empty()
    }

    /// Addresses whose account record was written.
    pub fn touched_accounts(&self) -> impl Iterator<Item = &Address> {
        self.accounts.keys()
    }

    /// Merge every pending write into `base`.
    pub fn apply_to<B: Ledger + ?Sized>(self, base: &mut B) {
        for (_, account) in self.accounts {
            base.set_account(account);
        }
        for ((address, denom), amount) in self.balances {
            base.set_balance(&address, &denom, amount);
        }
        for (denom, amount) in self.supply {
            base.set_supply(&denom, amount);
        }
    }
}

impl<L: Ledger + ?Sized> Ledger for CacheLedger<'_, L> {
    fn get_account(&self, address: &Address) -> Option<Account> {
        match self.writes.accounts.get(address) {
            Some(account) => Some(account.clone()),
            None => self.base.get_account(address),
        }
    }

    fn set_account(&mut self, account: Account) {
        self.writes.accounts.insert(account.address, account);
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        self.base.get_module_address(name)
    }

    fn balance(&self, address: &Address, denom: &str) -> u128 {
        match self.writes.balances.get(&(*address, denom.to_string())) {
            Some(amount) => *amount,
            None => self.base.balance(address, denom),
        }
    }

    fn set_balance(&mut self, address: &Address, denom: &str, amount: u128) {
        self.writes
            .balances
            .insert((*address, denom.to_string()), amount);
    }

    fn supply(&self, denom: &str) -> u128 {
        match self.writes.supply.get(denom) {
            Some(amount) => *amount,
            None => self.base.supply(denom),
        }
    }

    fn set_supply(&mut self, denom: &str, amount: u128) {
        self.writes.supply.insert(denom.to_string(), amount);
    }
}
