use crate::{Account, Ledger, COMMUNITY_POOL_NAME, FEE_COLLECTOR_NAME, MINT_MODULE_NAME};
use furya_types::{Address, Coin, Coins};
use std::collections::BTreeMap;

// -----------------------------------------------------------------------------
// In-memory implementation (for node runtime or testing)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    accounts: BTreeMap<Address, Account>,
    balances: BTreeMap<(Address, String), u128>,
    supply: BTreeMap<String, u128>,
    modules: BTreeMap<String, Address>,
}

impl InMemoryLedger {
    /// Empty ledger without any module accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with the fee collector, mint and community pool module accounts registered.
    pub fn with_standard_modules() -> Self {
        let mut ledger = Self::new();
        for name in [FEE_COLLECTOR_NAME, MINT_MODULE_NAME, COMMUNITY_POOL_NAME] {
            ledger.register_module(name);
        }
        ledger
    }

    /// Register a module account under its derived address.
    pub fn register_module(&mut self, name: &str) -> Address {
        let address = Address::for_module(name);
        self.modules.insert(name.to_string(), address);
        self.create_account(&address);
        address
    }

    /// Credit an address directly, creating the account if needed (genesis funding, tests).
    pub fn fund(&mut self, address: &Address, amount: &Coins) {
        self.create_account(address);
        for coin in amount {
            let balance = self.balance(address, &coin.denom).saturating_add(coin.amount);
            self.set_balance(address, &coin.denom, balance);
            let supply = self.supply(&coin.denom).saturating_add(coin.amount);
            self.set_supply(&coin.denom, supply);
        }
    }

    /// All non-zero balances held by `address`.
    pub fn all_balances(&self, address: &Address) -> Coins {
        Coins::normalized(
            self.balances
                .iter()
                .filter(|((owner, _), _)| owner == address)
                .map(|((_, denom), amount)| Coin::new(denom.clone(), *amount)),
        )
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl Ledger for InMemoryLedger {
    fn get_account(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    fn set_account(&mut self, account: Account) {
        self.accounts.insert(account.address, account);
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        self.modules.get(name).copied()
    }

    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(&(*address, denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn set_balance(&mut self, address: &Address, denom: &str, amount: u128) {
        let key = (*address, denom.to_string());
        if amount == 0 {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, amount);
        }
    }

    fn supply(&self, denom: &str) -> u128 {
        self.supply.get(denom).copied().unwrap_or(0)
    }

    fn set_supply(&mut self, denom: &str, amount: u128) {
        self.supply.insert(denom.to_string(), amount);
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::LedgerError;

    #[test]
    fn test_in_memory_ledger_creation() {
        let ledger = InMemoryLedger::with_standard_modules();
        assert!(ledger.get_module_address(FEE_COLLECTOR_NAME).is_some());
        assert!(ledger.get_module_address("gov").is_none());
        assert_eq!(ledger.supply("ufury"), 0);
        assert_eq!(ledger.account_count(), 3);
    }

    #[test]
    fn test_transfer_moves_all_coins() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");
        ledger.fund(&alice, &"5uatom,1000ufury".parse().unwrap());

        ledger
            .transfer(&alice, &bob, &"2uatom,300ufury".parse().unwrap())
            .unwrap();

        assert_eq!(ledger.balance(&alice, "ufury"), 700);
        assert_eq!(ledger.balance(&bob, "ufury"), 300);
        assert_eq!(ledger.balance(&bob, "uatom"), 2);
        assert!(ledger.has_account(&bob));
        assert_eq!(ledger.all_balances(&alice).to_string(), "3uatom,700ufury");
    }

    #[test]
    fn test_insufficient_balance_is_atomic() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");
        ledger.fund(&alice, &"5uatom,1000ufury".parse().unwrap());
        let before = ledger.clone();

        let err = ledger
            .transfer(&alice, &bob, &"9uatom,10ufury".parse().unwrap())
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientFunds { available: 5, required: 9, .. }
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_mint_requires_module() {
        let mut ledger = InMemoryLedger::with_standard_modules();
        let coins = Coins::single("ufury", 42);

        ledger.mint_coins(MINT_MODULE_NAME, &coins).unwrap();
        assert_eq!(ledger.supply("ufury"), 42);

        let mint = ledger.get_module_address(MINT_MODULE_NAME).unwrap();
        assert_eq!(ledger.balance(&mint, "ufury"), 42);

        let err = ledger.mint_coins("unknown", &coins).unwrap_err();
        assert_eq!(err, LedgerError::UnknownModule("unknown".into()));
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let mut ledger = InMemoryLedger::new();
        let alice = Address::derive("alice");
        ledger.fund(&alice, &Coins::single("ufury", 10));

        let unsorted = Coins::new(vec![Coin::new("ufury", 1), Coin::new("uatom", 1)]);
        let err = ledger
            .transfer(&alice, &Address::derive("bob"), &unsorted)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
}
