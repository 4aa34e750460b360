use furya_ledger::{InMemoryLedger, Ledger};
use furya_types::{Address, Coins};
use proptest::prelude::*;

fn total_held(ledger: &InMemoryLedger, holders: &[Address]) -> u128 {
    holders.iter().map(|a| ledger.balance(a, "ufury")).sum()
}

proptest! {
    #[test]
    fn transfers_conserve_supply(
        funding in prop::collection::vec(0u128..1_000_000, 4),
        moves in prop::collection::vec((0usize..4, 0usize..4, 1u128..500_000), 0..32),
    ) {
        let holders: Vec<Address> = (0..4).map(|i| Address::derive(&format!("holder-{i}"))).collect();
        let mut ledger = InMemoryLedger::new();
        for (holder, amount) in holders.iter().zip(&funding) {
            ledger.fund(holder, &Coins::single("ufury", *amount));
        }
        let supply = ledger.supply("ufury");

        for (from, to, amount) in moves {
            let before = ledger.clone();
            let result = ledger.transfer(&holders[from], &holders[to], &Coins::single("ufury", amount));
            if result.is_err() {
                prop_assert_eq!(&ledger, &before);
            }
            prop_assert_eq!(total_held(&ledger, &holders), supply);
        }
    }

    #[test]
    fn discarded_fork_never_leaks(amount in 1u128..1_000, spend in 1u128..2_000) {
        let alice = Address::derive("alice");
        let mut ledger = InMemoryLedger::with_standard_modules();
        ledger.fund(&alice, &Coins::single("ufury", amount));
        let snapshot = ledger.clone();

        {
            let mut view = ledger.fork();
            let _ = view.transfer(&alice, &Address::derive("bob"), &Coins::single("ufury", spend));
        }

        prop_assert_eq!(ledger, snapshot);
    }
}
