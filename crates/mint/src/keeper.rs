//! Mint keeper
//!
//! Owns the persisted mint records and settles each block's emission against
//! the account ledger.

use crate::emission::{process_block, BlockEmission, EmissionState, Recipient};
use crate::errors::MintError;
use crate::genesis::GenesisState;
use crate::params::Params;
use furya_ledger::{Ledger, LedgerError, WriteSet, MINT_MODULE_NAME};
use furya_storage::{get_record, put_record, Storage};
use furya_types::Coins;
use tracing::{debug, info};

/// Record key of the mint parameters.
pub const PARAMS_KEY: &str = "mint/params";
/// Record key of the emission state.
pub const STATE_KEY: &str = "mint/state";

pub struct MintKeeper<S: Storage> {
    store: S,
}

impl<S: Storage> MintKeeper<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist a genesis state.
    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<(), MintError> {
        genesis.validate()?;
        put_record(&self.store, PARAMS_KEY, &genesis.params)?;
        put_record(&self.store, STATE_KEY, &genesis.state)?;
        self.store.flush()?;
        info!(
            target: "mint",
            "mint genesis initialized: {} {} per block",
            genesis.state.block_provisions,
            genesis.params.mint_denom
        );
        Ok(())
    }

    pub fn export_genesis(&self) -> Result<GenesisState, MintError> {
        Ok(GenesisState {
            params: self.params()?,
            state: self.state()?,
        })
    }

    pub fn params(&self) -> Result<Params, MintError> {
        get_record(&self.store, PARAMS_KEY)?.ok_or(MintError::MissingRecord(PARAMS_KEY))
    }

    /// Governance-gated parameter update. Invalid params leave the stored record untouched.
    pub fn set_params(&self, params: &Params) -> Result<(), MintError> {
        params.validate()?;
        put_record(&self.store, PARAMS_KEY, params)?;
        self.store.flush()?;
        info!(target: "mint", "mint params updated");
        Ok(())
    }

    pub fn state(&self) -> Result<EmissionState, MintError> {
        get_record(&self.store, STATE_KEY)?.ok_or(MintError::MissingRecord(STATE_KEY))
    }

    pub fn set_state(&self, state: &EmissionState) -> Result<(), MintError> {
        put_record(&self.store, STATE_KEY, state)?;
        Ok(())
    }

    /// Process the emission for `height`: mint, pay out, persist.
    ///
    /// Settlement runs on an isolated view of `ledger`. The new state is persisted
    /// before the view is committed, so a storage failure leaves the ledger unpaid
    /// and the block can be replayed.
    pub fn end_block<L: Ledger>(
        &self,
        height: u64,
        ledger: &mut L,
    ) -> Result<BlockEmission, MintError> {
        let params = self.params()?;
        let state = self.state()?;
        let emission = process_block(height, &params, &state);

        let writes = settle(ledger, &params.mint_denom, &emission)?;
        self.set_state(&emission.state)?;
        writes.apply_to(ledger);

        if !emission.transfers.is_empty() {
            debug!(
                target: "mint",
                "height {}: settled {}{} in {} transfers",
                height,
                emission.total_minted(),
                params.mint_denom,
                emission.transfers.len()
            );
        }
        Ok(emission)
    }
}

fn settle<L: Ledger>(
    ledger: &L,
    denom: &str,
    emission: &BlockEmission,
) -> Result<WriteSet, LedgerError> {
    let mut view = ledger.fork();

    let total = emission.total_minted();
    if total > 0 {
        view.mint_coins(MINT_MODULE_NAME, &Coins::single(denom, total))?;
    }

    for transfer in &emission.transfers {
        let amount = Coins::single(transfer.amount.denom.clone(), transfer.amount.amount);
        let to = match &transfer.recipient {
            Recipient::Account(address) => *address,
            Recipient::Module(name) => view
                .get_module_address(name)
                .ok_or_else(|| LedgerError::UnknownModule(name.clone()))?,
        };
        view.send_from_module(MINT_MODULE_NAME, &to, &amount)?;
    }

    Ok(view.into_write_set())
}
