//! Fee deduction decorator.
//!
//! Decides who pays a transaction's fee: the payer, a granter on the payer's
//! behalf, or nobody when the transaction is the single claim that bootstraps
//! a brand-new account.

use crate::errors::AnteError;
use crate::keepers::{AirdropKeeper, FeegrantKeeper};
use crate::tx::{Msg, MsgClaimAllocation, Tx};
use furya_ledger::{Account, Ledger, FEE_COLLECTOR_NAME};
use furya_types::{Address, Coins};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Event emitted once a transaction's fee has been settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxEvent {
    /// `fee` is the fee as written in the transaction, e.g. `"250ufury"`.
    FeePaid { fee: String },
}

/// How the transaction may proceed to execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnteOutcome {
    /// A new account was created for the claim signer; no fee was charged.
    Bootstrapped { account: Address },
    Charged {
        deducted_from: Address,
        event: TxEvent,
    },
}

pub struct DeductFeeDecorator {
    feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
    airdrop_keeper: Arc<dyn AirdropKeeper>,
}

impl DeductFeeDecorator {
    pub fn new(
        feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
        airdrop_keeper: Arc<dyn AirdropKeeper>,
    ) -> Self {
        Self {
            feegrant_keeper,
            airdrop_keeper,
        }
    }

    pub fn ante_handle<L: Ledger>(
        &self,
        ledger: &mut L,
        tx: &dyn Tx,
    ) -> Result<AnteOutcome, AnteError> {
        let fee_tx = tx.fee_tx().ok_or(AnteError::TxFormat)?;

        if ledger.get_module_address(FEE_COLLECTOR_NAME).is_none() {
            return Err(AnteError::Config(FEE_COLLECTOR_NAME.to_string()));
        }

        let fee = fee_tx.fee();
        let payer = fee_tx.fee_payer();
        let mut deduct_from = payer;

        if let Some(granter) = fee_tx.fee_granter() {
            let keeper = self
                .feegrant_keeper
                .as_ref()
                .ok_or(AnteError::FeeGrantsDisabled)?;
            if granter != payer {
                keeper
                    .use_granted_fees(&granter, &payer, fee, tx.msgs())
                    .map_err(|source| AnteError::UnauthorizedGrant {
                        granter,
                        payer,
                        source,
                    })?;
            }
            deduct_from = granter;
        }

        if let [Msg::ClaimAllocation(claim)] = tx.msgs() {
            if let Some(account) = self.try_bootstrap(ledger, claim) {
                return Ok(AnteOutcome::Bootstrapped { account });
            }
        }

        if !ledger.has_account(&deduct_from) {
            return Err(AnteError::UnknownPayer(deduct_from));
        }

        if !fee.is_zero() {
            deduct_fees(ledger, &deduct_from, fee)?;
        }

        Ok(AnteOutcome::Charged {
            deducted_from: deduct_from,
            event: TxEvent::FeePaid {
                fee: fee.to_string(),
            },
        })
    }

    /// Dry-run the claim on a throwaway view. On success only the signer's
    /// account is created on `ledger`; the claim's own writes are dropped.
    fn try_bootstrap<L: Ledger>(
        &self,
        ledger: &mut L,
        claim: &MsgClaimAllocation,
    ) -> Option<Address> {
        let signer = claim.signer();
        if ledger.has_account(&signer) {
            return None;
        }

        let claimed = {
            let mut view = ledger.fork();
            view.set_account(Account::new(signer));
            self.airdrop_keeper.claim_allocation(
                &mut view,
                &claim.address,
                &claim.pub_key,
                &claim.reward_address,
                &claim.signature,
            )
        };

        match claimed {
            Ok(()) => {
                ledger.create_account(&signer);
                info!(target: "ante", "bootstrapped account {} through allocation claim", signer);
                Some(signer)
            }
            Err(err) => {
                debug!(
                    target: "ante",
                    "bootstrap claim for {} failed, charging fees: {}",
                    signer,
                    err
                );
                None
            }
        }
    }
}

/// Move `fee` from `from` to the fee collector.
pub fn deduct_fees<L: Ledger + ?Sized>(
    ledger: &mut L,
    from: &Address,
    fee: &Coins,
) -> Result<(), AnteError> {
    fee.validate().map_err(|source| AnteError::InvalidFee {
        fee: fee.to_string(),
        source,
    })?;

    ledger
        .send_to_module(from, FEE_COLLECTOR_NAME, fee)
        .map_err(AnteError::InsufficientFunds)?;

    debug!(target: "ante", "deducted fee {} from {}", fee, from);
    Ok(())
}
