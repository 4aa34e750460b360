//! Collaborators consulted by the fee decorator.

use crate::tx::Msg;
use furya_ledger::Ledger;
use furya_types::{Address, Coins};
use thiserror::Error;

/// A fee grant refused by the fee-grant module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct GrantDenied {
    pub reason: String,
}

impl GrantDenied {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("invalid claim signature")]
    InvalidSignature,
    #[error("no allocation registered for {0}")]
    NoSuchAllocation(String),
    #[error("allocation for {0} has already been claimed")]
    AlreadyClaimed(String),
}

pub trait FeegrantKeeper: Send + Sync {
    /// Authorize `granter` paying `fee` on behalf of `grantee` for `msgs`, consuming the allowance.
    fn use_granted_fees(
        &self,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        msgs: &[Msg],
    ) -> Result<(), GrantDenied>;
}

pub trait AirdropKeeper: Send + Sync {
    /// Claim the allocation held by `address` on behalf of `reward_address`.
    ///
    /// Every write of the claim goes through `view`; the caller decides whether
    /// the view is kept or thrown away.
    fn claim_allocation(
        &self,
        view: &mut dyn Ledger,
        address: &str,
        pub_key: &str,
        reward_address: &Address,
        signature: &str,
    ) -> Result<(), ClaimError>;
}
