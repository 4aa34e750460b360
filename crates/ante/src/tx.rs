//! Transaction views consumed by the ante handler.

use furya_types::{Address, Coins};
use serde::{Deserialize, Serialize};

/// Claim of a pre-registered external allocation, rewarded to `reward_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgClaimAllocation {
    /// Address on the external chain holding the allocation.
    pub address: String,
    pub pub_key: String,
    pub reward_address: Address,
    pub signature: String,
}

impl MsgClaimAllocation {
    /// The account that signs the claim.
    pub fn signer(&self) -> Address {
        self.reward_address
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from: Address,
    pub to: Address,
    pub amount: Coins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    ClaimAllocation(MsgClaimAllocation),
    Send(MsgSend),
    /// Any message this handler has no special treatment for.
    Other { type_url: String },
}

impl Msg {
    pub fn type_url(&self) -> &str {
        match self {
            Msg::ClaimAllocation(_) => "/furya.airdrop.MsgClaimAllocation",
            Msg::Send(_) => "/furya.bank.MsgSend",
            Msg::Other { type_url } => type_url,
        }
    }
}

/// Fee fields of a transaction.
pub trait FeeTx {
    fn fee(&self) -> &Coins;
    fn fee_payer(&self) -> Address;
    fn fee_granter(&self) -> Option<Address>;
}

pub trait Tx {
    fn msgs(&self) -> &[Msg];

    /// The fee view, if this transaction carries one.
    fn fee_tx(&self) -> Option<&dyn FeeTx>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Coins,
    pub payer: Address,
    pub granter: Option<Address>,
}

impl FeeTx for Fee {
    fn fee(&self) -> &Coins {
        &self.amount
    }

    fn fee_payer(&self) -> Address {
        self.payer
    }

    fn fee_granter(&self) -> Option<Address> {
        self.granter
    }
}

/// A decoded transaction: messages plus optional fee information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
    pub msgs: Vec<Msg>,
    pub fee: Option<Fee>,
}

impl SignedTx {
    pub fn new(msgs: Vec<Msg>) -> Self {
        Self { msgs, fee: None }
    }

    pub fn with_fee(mut self, amount: Coins, payer: Address) -> Self {
        self.fee = Some(Fee {
            amount,
            payer,
            granter: None,
        });
        self
    }

    /// Set the fee granter. Has no effect on a transaction without a fee.
    pub fn with_granter(mut self, granter: Address) -> Self {
        if let Some(fee) = self.fee.as_mut() {
            fee.granter = Some(granter);
        }
        self
    }
}

impl Tx for SignedTx {
    fn msgs(&self) -> &[Msg] {
        &self.msgs
    }

    fn fee_tx(&self) -> Option<&dyn FeeTx> {
        self.fee.as_ref().map(|fee| fee as &dyn FeeTx)
    }
}
