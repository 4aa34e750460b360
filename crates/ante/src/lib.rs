//! Furya Ante Handlers
//!
//! Transaction admission that runs before message execution:
//! - Fee deduction from the payer or a fee granter
//! - Single-claim account bootstrap through an isolated ledger view
//!
//! The fee grant and airdrop modules are reached through the traits in
//! [`keepers`]; ledger access goes through [`furya_ledger::Ledger`].

pub mod errors;
pub mod fee;
pub mod keepers;
pub mod tx;

pub use errors::{AnteError, ErrorKind};
pub use fee::{deduct_fees, AnteOutcome, DeductFeeDecorator, TxEvent};
pub use keepers::{AirdropKeeper, ClaimError, FeegrantKeeper, GrantDenied};
pub use tx::{Fee, FeeTx, Msg, MsgClaimAllocation, MsgSend, SignedTx, Tx};
