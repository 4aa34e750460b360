//! Furya core primitives
//!
//! Account addresses and denominated coin amounts shared by the mint, ledger
//! and ante crates.

pub mod address;
pub mod coin;

pub use address::*;
pub use coin::*;

/// Base denomination of the chain (1 FURY = 1_000_000 ufury).
pub const DEFAULT_BOND_DENOM: &str = "ufury";

/// Micro units per whole token.
pub const MICRO_PER_FURY: u128 = 1_000_000;
