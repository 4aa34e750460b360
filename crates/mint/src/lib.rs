//! Furya Mint Module
//!
//! Per-block token emission for the Furya chain:
//! - Geometric reduction of block provisions every reduction period
//! - Five-way proportional split of each block's emission
//! - Monthly developer vesting paid from a fixed per-recipient table
//! - Versioned persistence of params and emission state
//!
//! Monetary unit: ufury. 1 FURY = 1 000 000 ufury.

pub mod emission;
pub mod errors;
pub mod genesis;
pub mod keeper;
pub mod params;
pub mod vesting;

pub use emission::*;
pub use errors::*;
pub use genesis::*;
pub use keeper::*;
pub use params::*;
pub use vesting::*;
