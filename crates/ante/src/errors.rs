use crate::keepers::GrantDenied;
use furya_ledger::LedgerError;
use furya_types::{Address, CoinError};
use thiserror::Error;

/// Coarse classification used by the host to decide how a rejection propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Node misconfiguration; fatal.
    Config,
    /// Malformed input rejected at admission.
    Validation,
    Authorization,
    InsufficientFunds,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnteError {
    #[error("tx must carry a fee, a fee payer and an optional fee granter")]
    TxFormat,

    #[error("fee collector module account ({0}) has not been set")]
    Config(String),

    #[error("fee grants are not enabled")]
    FeeGrantsDisabled,

    #[error("{granter} not allowed to pay fees from {payer}: {source}")]
    UnauthorizedGrant {
        granter: Address,
        payer: Address,
        #[source]
        source: GrantDenied,
    },

    #[error("fee payer address: {0} does not exist")]
    UnknownPayer(Address),

    #[error("invalid fee amount: {fee}")]
    InvalidFee {
        fee: String,
        #[source]
        source: CoinError,
    },

    #[error("insufficient funds to pay fee: {0}")]
    InsufficientFunds(#[source] LedgerError),
}

impl AnteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnteError::Config(_) => ErrorKind::Config,
            AnteError::TxFormat | AnteError::FeeGrantsDisabled | AnteError::InvalidFee { .. } => {
                ErrorKind::Validation
            }
            AnteError::UnauthorizedGrant { .. } | AnteError::UnknownPayer(_) => {
                ErrorKind::Authorization
            }
            AnteError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
        }
    }

    /// The fee-grant denial reason, when the grant was refused.
    pub fn grant_reason(&self) -> Option<&str> {
        match self {
            AnteError::UnauthorizedGrant { source, .. } => Some(&source.reason),
            _ => None,
        }
    }
}
