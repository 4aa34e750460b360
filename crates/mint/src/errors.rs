use furya_ledger::LedgerError;
use furya_storage::StorageError;
use furya_types::CoinError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Parameter validation failures. Raised when params are written, never while a block is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("mint denom cannot be blank")]
    BlankDenom,

    #[error("invalid mint denom: {0}")]
    InvalidDenom(#[from] CoinError),

    #[error("genesis block provision must be non-negative: {0}")]
    NegativeGenesisProvisions(Decimal),

    #[error("reduction period must be positive: {0}")]
    NonPositiveReductionPeriod(u64),

    #[error("reduction factor must lie in [0, 1]: {0}")]
    ReductionFactorOutOfRange(Decimal),

    #[error("{0} distribution ratio should not be negative")]
    NegativeProportion(&'static str),

    #[error("total distributions ratio should be 1, got {0}")]
    ProportionSum(Decimal),

    #[error("block provisions must be non-negative: {0}")]
    NegativeBlockProvisions(Decimal),

    #[error("provisions {0} carry more than 18 fractional digits")]
    ExcessProvisionsPrecision(Decimal),

    #[error("one month period must be positive")]
    ZeroMonthPeriod,
}

/// Vesting schedule loading failures.
#[derive(Debug, Error)]
pub enum VestingError {
    #[error("vesting csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown vesting recipient alias: {0}")]
    UnknownAlias(String),

    #[error("invalid vesting amount {value:?} in month {month}, column {column}")]
    InvalidAmount {
        month: usize,
        column: usize,
        value: String,
    },

    #[error("vesting amount {value:?} in month {month} does not fit the amount type")]
    AmountOverflow { month: usize, value: String },
}

/// Errors surfaced by the mint keeper. All of them are fatal to block processing.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("invalid mint params: {0}")]
    Params(#[from] ParamsError),

    #[error("mint storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("mint settlement failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("mint record {0} has not been initialized")]
    MissingRecord(&'static str),

    #[error("genesis decode error: {0}")]
    GenesisDecode(String),
}
