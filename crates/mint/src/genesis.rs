use crate::emission::EmissionState;
use crate::errors::{MintError, ParamsError};
use crate::params::{validate_provisions_precision, Params};
use crate::vesting::VestingMonthInfo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mint module genesis: parameters plus the initial emission state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    pub state: EmissionState,
}

impl Default for GenesisState {
    fn default() -> Self {
        let params = Params::default();
        let state = EmissionState::genesis(&params, VestingMonthInfo::default());
        Self { params, state }
    }
}

impl GenesisState {
    pub fn new(params: Params, vesting_month_info: VestingMonthInfo) -> Self {
        let state = EmissionState::genesis(&params, vesting_month_info);
        Self { params, state }
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        self.params.validate()?;
        if self.state.block_provisions < Decimal::ZERO {
            return Err(ParamsError::NegativeBlockProvisions(
                self.state.block_provisions,
            ));
        }
        validate_provisions_precision(self.state.block_provisions)?;
        self.state.vesting_month_info.validate()
    }

    pub fn from_json(data: &str) -> Result<Self, MintError> {
        serde_json::from_str(data).map_err(|e| MintError::GenesisDecode(e.to_string()))
    }

    pub fn from_toml(data: &str) -> Result<Self, MintError> {
        toml::from_str(data).map_err(|e| MintError::GenesisDecode(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, MintError> {
        serde_json::to_string_pretty(self).map_err(|e| MintError::GenesisDecode(e.to_string()))
    }
}
