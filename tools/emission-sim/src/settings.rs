use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use furya_mint::{parse_monthly_vesting, GenesisState};
use furya_types::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Simulation settings: config file, then `FURYA_*` environment, then command-line flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Mint genesis as JSON or TOML (by extension). Chain defaults when unset.
    pub genesis_path: Option<PathBuf>,
    /// Monthly vesting table replacing the genesis receivers.
    pub vesting_csv: Option<PathBuf>,
    /// Column alias -> recipient address for `vesting_csv`.
    pub vesting_aliases: HashMap<String, Address>,
    /// Persist mint records in a sled database instead of memory.
    pub store_path: Option<PathBuf>,
    pub start_height: u64,
    pub end_height: u64,
    pub one_month_period_in_blocks: Option<u64>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            genesis_path: None,
            vesting_csv: None,
            vesting_aliases: HashMap::new(),
            store_path: None,
            start_height: 1,
            end_height: 10_000,
            one_month_period_in_blocks: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl SimConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("FURYA"));

        let settings = builder
            .build()?
            .try_deserialize()
            .context("invalid simulation configuration")?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_height == 0 {
            bail!("start_height must be at least 1");
        }
        if self.end_height < self.start_height {
            bail!(
                "end_height ({}) is below start_height ({})",
                self.end_height,
                self.start_height
            );
        }
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            bail!("log_format must be 'pretty' or 'json', got '{}'", self.log_format);
        }
        Ok(())
    }

    /// Settings that only shape a fresh genesis and have no effect on a resumed store.
    pub fn genesis_overrides(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.genesis_path.is_some() {
            set.push("genesis_path");
        }
        if self.vesting_csv.is_some() {
            set.push("vesting_csv");
        }
        if self.one_month_period_in_blocks.is_some() {
            set.push("one_month_period_in_blocks");
        }
        set
    }

    /// Build the genesis the simulation starts from.
    pub fn load_genesis(&self) -> Result<GenesisState> {
        let mut genesis = match &self.genesis_path {
            Some(path) => {
                let data = fs::read_to_string(path)
                    .with_context(|| format!("reading genesis {}", path.display()))?;
                if path.extension().is_some_and(|ext| ext == "toml") {
                    GenesisState::from_toml(&data)?
                } else {
                    GenesisState::from_json(&data)?
                }
            }
            None => GenesisState::default(),
        };

        if let Some(path) = &self.vesting_csv {
            let data = fs::read_to_string(path)
                .with_context(|| format!("reading vesting table {}", path.display()))?;
            genesis.params.weighted_developer_rewards_receivers =
                parse_monthly_vesting(&data, &self.vesting_aliases)?;
        }

        if let Some(period) = self.one_month_period_in_blocks {
            genesis.state.vesting_month_info.one_month_period_in_blocks = period;
        }

        genesis.validate()?;
        Ok(genesis)
    }
}
