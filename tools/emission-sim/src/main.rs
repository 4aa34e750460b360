mod report;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use furya_ledger::{InMemoryLedger, Ledger};
use furya_mint::{GenesisState, MintError, MintKeeper};
use furya_storage::{MemoryStorage, SledStorage, Storage};
use report::SimReport;
use settings::SimConfig;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Configuration file (TOML or JSON). `FURYA_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run end-block emission over a height range and print the totals as JSON.
    Run(RunArgs),
    /// Print the default mint genesis.
    DefaultGenesis {
        #[arg(long, value_enum, default_value_t = GenesisFormat::Json)]
        format: GenesisFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenesisFormat {
    Json,
    Toml,
}

#[derive(Debug, Parser, Clone)]
struct RunArgs {
    /// First height to process
    #[arg(long)]
    from: Option<u64>,

    /// Last height to process (inclusive)
    #[arg(long)]
    to: Option<u64>,

    /// Genesis file (.json or .toml)
    #[arg(long)]
    genesis: Option<PathBuf>,

    /// Monthly vesting CSV replacing the genesis receivers
    #[arg(long)]
    vesting_csv: Option<PathBuf>,

    /// Keep mint records in a sled database at this path; reruns resume from it
    #[arg(long)]
    store: Option<PathBuf>,

    /// Override the vesting month length in blocks
    #[arg(long)]
    month_period: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,

    /// pretty | json
    #[arg(long)]
    log_format: Option<String>,
}

impl RunArgs {
    fn apply(self, settings: &mut SimConfig) {
        if let Some(from) = self.from {
            settings.start_height = from;
        }
        if let Some(to) = self.to {
            settings.end_height = to;
        }
        if self.genesis.is_some() {
            settings.genesis_path = self.genesis;
        }
        if self.vesting_csv.is_some() {
            settings.vesting_csv = self.vesting_csv;
        }
        if self.store.is_some() {
            settings.store_path = self.store;
        }
        if self.month_period.is_some() {
            settings.one_month_period_in_blocks = self.month_period;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }
        if let Some(format) = self.log_format {
            settings.log_format = format;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Run(args) => {
            let mut settings = SimConfig::load(cli.config.as_deref())?;
            args.apply(&mut settings);
            settings.validate()?;
            init_logging(&settings)?;

            let report = run(&settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::DefaultGenesis { format } => {
            let genesis = GenesisState::default();
            let rendered = match format {
                GenesisFormat::Json => genesis.to_json_pretty()?,
                GenesisFormat::Toml => toml::to_string_pretty(&genesis)?,
            };
            println!("{rendered}");
        }
    }

    Ok(())
}

fn init_logging(settings: &SimConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    // stdout carries the report
    if settings.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

fn run(settings: &SimConfig) -> Result<SimReport> {
    let genesis = settings.load_genesis()?;

    match &settings.store_path {
        Some(path) => {
            let store = SledStorage::new(path)
                .with_context(|| format!("opening mint store at {}", path.display()))?;
            simulate(MintKeeper::new(store), &genesis, settings)
        }
        None => simulate(MintKeeper::new(MemoryStorage::new()), &genesis, settings),
    }
}

fn simulate<S: Storage>(
    keeper: MintKeeper<S>,
    genesis: &GenesisState,
    settings: &SimConfig,
) -> Result<SimReport> {
    match keeper.state() {
        Ok(state) => {
            info!(
                "resuming from stored mint state (last reduction at {})",
                state.last_reduction_block_num
            );
            let ignored = settings.genesis_overrides();
            if !ignored.is_empty() {
                warn!(
                    "stored mint state takes precedence; ignoring {}",
                    ignored.join(", ")
                );
            }
        }
        Err(MintError::MissingRecord(_)) => keeper.init_genesis(genesis)?,
        Err(err) => return Err(err.into()),
    }
    let denom = keeper.params()?.mint_denom;

    let mut ledger = InMemoryLedger::with_standard_modules();
    let mut report = SimReport::new(settings.start_height, settings.end_height);
    for height in settings.start_height..=settings.end_height {
        let emission = keeper
            .end_block(height, &mut ledger)
            .with_context(|| format!("end block at height {height}"))?;
        report.record(&emission);
    }
    keeper.store().flush()?;

    info!(
        "processed {} blocks, minted {}{}",
        report.blocks, report.minted, denom
    );
    Ok(report.finish(keeper.state()?, ledger.supply(&denom)))
}
