//! Command-line front end for the Price Data SDK.
//!
//! Exit codes: 0 on success, 2 when input fails validation, 1 for any
//! internal failure (lookup, persistence, IO).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use price_data_sdk::models::Strategy;
use price_data_sdk::queries::HistoryFilter;
use price_data_sdk::{
    Commodity, CountryCode, GeneratePricesParams, Granularity, PriceDataSdk, Result,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "price-data", version, about = "Synthesize and store commodity price series")]
struct Cli {
    /// DuckDB database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// TOML pricing policy
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Seed the random source for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schemas and rebuild the reference tables
    InitDb,
    /// Return (and store on first use) a day of prices
    ModelPrices {
        #[arg(long)]
        for_date: String,
        #[arg(long)]
        country_code: String,
        #[arg(long, default_value = "h")]
        granularity: String,
        #[arg(long, default_value = "power")]
        commodity: String,
    },
    /// Draw random numbers in 0..100
    RandomNumbers {
        #[arg(long, default_value = "basic")]
        strategy: String,
        #[arg(long)]
        count: usize,
    },
    /// Draw a day of unshaped prices around a country's base price
    FlatPrices {
        #[arg(long)]
        country_code: String,
        #[arg(long, default_value = "h")]
        granularity: String,
    },
    /// List stored series
    History {
        /// Repeat to match several countries
        #[arg(long = "country-code")]
        country_codes: Vec<String>,
        #[arg(long)]
        commodity: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_validation() => {
            error!("{}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn build_sdk(cli: &Cli) -> Result<PriceDataSdk> {
    let mut builder = PriceDataSdk::builder();
    if let Some(db) = &cli.db {
        builder = builder.db_path(db);
    }
    if let Some(policy) = &cli.policy {
        builder = builder.policy_file(policy);
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder.build()
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::InitDb => {
            let sdk = build_sdk(&cli)?;
            println!("{} initialised - schemas and tables created.", sdk);
        }
        Command::ModelPrices {
            for_date,
            country_code,
            granularity,
            commodity,
        } => {
            let params = GeneratePricesParams {
                for_date: for_date.clone(),
                country_code: country_code.clone(),
                granularity: granularity.clone(),
                commodity: commodity.clone(),
            };
            // Validate before touching the database
            params.validate()?;
            let sdk = build_sdk(&cli)?;
            let response = sdk.model_prices(&params)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::RandomNumbers { strategy, count } => {
            let strategy: Strategy = strategy.parse()?;
            let sdk = build_sdk(&cli)?;
            let numbers = sdk.generate_random_numbers(strategy, *count)?;
            println!("{}", serde_json::to_string(&numbers)?);
        }
        Command::FlatPrices {
            country_code,
            granularity,
        } => {
            let country: CountryCode = country_code.parse()?;
            let granularity: Granularity = granularity.parse()?;
            let sdk = build_sdk(&cli)?;
            let prices = sdk.generate_flat_prices(country, granularity)?;
            println!("{}", serde_json::to_string(&prices)?);
        }
        Command::History {
            country_codes,
            commodity,
            limit,
        } => {
            let filter = HistoryFilter {
                country_codes: country_codes
                    .iter()
                    .map(|c| c.parse::<CountryCode>())
                    .collect::<Result<Vec<_>>>()?,
                commodity: commodity.as_deref().map(str::parse::<Commodity>).transpose()?,
                limit: *limit,
                ..HistoryFilter::default()
            };
            let sdk = build_sdk(&cli)?;
            let rows = sdk.prices().history(&filter)?;
            for stored in rows {
                let request = stored.series.request;
                println!(
                    "{} {} {} {} {} prices",
                    request.for_date,
                    request.country_code,
                    request.commodity,
                    request.granularity,
                    stored.series.len()
                );
            }
        }
    }
    Ok(())
}
