use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use orderforge_generate::output::csv::write_orders_csv;
use orderforge_generate::{
    GenerateOptions, GenerationEngine, GenerationError, OrderConstraints, SeedPaths,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "orderforge", version, about = "Generate mock order datasets from seed CSVs")]
struct Cli {
    /// Directory holding products.csv, customer.csv and accounts.csv.
    #[arg(long, default_value = ".", value_name = "DIR")]
    seed_dir: PathBuf,
    /// Override for the products seed file.
    #[arg(long, value_name = "FILE")]
    products: Option<PathBuf>,
    /// Override for the customer seed file.
    #[arg(long, value_name = "FILE")]
    customers: Option<PathBuf>,
    /// Override for the accounts seed file.
    #[arg(long, value_name = "FILE")]
    accounts: Option<PathBuf>,
    /// Total number of orders (defaults to 5x buyers, capped at capacity).
    #[arg(long)]
    orders: Option<u64>,
    /// Random seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Constraint preset to apply.
    #[arg(long, value_enum, default_value_t = Preset::Api)]
    preset: Preset,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// Directory for the generated file.
    #[arg(long, default_value = "out", value_name = "DIR")]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Small orders, tight per-buyer cap (API-facing constants).
    Api,
    /// Larger orders and cap (bulk export constants).
    Bulk,
}

impl Preset {
    fn constraints(self) -> OrderConstraints {
        match self {
            Preset::Api => OrderConstraints::api(),
            Preset::Bulk => OrderConstraints::bulk_export(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let defaults = SeedPaths::from_dir(&cli.seed_dir);
    let seeds = SeedPaths {
        products: cli.products.unwrap_or(defaults.products),
        customers: cli.customers.unwrap_or(defaults.customers),
        accounts: cli.accounts.unwrap_or(defaults.accounts),
    };

    let engine = GenerationEngine::new(GenerateOptions {
        order_goal: cli.orders,
        seed: cli.seed,
        constraints: cli.preset.constraints(),
        processed_at: None,
    });
    let payload = engine.run(&seeds)?;

    fs::create_dir_all(&cli.out_dir)?;
    let stamp = payload.metadata.generated_at.format("%Y%m%d_%H");

    match cli.format {
        OutputFormat::Csv => {
            let out_path = cli.out_dir.join(format!("orders_{stamp}.csv"));
            let bytes_written = write_orders_csv(&out_path, &payload.data)?;
            info!(
                path = %out_path.display(),
                bytes_written,
                records = payload.metadata.record_count,
                "orders csv written"
            );
        }
        OutputFormat::Json => {
            let out_path = cli.out_dir.join(format!("orders_{stamp}.json"));
            fs::write(&out_path, serde_json::to_vec_pretty(&payload)?)?;
            info!(
                path = %out_path.display(),
                records = payload.metadata.record_count,
                "orders payload written"
            );
        }
    }

    Ok(())
}
