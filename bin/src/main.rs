//! Foresight CLI binary.
//!
//! Provides a command-line interface for the foresight forecasting engine.

mod cmd;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foresight::model::ModelKind;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "foresight")]
#[command(
    about = "Multi-horizon walk-forward direction forecasts for single equities",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast direction and expected return per horizon
    Forecast {
        /// Ticker symbol (bare numeric codes are Tokyo listings)
        symbol: String,

        /// Horizons in trading days
        #[arg(short = 'H', long, value_delimiter = ',')]
        horizons: Vec<usize>,

        /// Learner (classifier or regressor)
        #[arg(short, long)]
        model: Option<ModelKind>,

        /// Random seed for model fitting
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = cmd::forecast::OutputFormat::Text)]
        format: cmd::forecast::OutputFormat,

        /// Append a narrative analyst report
        #[arg(long)]
        report: bool,
    },

    /// Show the latest technical and fundamental values
    Snapshot {
        /// Ticker symbol
        symbol: String,

        /// Number of days to show
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// List feature columns, or dump a symbol's feature table
    Features {
        /// Ticker symbol; when given, prints its latest feature rows
        symbol: Option<String>,

        /// Filter the listing by category
        #[arg(long)]
        category: Option<String>,

        /// Number of rows to dump
        #[arg(short, long, default_value = "10")]
        tail: usize,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("foresight=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = data::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Forecast {
            symbol,
            horizons,
            model,
            seed,
            format,
            report,
        } => {
            let options = cmd::forecast::ForecastOptions {
                horizons,
                model,
                seed,
                format,
                report,
            };
            cmd::forecast::run_forecast(config, &symbol, options).await?;
        }
        Commands::Snapshot { symbol, rows } => {
            cmd::snapshot::show_snapshot(config, &symbol, rows).await?;
        }
        Commands::Features {
            symbol,
            category,
            tail,
        } => match symbol {
            Some(symbol) => cmd::features::dump_features(config, &symbol, tail).await?,
            None => cmd::features::list_features(&config, category.as_deref()),
        },
    }

    Ok(())
}
