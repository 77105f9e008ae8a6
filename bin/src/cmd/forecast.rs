//! Forecast command implementation.

use crate::data;
use anyhow::Result;
use clap::ValueEnum;
use foresight::fmp::normalize_symbol;
use foresight::format::{render_outcome, report_request};
use foresight::model::ModelKind;
use foresight::report::{GeminiClient, GeminiConfig, ReportGenerator, narrate};
use foresight::{EngineConfig, ForecastOutcome};
use tracing::info;

/// How the forecast is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Aligned text table
    Text,
    /// JSON document
    Json,
}

/// Flags that override the configuration for one run.
#[derive(Debug)]
pub(crate) struct ForecastOptions {
    pub(crate) horizons: Vec<usize>,
    pub(crate) model: Option<ModelKind>,
    pub(crate) seed: Option<u64>,
    pub(crate) format: OutputFormat,
    pub(crate) report: bool,
}

/// Forecast one symbol and print the result.
pub(crate) async fn run_forecast(
    mut config: EngineConfig,
    symbol: &str,
    options: ForecastOptions,
) -> Result<()> {
    if let Some(kind) = options.model {
        config.model.kind = kind;
    }
    if let Some(seed) = options.seed {
        config.model.boosting.seed = seed;
    }
    let horizons = data::parse_horizons(&options.horizons)?;
    let symbol = normalize_symbol(symbol);

    let engine = data::engine(config)?;
    info!(%symbol, model = %engine.config().model.kind, "forecasting");
    let outcome = engine.forecast(&symbol, &horizons).await?;

    let narrative = match (&outcome, options.report) {
        (ForecastOutcome::Forecasts(report), true) => {
            let request = report_request(report);
            let generator = GeminiClient::from_env(GeminiConfig::default()).ok();
            Some(narrate(generator.as_ref().map(|g| g as &dyn ReportGenerator), &request).await)
        }
        _ => None,
    };

    match options.format {
        OutputFormat::Text => {
            println!("\n╔══════════════════════════════════════════════════════════════╗");
            println!("║                       Forecast                               ║");
            println!("╚══════════════════════════════════════════════════════════════╝\n");
            println!("{}", render_outcome(&symbol, &outcome));
            if let Some(text) = narrative {
                println!("Report:");
                println!("{}", "-".repeat(60));
                println!("{text}");
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&outcome)?;
            if let (Some(text), Some(map)) = (narrative, value.as_object_mut()) {
                map.insert("narrative".to_string(), serde_json::Value::String(text));
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
