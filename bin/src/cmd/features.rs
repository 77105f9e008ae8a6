//! Feature listing and dump command implementation.

use crate::data;
use anyhow::Result;
use foresight::EngineConfig;
use foresight::features::registry::{feature_catalog, warmup_days};
use foresight::features::FeatureCategory;
use foresight::fmp::normalize_symbol;
use foresight::format::no_result_message;

/// List feature columns, optionally filtered by category.
pub(crate) fn list_features(config: &EngineConfig, category: Option<&str>) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Feature Columns                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let catalog = feature_catalog(&config.features);
    let categories = [
        (FeatureCategory::Lag, "Lag"),
        (FeatureCategory::Fundamental, "Fundamental"),
        (FeatureCategory::Technical, "Technical"),
    ];

    for (cat, cat_name) in categories {
        if let Some(filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));
        for info in catalog.iter().filter(|f| f.category == cat) {
            println!(
                "  {:12} - {} (defined from day {})",
                info.name, info.description, info.warmup_days
            );
        }
        println!();
    }

    println!(
        "First complete row: day {} (min observations: {})\n",
        warmup_days(&config.features),
        config.features.min_observations
    );
}

/// Dump the latest feature rows for a symbol.
pub(crate) async fn dump_features(config: EngineConfig, symbol: &str, tail: usize) -> Result<()> {
    let symbol = normalize_symbol(symbol);
    let engine = data::engine(config)?;

    println!("Fetching {symbol}...");
    let input = engine.load(&symbol).await;
    let table = match engine.feature_table(&input.bars, &input.facts) {
        Ok(table) => table,
        Err(e) => {
            println!("{}", no_result_message(&symbol, &e));
            return Ok(());
        }
    };

    println!(
        "{} days, {} complete rows, fundamentals {:?}\n",
        table.len(),
        table.complete_rows(),
        table.quality
    );
    println!("{}", table.to_dataframe()?.tail(Some(tail)));

    Ok(())
}
