//! Snapshot command implementation.

use crate::data;
use anyhow::Result;
use foresight::fmp::normalize_symbol;
use foresight::format::no_result_message;
use foresight::{EngineConfig, Snapshot};

/// Show the latest technical and fundamental values for a symbol.
pub(crate) async fn show_snapshot(
    config: EngineConfig,
    symbol: &str,
    rows: Option<usize>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Latest Snapshot                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let symbol = normalize_symbol(symbol);
    let rows = rows.unwrap_or(config.snapshot_rows);
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

    println!("{} ({symbol}), fundamentals {:?}\n", input.company_name, table.quality);
    let snapshot = Snapshot::from_table(&table, rows);
    println!("{}", snapshot.to_dataframe()?);

    Ok(())
}
