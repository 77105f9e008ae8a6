//! [`SeriesLoader`] implementation backed by the FMP API.

use crate::client::FmpClient;
use crate::symbol::{display_name, normalize_symbol};
use async_trait::async_trait;
use chrono::Utc;
use foresight_traits::{Bar, FundamentalFact, SeriesLoader};
use tracing::{debug, warn};

#[async_trait]
impl SeriesLoader for FmpClient {
    async fn fetch_prices(&self, symbol: &str, lookback_days: u32) -> Vec<Bar> {
        let symbol = normalize_symbol(symbol);
        let today = Utc::now().date_naive();
        match self.daily_bars(&symbol, lookback_days, today).await {
            Ok(bars) => {
                debug!(%symbol, bars = bars.len(), "fetched prices");
                bars
            }
            Err(e) => {
                warn!(%symbol, error = %e, "price fetch failed, treating as no data");
                Vec::new()
            }
        }
    }

    async fn fetch_fundamentals(&self, symbol: &str, lookback_days: u32) -> Vec<FundamentalFact> {
        let symbol = normalize_symbol(symbol);
        let today = Utc::now().date_naive();
        match self.fundamental_facts(&symbol, lookback_days, today).await {
            Ok(facts) => {
                debug!(%symbol, facts = facts.len(), "fetched fundamentals");
                facts
            }
            Err(e) => {
                warn!(%symbol, error = %e, "fundamentals unavailable");
                Vec::new()
            }
        }
    }

    async fn company_name(&self, symbol: &str) -> String {
        let symbol = normalize_symbol(symbol);
        match self.quote(&symbol).await {
            Ok(quote) => display_name(quote.name.as_deref(), &symbol),
            Err(e) => {
                warn!(%symbol, error = %e, "company name lookup failed");
                symbol
            }
        }
    }
}
