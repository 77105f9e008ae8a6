//! FMP API client implementation.

use crate::{
    Result,
    error::FmpError,
    fundamentals::{facts_from_statements, synthetic_fact},
    types::{HistoricalPrice, IncomeStatement, KeyMetrics, Period, Quote},
};
use chrono::{Duration, NaiveDate};
use foresight_traits::{Bar, FundamentalFact};
use reqwest::Client;
use std::env;
use tracing::{debug, warn};

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        serde_json::from_str(&text).map_err(|e| {
            FmpError::Json(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to parse: {e}. Response: {text}"),
            )))
        })
    }

    /// Get income statements for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "AAPL")
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return (most recent first)
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<IncomeStatement>> {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        let endpoint = format!(
            "income-statement?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        );
        self.get(&endpoint).await
    }

    /// Get key metrics for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `period` - Annual or quarterly
    /// * `limit` - Number of periods to return
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn key_metrics(
        &self,
        symbol: &str,
        period: Period,
        limit: Option<u32>,
    ) -> Result<Vec<KeyMetrics>> {
        let limit_param = limit.map(|l| format!("&limit={l}")).unwrap_or_default();
        let endpoint = format!(
            "key-metrics?symbol={}&period={}{}",
            symbol.to_uppercase(),
            period.as_str(),
            limit_param
        );
        self.get(&endpoint).await
    }

    /// Get real-time quote for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the symbol is unknown.
    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let endpoint = format!("quote?symbol={}", symbol.to_uppercase());
        let quotes: Vec<Quote> = self.get(&endpoint).await?;
        quotes
            .into_iter()
            .next()
            .ok_or_else(|| FmpError::SymbolNotFound(symbol.to_string()))
    }

    /// Get historical daily prices for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol
    /// * `from` - First date to include
    /// * `to` - Last date to include
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<HistoricalPrice>> {
        let mut params = String::new();
        if let Some(f) = from {
            params.push_str(&format!("&from={}", f.format("%Y-%m-%d")));
        }
        if let Some(t) = to {
            params.push_str(&format!("&to={}", t.format("%Y-%m-%d")));
        }

        let endpoint = format!(
            "historical-price-eod/full?symbol={}{}",
            symbol.to_uppercase(),
            params
        );
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }

    /// Daily bars covering the `lookback_days` calendar days up to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::NoData`] when the API returns no parseable rows.
    pub async fn daily_bars(
        &self,
        symbol: &str,
        lookback_days: u32,
        to: NaiveDate,
    ) -> Result<Vec<Bar>> {
        let from = to - Duration::days(i64::from(lookback_days));
        let prices = self.historical_prices(symbol, Some(from), Some(to)).await?;
        let mut bars: Vec<Bar> = prices.iter().filter_map(HistoricalPrice::to_bar).collect();
        if bars.is_empty() {
            return Err(FmpError::NoData(symbol.to_string()));
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Fundamental facts announced within the lookback window.
    ///
    /// Quarterly income statements and key metrics are fetched concurrently
    /// and merged by period. When the symbol has no quarterly history, a
    /// single fact is built from the quote's trailing figures and dated at
    /// the start of the window.
    ///
    /// # Errors
    ///
    /// Returns an error only if the quote fallback is needed and fails.
    pub async fn fundamental_facts(
        &self,
        symbol: &str,
        lookback_days: u32,
        to: NaiveDate,
    ) -> Result<Vec<FundamentalFact>> {
        let from = to - Duration::days(i64::from(lookback_days));
        let quarters = lookback_days / 90 + 2;

        let (income, metrics) = tokio::join!(
            self.income_statement(symbol, Period::Quarter, Some(quarters)),
            self.key_metrics(symbol, Period::Quarter, Some(quarters)),
        );
        let income = income.unwrap_or_else(|e| {
            warn!(
                symbol,
                error = %e,
                "quarterly income statements unavailable; ratios dated by filing lag"
            );
            Vec::new()
        });
        let metrics = metrics.unwrap_or_else(|e| {
            debug!(symbol, error = %e, "quarterly key metrics unavailable");
            Vec::new()
        });

        let facts = facts_from_statements(&income, &metrics);
        if !facts.is_empty() {
            return Ok(facts);
        }

        let quote = self.quote(symbol).await?;
        Ok(synthetic_fact(&quote, from).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = FmpClient::new("test_key");
        assert_eq!(
            client.url("quote?symbol=AAPL"),
            "https://financialmodelingprep.com/stable/quote?symbol=AAPL&apikey=test_key"
        );
        assert_eq!(
            client.url("income-statement?symbol=AAPL&period=annual"),
            "https://financialmodelingprep.com/stable/income-statement?symbol=AAPL&period=annual&apikey=test_key"
        );
    }
}
