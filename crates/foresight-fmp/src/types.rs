//! Data types for FMP API responses.

use chrono::NaiveDate;
use foresight_traits::Bar;
use serde::{Deserialize, Serialize};

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Annual reports (10-K filings).
    #[default]
    Annual,
    /// Quarterly reports (10-Q filings).
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// Days after a period end by which its figures are assumed public when no
/// filing date is known. Annual reports may take up to 90 days.
pub const FILING_LAG_DAYS: i64 = 90;

/// Conservative disclosure date for a period with no known filing date.
#[must_use]
pub fn assumed_disclosure(period_end: NaiveDate) -> NaiveDate {
    period_end + chrono::Duration::days(FILING_LAG_DAYS)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
}

/// Income statement data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// Period end date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period (FY, Q1..Q4).
    #[serde(default)]
    pub period: String,
    /// Date the statement was filed.
    #[serde(default)]
    pub filing_date: Option<String>,
    /// Net income.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Earnings per share (basic).
    #[serde(default)]
    pub eps: Option<f64>,
    /// Earnings per share (diluted).
    #[serde(default)]
    pub eps_diluted: Option<f64>,
}

impl IncomeStatement {
    /// Parse the period end date.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Date the figures became public: the filing date, else the period end
    /// plus [`FILING_LAG_DAYS`].
    #[must_use]
    pub fn disclosed_on(&self) -> Option<NaiveDate> {
        self.filing_date
            .as_deref()
            .and_then(parse_date)
            .or_else(|| self.parsed_date().map(assumed_disclosure))
    }

    /// Basic EPS, falling back to diluted EPS.
    #[must_use]
    pub fn earnings_per_share(&self) -> Option<f64> {
        self.eps.or(self.eps_diluted)
    }
}

/// Key valuation metrics from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Period end date.
    pub date: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Reporting period.
    #[serde(default)]
    pub period: String,
    /// Price to earnings ratio.
    #[serde(default, alias = "priceToEarningsRatio")]
    pub pe_ratio: Option<f64>,
    /// Price to book ratio.
    #[serde(default, alias = "priceToBookRatio")]
    pub pb_ratio: Option<f64>,
}

impl KeyMetrics {
    /// Parse the period end date.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current price.
    #[serde(default)]
    pub price: f64,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Trailing EPS.
    #[serde(default)]
    pub eps: Option<f64>,
    /// Trailing P/E ratio.
    #[serde(default)]
    pub pe: Option<f64>,
}

/// Historical price data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPrice {
    /// Date.
    pub date: String,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Volume.
    #[serde(default)]
    pub volume: f64,
}

impl HistoricalPrice {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Converts to a bar; `None` when the date cannot be parsed.
    #[must_use]
    pub fn to_bar(&self) -> Option<Bar> {
        self.parsed_date()
            .map(|d| Bar::new(d, self.open, self.high, self.low, self.close, self.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_statement_parsing() {
        let json = r#"{
            "date": "2024-06-30",
            "symbol": "AAPL",
            "period": "Q3",
            "filingDate": "2024-08-02",
            "netIncome": 21448000000,
            "eps": 1.40,
            "epsDiluted": 1.40
        }"#;
        let stmt: IncomeStatement = serde_json::from_str(json).unwrap();
        assert_eq!(stmt.disclosed_on(), NaiveDate::from_ymd_opt(2024, 8, 2));
        assert_eq!(stmt.earnings_per_share(), Some(1.40));
    }

    #[test]
    fn test_income_statement_without_filing_date() {
        let json = r#"{"date": "2024-03-31", "symbol": "AAPL", "epsDiluted": 1.53}"#;
        let stmt: IncomeStatement = serde_json::from_str(json).unwrap();
        assert_eq!(stmt.disclosed_on(), NaiveDate::from_ymd_opt(2024, 6, 29));
        assert_eq!(stmt.earnings_per_share(), Some(1.53));
    }

    #[test]
    fn test_key_metrics_aliases() {
        let json = r#"{"date": "2024-06-30", "symbol": "AAPL", "priceToEarningsRatio": 31.2, "pbRatio": 48.1}"#;
        let metrics: KeyMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.pe_ratio, Some(31.2));
        assert_eq!(metrics.pb_ratio, Some(48.1));
    }

    #[test]
    fn test_historical_price_to_bar() {
        let json = r#"{"date": "2024-01-02", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 100}"#;
        let price: HistoricalPrice = serde_json::from_str(json).unwrap();
        let bar = price.to_bar().unwrap();
        assert_eq!(bar.close, 1.5);
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_quote_with_missing_fields() {
        let json = r#"{"symbol": "7203.T", "price": 2800.0}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert!(quote.name.is_none());
        assert!(quote.eps.is_none());
    }

    #[test]
    fn test_datetime_strings_are_truncated() {
        assert_eq!(parse_date("2024-08-02 18:01:37"), NaiveDate::from_ymd_opt(2024, 8, 2));
    }
}
