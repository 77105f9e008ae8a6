//! Row records handed to the report generator.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One day of the latest technical/fundamental snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Trading date, `YYYY-MM-DD`.
    pub date: String,
    /// Close.
    pub close: f64,
    /// 5-day simple moving average.
    pub sma5: f64,
    /// 25-day simple moving average.
    pub sma25: f64,
    /// MACD line.
    pub macd: f64,
    /// RSI.
    pub rsi: f64,
    /// Price-to-earnings ratio.
    pub pe: f64,
    /// Price-to-book ratio.
    pub pb: f64,
}

/// One forecast row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Horizon label, e.g. `7d`.
    pub horizon: String,
    /// `UP` or `DOWN`.
    pub prediction: String,
    /// Rounded probability of an up move, in percent.
    pub probability_up: u8,
    /// Expected return in percent, two decimals.
    pub expected_return_pct: f64,
}

/// Everything the narrative generator receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Symbol as requested.
    pub symbol: String,
    /// Short display name.
    pub company_name: String,
    /// Latest snapshot rows, oldest first.
    pub snapshot: Vec<SnapshotRecord>,
    /// Forecast rows, in horizon order.
    pub forecasts: Vec<ForecastRecord>,
}

impl ReportRequest {
    /// Serializes the request as JSON row records.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_records_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering of the snapshot table.
    #[must_use]
    pub fn snapshot_text(&self) -> String {
        if self.snapshot.is_empty() {
            return "N/A".to_string();
        }
        let mut out = format!(
            "{:<10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}\n",
            "date", "close", "sma5", "sma25", "macd", "rsi", "pe", "pb"
        );
        for r in &self.snapshot {
            let _ = writeln!(
                out,
                "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
                r.date, r.close, r.sma5, r.sma25, r.macd, r.rsi, r.pe, r.pb
            );
        }
        out
    }

    /// Plain-text rendering of the forecast table.
    #[must_use]
    pub fn forecast_text(&self) -> String {
        if self.forecasts.is_empty() {
            return "N/A".to_string();
        }
        let mut out = format!(
            "{:<8} {:<10} {:>12} {:>16}\n",
            "horizon", "prediction", "probability", "expected return"
        );
        for r in &self.forecasts {
            let _ = writeln!(
                out,
                "{:<8} {:<10} {:>11}% {:>15}%",
                r.horizon,
                r.prediction,
                r.probability_up,
                format!("{:+.2}", r.expected_return_pct)
            );
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_request() -> ReportRequest {
        ReportRequest {
            symbol: "7203.T".to_string(),
            company_name: "Toyota Mo".to_string(),
            snapshot: vec![SnapshotRecord {
                date: "2024-06-28".to_string(),
                close: 3290.0,
                sma5: 3250.4,
                sma25: 3180.12,
                macd: 12.5,
                rsi: 61.3,
                pe: 9.8,
                pb: 1.2,
            }],
            forecasts: vec![ForecastRecord {
                horizon: "7d".to_string(),
                prediction: "UP".to_string(),
                probability_up: 63,
                expected_return_pct: 1.25,
            }],
        }
    }

    #[test]
    fn test_records_json() {
        let json = sample_request().to_records_json().unwrap();
        let back: ReportRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.forecasts[0].probability_up, 63);
        assert!(json.contains("\"expected_return_pct\": 1.25"));
    }

    #[test]
    fn test_text_tables() {
        let req = sample_request();
        assert!(req.snapshot_text().contains("3290.00"));
        let forecasts = req.forecast_text();
        assert!(forecasts.contains("63%"));
        assert!(forecasts.contains("+1.25%"));

        let empty = ReportRequest {
            snapshot: Vec::new(),
            forecasts: Vec::new(),
            ..req
        };
        assert_eq!(empty.snapshot_text(), "N/A");
        assert_eq!(empty.forecast_text(), "N/A");
    }
}
