//! Latest technical and fundamental snapshot.
//!
//! A short table of the most recent trading days, shown next to the forecast
//! and handed to the report generator. Missing values are shown as `0`.

use foresight_features::FeatureTable;
use foresight_features::indicators::sma;
use foresight_report::SnapshotRecord;
use foresight_traits::stats::round_to;
use foresight_traits::{Date, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

const SHORT_MA: usize = 5;
const LONG_MA: usize = 25;

/// One day of the snapshot, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Trading date.
    pub date: Date,
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

/// The last few days of a feature table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rows, oldest first.
    pub rows: Vec<SnapshotRow>,
}

impl Snapshot {
    /// Takes the last `rows` days of `table`.
    #[must_use]
    pub fn from_table(table: &FeatureTable, rows: usize) -> Self {
        let sma5 = sma(&table.closes, SHORT_MA);
        let sma25 = sma(&table.closes, LONG_MA);
        let shown = |v: Option<f64>| round_to(v.filter(|x| x.is_finite()).unwrap_or(0.0), 2);

        let start = table.len().saturating_sub(rows);
        let rows = (start..table.len())
            .map(|t| SnapshotRow {
                date: table.dates[t],
                close: shown(Some(table.closes[t])),
                sma5: shown(sma5[t]),
                sma25: shown(sma25[t]),
                macd: shown(table.slot(t, "macd")),
                rsi: shown(table.slot(t, "rsi")),
                pe: shown(table.slot(t, "pe")),
                pb: shown(table.slot(t, "pb")),
            })
            .collect();
        Self { rows }
    }

    /// Returns true when the snapshot has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row records for the report generator.
    #[must_use]
    pub fn to_records(&self) -> Vec<SnapshotRecord> {
        self.rows
            .iter()
            .map(|r| SnapshotRecord {
                date: r.date.format("%Y-%m-%d").to_string(),
                close: r.close,
                sma5: r.sma5,
                sma25: r.sma25,
                macd: r.macd,
                rsi: r.rsi,
                pe: r.pe,
                pb: r.pb,
            })
            .collect()
    }

    /// The snapshot as a DataFrame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be constructed.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let column = |f: fn(&SnapshotRow) -> f64| self.rows.iter().map(f).collect::<Vec<_>>();
        let df = df! {
            "date" => self.rows.iter().map(|r| r.date).collect::<Vec<_>>(),
            "close" => column(|r| r.close),
            "sma5" => column(|r| r.sma5),
            "sma25" => column(|r| r.sma25),
            "macd" => column(|r| r.macd),
            "rsi" => column(|r| r.rsi),
            "pe" => column(|r| r.pe),
            "pb" => column(|r| r.pb),
        }?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use foresight_features::FeatureBuilder;
    use foresight_traits::{Bar, FundamentalFact};

    fn bars(n: usize) -> Vec<Bar> {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1e5)
            })
            .collect()
    }

    #[test]
    fn test_last_rows_and_averages() {
        let table = FeatureBuilder::default().build(&bars(60), &[]).unwrap();
        let snapshot = Snapshot::from_table(&table, 5);
        assert_eq!(snapshot.rows.len(), 5);

        let last = snapshot.rows[4];
        assert_eq!(last.date, table.dates[59]);
        assert_relative_eq!(last.close, 159.0);
        assert_relative_eq!(last.sma5, 157.0);
        assert_relative_eq!(last.sma25, 147.0);
        // no fundamentals: neutral zero
        assert_relative_eq!(last.pe, 0.0);
        assert!(last.rsi > 50.0);
    }

    #[test]
    fn test_missing_values_shown_as_zero() {
        let table = FeatureBuilder::default().build(&bars(30), &[]).unwrap();
        let snapshot = Snapshot::from_table(&table, 30);
        // MACD line is undefined during warmup
        assert_relative_eq!(snapshot.rows[0].macd, 0.0);
        assert_relative_eq!(snapshot.rows[0].sma25, 0.0);
        assert_relative_eq!(snapshot.rows[24].sma25, 112.0);
    }

    #[test]
    fn test_fundamentals_and_records() {
        let facts = [FundamentalFact::new(
            Date::from_ymd_opt(2024, 1, 10).unwrap(),
            Some(12.345),
            Some(15.678),
            Some(1.234),
        )];
        let table = FeatureBuilder::default().build(&bars(40), &facts).unwrap();
        let snapshot = Snapshot::from_table(&table, 3);
        let records = snapshot.to_records();
        assert_eq!(records.len(), 3);
        assert_relative_eq!(records[2].pe, 15.68);
        assert_relative_eq!(records[2].pb, 1.23);
        assert_eq!(records[2].date, "2024-02-09");

        let df = snapshot.to_dataframe().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 8);
    }

    #[test]
    fn test_short_table() {
        let table = FeatureBuilder::default().build(&bars(30), &[]).unwrap();
        assert_eq!(Snapshot::from_table(&table, 100).rows.len(), 30);
        assert!(Snapshot::from_table(&table, 0).is_empty());
    }
}
