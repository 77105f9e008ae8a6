//! Common types used throughout the foresight engine.
//!
//! This module defines the price and fundamentals records the engine consumes,
//! the forecast horizon and direction types it produces, and a polars-backed
//! [`MarketData`] container used at the loader boundary.

use crate::{ForesightError, Result};
use chrono::Duration;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. "AAPL" or "7203.T".
pub type Symbol = String;

/// Days between 0001-01-01 (CE) and the Unix epoch, the offset polars uses
/// for its `Date` physical representation.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date.
    pub date: Date,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Bar {
    /// Creates a bar from its fields.
    #[must_use]
    pub const fn new(date: Date, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Returns true when every price is finite and strictly positive.
    #[must_use]
    pub fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Fundamental figures tied to one earnings announcement.
///
/// Any of the three figures may be absent. The figures become usable a fixed
/// number of days after `announced_on`; see [`FundamentalFact::effective_date`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalFact {
    /// Announcement (disclosure) date.
    pub announced_on: Date,
    /// Earnings per share.
    pub eps: Option<f64>,
    /// Price-to-earnings ratio on the announcement date.
    pub price_to_earnings: Option<f64>,
    /// Price-to-book ratio on the announcement date.
    pub price_to_book: Option<f64>,
}

impl FundamentalFact {
    /// Creates a fact announced on `announced_on`.
    #[must_use]
    pub const fn new(
        announced_on: Date,
        eps: Option<f64>,
        price_to_earnings: Option<f64>,
        price_to_book: Option<f64>,
    ) -> Self {
        Self {
            announced_on,
            eps,
            price_to_earnings,
            price_to_book,
        }
    }

    /// First calendar date on which the figures may be used.
    #[must_use]
    pub fn effective_date(&self, disclosure_lag_days: i64) -> Date {
        self.announced_on + Duration::days(disclosure_lag_days)
    }

    /// Returns true when no figure carries a finite value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [self.eps, self.price_to_earnings, self.price_to_book]
            .iter()
            .all(|v| !v.is_some_and(f64::is_finite))
    }
}

/// Number of trading days ahead a forecast targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Horizon(usize);

impl Horizon {
    /// Creates a horizon of `days` trading days.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] when `days` is zero.
    pub fn new(days: usize) -> Result<Self> {
        if days == 0 {
            return Err(ForesightError::InvalidConfig(
                "horizon must be at least one trading day".to_string(),
            ));
        }
        Ok(Self(days))
    }

    /// Number of trading days ahead.
    #[must_use]
    pub const fn days(self) -> usize {
        self.0
    }

    /// The default horizon set: 1, 7 and 28 trading days.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self(1), Self(7), Self(28)]
    }

    /// Deduplicates a horizon list, keeping the order of first appearance.
    #[must_use]
    pub fn dedup(horizons: &[Self]) -> Vec<Self> {
        let mut seen = Vec::with_capacity(horizons.len());
        for h in horizons {
            if !seen.contains(h) {
                seen.push(*h);
            }
        }
        seen
    }
}

impl TryFrom<usize> for Horizon {
    type Error = ForesightError;

    fn try_from(days: usize) -> Result<Self> {
        Self::new(days)
    }
}

impl From<Horizon> for usize {
    fn from(h: Horizon) -> Self {
        h.0
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// Predicted or realized price direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Close is expected to rise.
    Up,
    /// Close is expected to fall or stay flat.
    Down,
}

impl Direction {
    /// Direction implied by an up-probability in `[0, 1]`; ties go up.
    #[must_use]
    pub fn from_probability(probability_up: f64) -> Self {
        if probability_up >= 0.5 { Self::Up } else { Self::Down }
    }

    /// Direction implied by the sign of a predicted return; zero goes up.
    #[must_use]
    pub fn from_return(predicted: f64) -> Self {
        if predicted >= 0.0 { Self::Up } else { Self::Down }
    }

    /// Returns true for [`Direction::Up`].
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }

    /// Display label, "UP" or "DOWN".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Container for a daily price frame.
///
/// `MarketData` wraps a Polars DataFrame as handed over by a loader. The frame
/// may carry duplicated dates or come out of order; [`MarketData::to_bars`]
/// only extracts rows and leaves normalization to the feature stage.
///
/// # Expected Schema
///
/// - `date`: trading date (`Date` dtype)
/// - `open`, `high`, `low`, `close`: prices
/// - `volume`: traded volume (any numeric dtype)
/// - `symbol`: optional, ignored
#[derive(Debug, Clone)]
pub struct MarketData {
    data: DataFrame,
}

impl MarketData {
    /// Columns every price frame must provide.
    pub const REQUIRED_COLUMNS: [&'static str; 6] =
        ["date", "open", "high", "low", "close", "volume"];

    /// Creates a new `MarketData` instance from a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Builds a frame from bars.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be constructed.
    pub fn from_bars(bars: &[Bar]) -> Result<Self> {
        let df = df! {
            "date" => bars.iter().map(|b| b.date).collect::<Vec<_>>(),
            "open" => bars.iter().map(|b| b.open).collect::<Vec<_>>(),
            "high" => bars.iter().map(|b| b.high).collect::<Vec<_>>(),
            "low" => bars.iter().map(|b| b.low).collect::<Vec<_>>(),
            "close" => bars.iter().map(|b| b.close).collect::<Vec<_>>(),
            "volume" => bars.iter().map(|b| b.volume).collect::<Vec<_>>(),
        }?;
        Ok(Self::new(df))
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Extracts bars in frame order, sorted by date.
    ///
    /// Rows with a null date are skipped; null prices become NaN so the
    /// normalization step can reject them.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::MissingColumn`] if a required column is
    /// absent, or a polars error if a column has an unreadable dtype.
    pub fn to_bars(&self) -> Result<Vec<Bar>> {
        for col in Self::REQUIRED_COLUMNS {
            if !self.has_column(col) {
                return Err(ForesightError::MissingColumn(col.to_string()));
            }
        }

        let sorted = self.data.sort(["date"], Default::default())?;

        let dates: Vec<Option<Date>> = sorted
            .column("date")?
            .as_materialized_series()
            .date()?
            .into_iter()
            .map(|d: Option<i32>| d.and_then(date_from_epoch_days))
            .collect();

        let numeric = |name: &str| -> Result<Vec<f64>> {
            let series = sorted
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            Ok(series
                .f64()?
                .into_iter()
                .map(|v: Option<f64>| v.unwrap_or(f64::NAN))
                .collect())
        };

        let open = numeric("open")?;
        let high = numeric("high")?;
        let low = numeric("low")?;
        let close = numeric("close")?;
        let volume = numeric("volume")?;

        Ok(dates
            .into_iter()
            .enumerate()
            .filter_map(|(i, date)| {
                date.map(|d| Bar::new(d, open[i], high[i], low[i], close[i], volume[i]))
            })
            .collect())
    }
}

impl From<DataFrame> for MarketData {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for MarketData {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

/// Converts a polars physical date (days since the Unix epoch).
#[must_use]
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    Date::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}
