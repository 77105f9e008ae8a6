//! Feature Builder: bars and fundamentals in, one feature row per trading day out.
//!
//! Each row carries the fixed 15-slot schema listed in [`FEATURE_NAMES`]:
//! five lagged daily returns, three as-of fundamentals and seven technical
//! indicator values. Rows stay aligned with the trading calendar so that
//! labels can be attached before anything is dropped.

use crate::indicators::{average_true_range, macd, rsi, simple_returns, stochastic};
use crate::series::{normalize_bars, normalize_facts};
use foresight_traits::{Bar, Date, ForesightError, FundamentalFact, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of lagged return features.
pub const LAG_COUNT: usize = 5;

/// Width of a feature row.
pub const FEATURE_COUNT: usize = 15;

/// Column names of a feature row, in slot order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lag_1",
    "lag_2",
    "lag_3",
    "lag_4",
    "lag_5",
    "eps",
    "pe",
    "pb",
    "rsi",
    "macd",
    "macd_signal",
    "macd_hist",
    "stoch_k",
    "stoch_d",
    "atr",
];

const EPS_SLOT: usize = 5;
const PE_SLOT: usize = 6;
const PB_SLOT: usize = 7;
const RSI_SLOT: usize = 8;
const MACD_SLOT: usize = 9;
const MACD_SIGNAL_SLOT: usize = 10;
const MACD_HIST_SLOT: usize = 11;
const STOCH_K_SLOT: usize = 12;
const STOCH_D_SLOT: usize = 13;
const ATR_SLOT: usize = 14;

/// Unresolved slots of one trading day; `None` means not yet computable.
pub type FeatureSlots = [Option<f64>; FEATURE_COUNT];

/// Configuration for the feature builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// RSI period (default: 14)
    pub rsi_period: usize,
    /// MACD fast span (default: 12)
    pub macd_fast: usize,
    /// MACD slow span (default: 26)
    pub macd_slow: usize,
    /// MACD signal span (default: 9)
    pub macd_signal: usize,
    /// Stochastic %K window (default: 14)
    pub stoch_window: usize,
    /// Stochastic %D smoothing (default: 3)
    pub stoch_smooth: usize,
    /// ATR period (default: 14)
    pub atr_period: usize,
    /// Minimum number of clean bars required (default: 30)
    pub min_observations: usize,
    /// Days between an announcement and the figures becoming usable (default: 1)
    pub disclosure_lag_days: i64,
    /// Value used for a fundamental field the symbol never reports (default: 0.0)
    pub neutral_fundamental: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_window: 14,
            stoch_smooth: 3,
            atr_period: 14,
            min_observations: 30,
            disclosure_lag_days: 1,
            neutral_fundamental: 0.0,
        }
    }
}

impl FeatureConfig {
    /// Checks that every window is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] for a zero window, a fast
    /// MACD span not below the slow span, a negative disclosure lag or a
    /// non-finite neutral value.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("stoch_window", self.stoch_window),
            ("stoch_smooth", self.stoch_smooth),
            ("atr_period", self.atr_period),
            ("min_observations", self.min_observations),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ForesightError::InvalidConfig(format!("{name} must be positive")));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ForesightError::InvalidConfig(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.disclosure_lag_days < 0 {
            return Err(ForesightError::InvalidConfig(
                "disclosure_lag_days cannot be negative".to_string(),
            ));
        }
        if !self.neutral_fundamental.is_finite() {
            return Err(ForesightError::InvalidConfig(
                "neutral_fundamental must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// How much of the fundamentals input was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundamentalsQuality {
    /// EPS, P/E and P/B were all reported.
    Complete,
    /// At least one field was never reported and was set to the neutral value.
    Partial,
    /// No fundamentals at all; every field is neutral.
    Missing,
}

impl FundamentalsQuality {
    /// Returns true when any field had to be filled with the neutral value.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        !matches!(self, Self::Complete)
    }
}

/// A complete feature row; every slot is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Resolves a row of slots, or `None` if any slot is missing or non-finite.
    #[must_use]
    pub fn resolve(slots: &FeatureSlots) -> Option<Self> {
        let mut values = [0.0; FEATURE_COUNT];
        for (out, slot) in values.iter_mut().zip(slots) {
            *out = slot.filter(|v| v.is_finite())?;
        }
        Some(Self(values))
    }

    /// Values in slot order.
    #[must_use]
    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value of the named feature.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES.iter().position(|n| *n == name).map(|i| self.0[i])
    }
}

/// Calendar-aligned feature table for one symbol.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// Trading dates, strictly increasing.
    pub dates: Vec<Date>,
    /// Closing prices.
    pub closes: Vec<f64>,
    /// Raw slots per day, after fundamentals resolution.
    pub slots: Vec<FeatureSlots>,
    /// Complete rows; `None` where any slot is undefined.
    pub rows: Vec<Option<FeatureVector>>,
    /// Fundamentals availability.
    pub quality: FundamentalsQuality,
}

impl FeatureTable {
    /// Number of trading days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true when the table holds no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of days with a complete feature row.
    #[must_use]
    pub fn complete_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Index of the latest complete row, used for live inference.
    #[must_use]
    pub fn live_index(&self) -> Option<usize> {
        self.rows.iter().rposition(Option::is_some)
    }

    /// Date and features of the latest complete row.
    #[must_use]
    pub fn live_row(&self) -> Option<(Date, &FeatureVector)> {
        let i = self.live_index()?;
        self.rows[i].as_ref().map(|row| (self.dates[i], row))
    }

    /// Value of a named slot on day `index`, if defined.
    #[must_use]
    pub fn slot(&self, index: usize, name: &str) -> Option<f64> {
        let col = FEATURE_NAMES.iter().position(|n| *n == name)?;
        self.slots.get(index).and_then(|s| s[col])
    }

    /// The table as a DataFrame: `date`, `close` and one nullable column per feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be constructed.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(FEATURE_COUNT + 2);
        columns.push(Column::new("date".into(), self.dates.clone()));
        columns.push(Column::new("close".into(), self.closes.clone()));
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            let values: Vec<Option<f64>> = self.slots.iter().map(|s| s[i]).collect();
            columns.push(Column::new((*name).into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Builds calendar-aligned feature tables.
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    /// Creates a builder with the given configuration.
    #[must_use]
    pub const fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    #[must_use]
    pub const fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Builds the feature table for one symbol.
    ///
    /// Bars and facts are normalized first. Fundamentals are joined as of each
    /// trading day using their effective date.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InsufficientData`] when fewer than
    /// `min_observations` clean bars remain, or [`ForesightError::InvalidConfig`]
    /// for an unusable configuration.
    pub fn build(&self, bars: &[Bar], facts: &[FundamentalFact]) -> Result<FeatureTable> {
        self.config.validate()?;

        let bars = normalize_bars(bars);
        if bars.len() < self.config.min_observations {
            return Err(ForesightError::InsufficientData(format!(
                "{} clean bars, need at least {}",
                bars.len(),
                self.config.min_observations
            )));
        }

        let dates: Vec<Date> = bars.iter().map(|b| b.date).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let n = bars.len();

        let cfg = &self.config;
        let returns = simple_returns(&closes);
        let rsi = rsi(&closes, cfg.rsi_period);
        let macd = macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
        let stoch = stochastic(&highs, &lows, &closes, cfg.stoch_window, cfg.stoch_smooth);
        let atr = average_true_range(&highs, &lows, &closes, cfg.atr_period);
        let (fundamentals, quality) = self.align_fundamentals(&dates, facts);

        let mut slots: Vec<FeatureSlots> = vec![[None; FEATURE_COUNT]; n];
        for (t, row) in slots.iter_mut().enumerate() {
            for lag in 1..=LAG_COUNT {
                row[lag - 1] = t.checked_sub(lag).and_then(|i| returns[i]);
            }
            row[EPS_SLOT] = fundamentals[t][0];
            row[PE_SLOT] = fundamentals[t][1];
            row[PB_SLOT] = fundamentals[t][2];
            row[RSI_SLOT] = rsi[t];
            row[MACD_SLOT] = macd.line[t];
            row[MACD_SIGNAL_SLOT] = macd.signal[t];
            row[MACD_HIST_SLOT] = macd.histogram[t];
            row[STOCH_K_SLOT] = stoch.k[t];
            row[STOCH_D_SLOT] = stoch.d[t];
            row[ATR_SLOT] = atr[t];
        }

        let rows: Vec<Option<FeatureVector>> = slots.iter().map(FeatureVector::resolve).collect();

        let table = FeatureTable {
            dates,
            closes,
            slots,
            rows,
            quality,
        };
        debug!(
            days = table.len(),
            complete = table.complete_rows(),
            quality = ?table.quality,
            "built feature table"
        );
        Ok(table)
    }

    /// As-of join of fundamentals onto the trading calendar.
    ///
    /// Returns `[eps, pe, pb]` per day and the overall quality.
    fn align_fundamentals(
        &self,
        dates: &[Date],
        facts: &[FundamentalFact],
    ) -> (Vec<[Option<f64>; 3]>, FundamentalsQuality) {
        let neutral = Some(self.config.neutral_fundamental);
        let facts = normalize_facts(facts);
        let last_day = dates.last().copied();
        let lag = self.config.disclosure_lag_days;

        let usable: Vec<(Date, [Option<f64>; 3])> = facts
            .iter()
            .map(|f| {
                (
                    f.effective_date(lag),
                    [f.eps, f.price_to_earnings, f.price_to_book],
                )
            })
            .filter(|(effective, _)| last_day.is_some_and(|d| *effective <= d))
            .collect();

        if usable.is_empty() {
            return (vec![[neutral; 3]; dates.len()], FundamentalsQuality::Missing);
        }

        let reported: [bool; 3] =
            std::array::from_fn(|k| usable.iter().any(|(_, values)| values[k].is_some()));
        let quality = if reported.iter().all(|r| *r) {
            FundamentalsQuality::Complete
        } else {
            FundamentalsQuality::Partial
        };

        let mut out = Vec::with_capacity(dates.len());
        let mut current: [Option<f64>; 3] = [None; 3];
        let mut next = 0;
        for day in dates {
            while next < usable.len() && usable[next].0 <= *day {
                for (k, value) in usable[next].1.iter().enumerate() {
                    if value.is_some() {
                        current[k] = *value;
                    }
                }
                next += 1;
            }
            out.push(std::array::from_fn(|k| {
                if reported[k] { current[k] } else { neutral }
            }));
        }
        (out, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn trending_bars(n: usize, daily: f64) -> Vec<Bar> {
        let start = Date::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 * (1.0 + daily).powi(i as i32);
                let wiggle = if i % 2 == 0 { 1.01 } else { 1.02 };
                Bar::new(
                    start + Duration::days(i as i64),
                    close,
                    close * wiggle,
                    close * 0.99,
                    close,
                    1_000.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_config_validate() {
        assert!(FeatureConfig::default().validate().is_ok());

        let config = FeatureConfig {
            macd_fast: 30,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FeatureConfig {
            rsi_period: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ForesightError::InvalidConfig(_))));
    }

    #[test]
    fn test_too_few_bars() {
        let builder = FeatureBuilder::default();
        let err = builder.build(&trending_bars(29, 0.01), &[]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_lags_are_past_returns() {
        let builder = FeatureBuilder::default();
        let table = builder.build(&trending_bars(60, 0.01), &[]).unwrap();
        let (_, live) = table.live_row().unwrap();
        for name in ["lag_1", "lag_2", "lag_3", "lag_4", "lag_5"] {
            assert_relative_eq!(live.get(name).unwrap(), 0.01, epsilon = 1e-9);
        }
        // lag_1 on day 1 would need the return of day 0, which is undefined
        assert_eq!(table.slot(1, "lag_1"), None);
        assert_relative_eq!(table.slot(2, "lag_1").unwrap(), 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_first_complete_row_after_warmup() {
        let builder = FeatureBuilder::default();
        let table = builder.build(&trending_bars(60, 0.01), &[]).unwrap();
        // MACD signal needs 26 + 9 - 1 observations
        let first = table.rows.iter().position(Option::is_some).unwrap();
        assert_eq!(first, 33);
        assert_eq!(table.live_index(), Some(59));
    }

    #[test]
    fn test_missing_fundamentals_are_neutral() {
        let builder = FeatureBuilder::default();
        let table = builder.build(&trending_bars(60, 0.01), &[]).unwrap();
        assert_eq!(table.quality, FundamentalsQuality::Missing);
        let (_, live) = table.live_row().unwrap();
        assert_eq!(live.get("eps"), Some(0.0));
        assert_eq!(live.get("pe"), Some(0.0));
        assert_eq!(live.get("pb"), Some(0.0));
    }

    #[test]
    fn test_fundamentals_as_of_with_lag() {
        let bars = trending_bars(60, 0.01);
        let announce = bars[40].date;
        let facts = vec![
            FundamentalFact::new(bars[0].date, Some(1.0), Some(10.0), Some(2.0)),
            FundamentalFact::new(announce, Some(1.5), Some(12.0), None),
        ];
        let table = FeatureBuilder::default().build(&bars, &facts).unwrap();
        assert_eq!(table.quality, FundamentalsQuality::Complete);

        // first fact becomes usable the day after announcement
        assert_eq!(table.slot(0, "eps"), None);
        assert_eq!(table.slot(1, "eps"), Some(1.0));
        // second fact not visible on its announcement day
        assert_eq!(table.slot(40, "eps"), Some(1.0));
        assert_eq!(table.slot(41, "eps"), Some(1.5));
        // P/B carries forward from the older fact
        assert_eq!(table.slot(41, "pb"), Some(2.0));
    }

    #[test]
    fn test_unreported_field_is_partial() {
        let bars = trending_bars(60, 0.01);
        let facts = vec![FundamentalFact::new(bars[0].date, Some(1.0), Some(10.0), None)];
        let table = FeatureBuilder::default().build(&bars, &facts).unwrap();
        assert_eq!(table.quality, FundamentalsQuality::Partial);
        assert!(table.quality.is_degraded());
        assert_eq!(table.slot(50, "pb"), Some(0.0));
    }

    #[test]
    fn test_future_facts_ignored() {
        let bars = trending_bars(60, 0.01);
        let late = bars[59].date + Duration::days(10);
        let facts = vec![FundamentalFact::new(late, Some(1.0), Some(1.0), Some(1.0))];
        let table = FeatureBuilder::default().build(&bars, &facts).unwrap();
        assert_eq!(table.quality, FundamentalsQuality::Missing);
    }

    #[test]
    fn test_unsorted_input_is_normalized() {
        let mut bars = trending_bars(60, 0.01);
        bars.reverse();
        let table = FeatureBuilder::default().build(&bars, &[]).unwrap();
        assert!(table.dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_to_dataframe_shape() {
        let table = FeatureBuilder::default().build(&trending_bars(40, 0.01), &[]).unwrap();
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 40);
        assert_eq!(df.width(), FEATURE_COUNT + 2);
    }
}
