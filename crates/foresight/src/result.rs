//! Forecast results and the no-result sentinel.

use crate::snapshot::Snapshot;
use foresight_eval::HorizonForecast;
use foresight_features::{FundamentalsQuality, SkippedHorizon};
use foresight_traits::{Date, Direction, Horizon, ProbabilitySource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Horizon in trading days.
    pub horizon: Horizon,
    /// Predicted direction.
    pub direction: Direction,
    /// Probability of an up move, in percent.
    pub probability_up: f64,
    /// How to read `probability_up`.
    pub probability_source: ProbabilitySource,
    /// Conditional expected return, in percent.
    pub expected_return: f64,
    /// Training rows behind the expected return.
    pub support: usize,
    /// In-sample hit rate of the retained model.
    pub hit_rate: Option<f64>,
}

impl From<&HorizonForecast> for ForecastResult {
    fn from(f: &HorizonForecast) -> Self {
        Self {
            horizon: f.horizon,
            direction: f.prediction.direction,
            probability_up: f.prediction.probability_up * 100.0,
            probability_source: f.probability_source,
            expected_return: f.expected.percent(),
            support: f.expected.support(),
            hit_rate: f.expected.hit_rate,
        }
    }
}

/// Successful engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Symbol as requested.
    pub symbol: String,
    /// Short display name.
    pub company_name: String,
    /// Date of the live feature row.
    pub as_of: Date,
    /// Fundamentals availability; anything but complete is degraded input.
    pub quality: FundamentalsQuality,
    /// One result per horizon that trained, in request order.
    pub results: Vec<ForecastResult>,
    /// Horizons omitted, with reasons.
    pub skipped: Vec<SkippedHorizon>,
    /// Latest technical/fundamental values.
    pub snapshot: Snapshot,
}

impl ForecastReport {
    /// Returns true when fundamentals were partial or missing.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.quality.is_degraded()
    }

    /// Result for `horizon`, if it trained.
    #[must_use]
    pub fn result(&self, horizon: Horizon) -> Option<&ForecastResult> {
        self.results.iter().find(|r| r.horizon == horizon)
    }
}

/// Why nothing could be forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoResultReason {
    /// The loader returned no usable bars.
    NoPriceData,
    /// Fewer clean bars than the minimum.
    InsufficientHistory {
        /// Clean bars available.
        bars: usize,
        /// Bars required.
        required: usize,
    },
    /// No day had a complete feature row.
    NoLiveRow,
    /// Every requested horizon was skipped or failed.
    NoTrainableHorizon {
        /// Per-horizon reasons.
        skipped: Vec<SkippedHorizon>,
    },
}

impl fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPriceData => f.write_str("no price data"),
            Self::InsufficientHistory { bars, required } => {
                write!(f, "{bars} price bars, at least {required} required")
            }
            Self::NoLiveRow => f.write_str("no complete feature row"),
            Self::NoTrainableHorizon { skipped } => {
                write!(f, "no horizon had enough data ({} skipped)", skipped.len())
            }
        }
    }
}

/// Engine output: forecasts, or a well-defined empty sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ForecastOutcome {
    /// At least one horizon produced a forecast.
    Forecasts(ForecastReport),
    /// Nothing could be computed.
    NoResult(NoResultReason),
}

impl ForecastOutcome {
    /// The report, if any.
    #[must_use]
    pub const fn report(&self) -> Option<&ForecastReport> {
        match self {
            Self::Forecasts(report) => Some(report),
            Self::NoResult(_) => None,
        }
    }

    /// Per-horizon results; empty for the sentinel.
    #[must_use]
    pub fn results(&self) -> &[ForecastResult] {
        self.report().map_or(&[], |r| r.results.as_slice())
    }

    /// Returns true for the sentinel.
    #[must_use]
    pub const fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult(_))
    }
}
