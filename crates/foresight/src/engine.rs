//! Forecast orchestration.
//!
//! The engine runs the full pipeline for one symbol:
//!
//! 1. Feature Builder: normalize series and build the calendar-aligned table
//! 2. Label Builder: per-horizon labels and the shared training set
//! 3. Walk-Forward Trainer: fit every fold, keep the last, predict the live row
//! 4. Expected-Return Estimator: conditional mean on the retained fold
//!
//! A failing horizon is logged and recorded as skipped; only the absence of
//! any usable data turns the call into [`ForecastOutcome::NoResult`].

use crate::config::EngineConfig;
use crate::result::{ForecastOutcome, ForecastReport, ForecastResult, NoResultReason};
use crate::snapshot::Snapshot;
use foresight_eval::WalkForwardTrainer;
use foresight_features::{FeatureBuilder, FeatureTable, SkippedHorizon, TrainingSet, normalize_bars};
use foresight_traits::{Bar, FundamentalFact, Horizon, Result, SeriesLoader};
use tracing::{debug, info, warn};

/// Raw series for one symbol, as fetched through a [`SeriesLoader`].
#[derive(Debug, Clone, Default)]
pub struct SeriesInput {
    /// Display name.
    pub company_name: String,
    /// Daily bars.
    pub bars: Vec<Bar>,
    /// Fundamental facts.
    pub facts: Vec<FundamentalFact>,
}

/// Multi-horizon walk-forward forecasting engine.
///
/// # Example
///
/// ```rust,ignore
/// use foresight::{EngineConfig, ForecastEngine};
/// use foresight::fmp::FmpClient;
///
/// let engine = ForecastEngine::new(FmpClient::from_env()?, EngineConfig::default())?;
/// let outcome = engine.forecast("7203", &[]).await?;
/// ```
#[derive(Debug)]
pub struct ForecastEngine<L> {
    loader: L,
    config: EngineConfig,
    builder: FeatureBuilder,
    trainer: WalkForwardTrainer,
}

impl<L: SeriesLoader> ForecastEngine<L> {
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`](foresight_traits::ForesightError::InvalidConfig)
    /// for an unusable configuration.
    pub fn new(loader: L, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: config.feature_builder(),
            trainer: config.trainer(),
            loader,
            config,
        })
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The engine's loader.
    #[must_use]
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Fetches prices, fundamentals and the display name concurrently.
    pub async fn load(&self, symbol: &str) -> SeriesInput {
        let lookback = self.config.lookback_days;
        let (bars, facts, company_name) = tokio::join!(
            self.loader.fetch_prices(symbol, lookback),
            self.loader.fetch_fundamentals(symbol, lookback),
            self.loader.company_name(symbol),
        );
        debug!(symbol, bars = bars.len(), facts = facts.len(), "loaded series");
        SeriesInput {
            company_name,
            bars,
            facts,
        }
    }

    /// Fetches `symbol` and forecasts `horizons` (the configured set when empty).
    ///
    /// # Errors
    ///
    /// Fails only for an unusable feature configuration; missing data yields
    /// [`ForecastOutcome::NoResult`].
    pub async fn forecast(&self, symbol: &str, horizons: &[Horizon]) -> Result<ForecastOutcome> {
        let input = self.load(symbol).await;
        let mut outcome = self.forecast_series(symbol, &input.bars, &input.facts, horizons)?;
        if let ForecastOutcome::Forecasts(report) = &mut outcome {
            report.company_name = input.company_name;
        }
        Ok(outcome)
    }

    /// Builds the feature table for already-fetched series.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InsufficientData`](foresight_traits::ForesightError::InsufficientData)
    /// when too few clean bars remain.
    pub fn feature_table(&self, bars: &[Bar], facts: &[FundamentalFact]) -> Result<FeatureTable> {
        self.builder.build(bars, facts)
    }

    /// Runs the pipeline on already-fetched series.
    ///
    /// Horizons are deduplicated; an empty slice means the configured set.
    /// The display name defaults to the symbol.
    ///
    /// # Errors
    ///
    /// Fails only for an unusable feature configuration.
    pub fn forecast_series(
        &self,
        symbol: &str,
        bars: &[Bar],
        facts: &[FundamentalFact],
        horizons: &[Horizon],
    ) -> Result<ForecastOutcome> {
        let horizons = if horizons.is_empty() {
            Horizon::dedup(&self.config.horizons)
        } else {
            Horizon::dedup(horizons)
        };

        let table = match self.builder.build(bars, facts) {
            Ok(table) => table,
            Err(e) if e.is_insufficient_data() => {
                let clean = normalize_bars(bars).len();
                let reason = if clean == 0 {
                    NoResultReason::NoPriceData
                } else {
                    NoResultReason::InsufficientHistory {
                        bars: clean,
                        required: self.config.features.min_observations,
                    }
                };
                warn!(symbol, %reason, "no forecast");
                return Ok(ForecastOutcome::NoResult(reason));
            }
            Err(e) => return Err(e),
        };

        let set = TrainingSet::assemble(&table, &horizons, self.config.walk_forward.n_splits);
        let Some(as_of) = set.live.as_ref().map(|(date, _)| *date) else {
            warn!(symbol, "no complete feature row");
            return Ok(ForecastOutcome::NoResult(NoResultReason::NoLiveRow));
        };

        let mut skipped = set.skipped.clone();
        let mut results = Vec::with_capacity(set.labels.len());
        for (horizon, outcome) in self.trainer.forecast_all(&set) {
            match outcome {
                Ok(forecast) => results.push(ForecastResult::from(&forecast)),
                Err(e) => skipped.push(SkippedHorizon {
                    horizon,
                    reason: e.to_string(),
                }),
            }
        }

        if results.is_empty() {
            warn!(symbol, skipped = skipped.len(), "no horizon produced a forecast");
            return Ok(ForecastOutcome::NoResult(NoResultReason::NoTrainableHorizon {
                skipped: order_skipped(skipped, &horizons),
            }));
        }

        info!(
            symbol,
            %as_of,
            horizons = results.len(),
            skipped = skipped.len(),
            quality = ?table.quality,
            "forecast complete"
        );
        Ok(ForecastOutcome::Forecasts(ForecastReport {
            symbol: symbol.to_string(),
            company_name: symbol.to_string(),
            as_of,
            quality: table.quality,
            results,
            skipped: order_skipped(skipped, &horizons),
            snapshot: Snapshot::from_table(&table, self.config.snapshot_rows),
        }))
    }
}

/// Puts skipped horizons back in request order.
fn order_skipped(mut skipped: Vec<SkippedHorizon>, horizons: &[Horizon]) -> Vec<SkippedHorizon> {
    skipped.sort_by_key(|s| horizons.iter().position(|h| *h == s.horizon));
    skipped
}
