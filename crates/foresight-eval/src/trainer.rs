//! Walk-Forward Trainer.
//!
//! For each horizon a fresh model is fitted on every fold's training
//! partition, in fold order. Only the last fold's model is kept, together
//! with its predictions on its own training rows; those feed the
//! expected-return estimate. Validation partitions are not scored.

use crate::expected_return::{ConditionalReturn, conditional_return};
use crate::walk_forward::{Fold, WalkForwardConfig, WalkForwardSplit};
use foresight_features::{HorizonLabels, TrainingSet};
use foresight_model::{BoostingConfig, ModelKind};
use foresight_traits::{
    Date, Direction, DirectionModel, DirectionalPrediction, ForesightError, Horizon,
    ProbabilitySource, Result, TrainingTargets,
};
use ndarray::{Array2, ArrayView2, s};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The last fold's model and what it predicted on its training rows.
#[derive(Debug)]
pub struct RetainedFold {
    /// The fold the model was fitted on.
    pub fold: Fold,
    /// Fitted model.
    pub model: Box<dyn DirectionModel>,
    /// In-sample predicted direction per training row.
    pub predicted: Vec<Direction>,
}

/// Forecast for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonForecast {
    /// Forecast horizon.
    pub horizon: Horizon,
    /// Date of the feature row the forecast was made from.
    pub as_of: Date,
    /// Live prediction.
    pub prediction: DirectionalPrediction,
    /// How to read `prediction.probability_up`.
    pub probability_source: ProbabilitySource,
    /// Conditional expected return.
    pub expected: ConditionalReturn,
    /// Folds fitted before the retained one was kept.
    pub folds_trained: usize,
}

/// Trains one model per fold and horizon, then forecasts the live row.
#[derive(Debug, Clone, Default)]
pub struct WalkForwardTrainer {
    split: WalkForwardSplit,
    kind: ModelKind,
    boosting: BoostingConfig,
}

impl WalkForwardTrainer {
    /// Creates a trainer.
    #[must_use]
    pub const fn new(
        walk_forward: WalkForwardConfig,
        kind: ModelKind,
        boosting: BoostingConfig,
    ) -> Self {
        Self {
            split: WalkForwardSplit::new(walk_forward),
            kind,
            boosting,
        }
    }

    /// Learner used for every fold.
    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Fits every fold for one horizon and keeps the last.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InsufficientData`] when the rows cannot form
    /// the configured folds, or the first fit or prediction error of any fold.
    pub fn fit_horizon(
        &self,
        features: ArrayView2<'_, f64>,
        labels: &HorizonLabels,
    ) -> Result<RetainedFold> {
        let folds = self.split.split(features.nrows())?;
        let mut retained = None;

        for fold in folds {
            let rows = fold.train.clone();
            let x = features.slice(s![rows.clone(), ..]);
            let targets = TrainingTargets::new(
                &labels.directions[rows.clone()],
                &labels.forward_returns[rows],
            );

            let mut model = self.kind.build(&self.boosting);
            model.fit(x, targets)?;
            debug!(
                horizon = %labels.horizon,
                fold = fold.index,
                train = fold.train.len(),
                validation = fold.validation.len(),
                model = model.name(),
                "fitted fold"
            );
            retained = Some((fold, model));
        }

        let (fold, model) = retained
            .ok_or_else(|| ForesightError::InsufficientData("no walk-forward folds".to_string()))?;
        let x = features.slice(s![fold.train.clone(), ..]);
        let predicted = model.predict(x)?.into_iter().map(|p| p.direction).collect();

        Ok(RetainedFold {
            fold,
            model,
            predicted,
        })
    }

    /// Trains one horizon and forecasts the live row.
    ///
    /// # Errors
    ///
    /// Returns an error when no live row exists or training fails.
    pub fn forecast_horizon(
        &self,
        set: &TrainingSet,
        labels: &HorizonLabels,
    ) -> Result<HorizonForecast> {
        let (as_of, live_row) = set
            .live
            .as_ref()
            .ok_or_else(|| {
                ForesightError::InsufficientData("no complete live feature row".to_string())
            })?;

        let retained = self.fit_horizon(set.features.view(), labels)?;

        let live = Array2::from_shape_vec((1, live_row.values().len()), live_row.values().to_vec())
            .map_err(|e| ForesightError::Prediction(e.to_string()))?;
        let prediction = retained
            .model
            .predict(live.view())?
            .into_iter()
            .next()
            .ok_or_else(|| ForesightError::Prediction("model returned no prediction".to_string()))?;

        let rows = retained.fold.train.clone();
        let expected = conditional_return(
            &retained.predicted,
            &labels.directions[rows.clone()],
            &labels.forward_returns[rows],
            prediction.direction,
        );

        info!(
            horizon = %labels.horizon,
            direction = %prediction.direction,
            probability_up = prediction.probability_up,
            expected_pct = expected.percent(),
            "horizon forecast"
        );

        Ok(HorizonForecast {
            horizon: labels.horizon,
            as_of: *as_of,
            prediction,
            probability_source: retained.model.probability_source(),
            expected,
            folds_trained: retained.fold.index + 1,
        })
    }

    /// Forecasts every trainable horizon of `set`, in order.
    ///
    /// Each horizon's outcome is returned separately; a failure in one does
    /// not stop the others.
    pub fn forecast_all(&self, set: &TrainingSet) -> Vec<(Horizon, Result<HorizonForecast>)> {
        set.labels
            .iter()
            .map(|labels| {
                let outcome = self.forecast_horizon(set, labels);
                if let Err(e) = &outcome {
                    warn!(horizon = %labels.horizon, error = %e, "horizon failed");
                }
                (labels.horizon, outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;
    use foresight_features::FeatureBuilder;
    use foresight_traits::Bar;

    fn uptrend(n: usize) -> Vec<Bar> {
        let start = Date::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n)
            .map(|i| {
                let c = 100.0 * 1.01f64.powi(i as i32);
                Bar::new(start + Duration::days(i as i64), c, c * 1.005, c * 0.995, c, 1e6)
            })
            .collect()
    }

    fn zigzag(n: usize) -> Vec<Bar> {
        let start = Date::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n)
            .map(|i| {
                let c = 100.0 + 5.0 * ((i as f64) * 0.7).sin() + 0.05 * i as f64;
                Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1e6)
            })
            .collect()
    }

    fn h(d: usize) -> Horizon {
        Horizon::new(d).unwrap()
    }

    #[test]
    fn test_uptrend_forecasts_up() {
        let table = FeatureBuilder::default().build(&uptrend(200), &[]).unwrap();
        let set = TrainingSet::assemble(&table, &[h(1), h(7)], 5);
        let trainer = WalkForwardTrainer::default();

        let results = trainer.forecast_all(&set);
        assert_eq!(results.len(), 2);
        for (_, outcome) in results {
            let forecast = outcome.unwrap();
            assert_eq!(forecast.prediction.direction, Direction::Up);
            assert!(forecast.prediction.probability_up >= 0.5);
            assert!(forecast.expected.mean_return > 0.0);
            assert_eq!(forecast.folds_trained, 5);
        }
    }

    #[test]
    fn test_retained_fold_is_last() {
        let table = FeatureBuilder::default().build(&zigzag(150), &[]).unwrap();
        let set = TrainingSet::assemble(&table, &[h(1)], 5);
        let trainer = WalkForwardTrainer::default();
        let retained = trainer.fit_horizon(set.features.view(), &set.labels[0]).unwrap();

        let n = set.n_rows();
        let test_size = n / 6;
        assert_eq!(retained.fold.index, 4);
        assert_eq!(retained.fold.train, 0..n - test_size);
        assert_eq!(retained.predicted.len(), n - test_size);
    }

    #[test]
    fn test_expected_return_matches_partition() {
        let table = FeatureBuilder::default().build(&zigzag(150), &[]).unwrap();
        let set = TrainingSet::assemble(&table, &[h(1)], 5);
        let labels = &set.labels[0];
        let trainer = WalkForwardTrainer::default();

        let forecast = trainer.forecast_horizon(&set, labels).unwrap();
        let retained = trainer.fit_horizon(set.features.view(), labels).unwrap();
        let rows = retained.fold.train.clone();

        let (sum, count) = rows
            .clone()
            .zip(&retained.predicted)
            .filter(|(i, p)| {
                **p == forecast.prediction.direction && labels.directions[*i] == p.is_up()
            })
            .fold((0.0, 0usize), |(s, c), (i, _)| (s + labels.forward_returns[i], c + 1));
        let expected = if count == 0 { 0.0 } else { sum / count as f64 };
        assert_relative_eq!(forecast.expected.mean_return, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let table = FeatureBuilder::default().build(&zigzag(150), &[]).unwrap();
        let set = TrainingSet::assemble(&table, &[h(1), h(7)], 5);
        let trainer = WalkForwardTrainer::default();
        let a: Vec<_> = trainer.forecast_all(&set).into_iter().map(|(_, r)| r.unwrap()).collect();
        let b: Vec<_> = trainer.forecast_all(&set).into_iter().map(|(_, r)| r.unwrap()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_regressor_variant_labels_probability() {
        let table = FeatureBuilder::default().build(&uptrend(150), &[]).unwrap();
        let set = TrainingSet::assemble(&table, &[h(1)], 5);
        let trainer = WalkForwardTrainer::new(
            WalkForwardConfig::default(),
            ModelKind::Regressor,
            BoostingConfig::default(),
        );
        let forecast = trainer.forecast_horizon(&set, &set.labels[0]).unwrap();
        assert_eq!(forecast.probability_source, ProbabilitySource::LogisticHeuristic);
        assert_eq!(forecast.prediction.direction, Direction::Up);
    }

    #[test]
    fn test_too_few_rows_is_insufficient() {
        let x = Array2::<f64>::zeros((4, 15));
        let labels = HorizonLabels {
            horizon: h(1),
            directions: vec![true; 4],
            forward_returns: vec![0.01; 4],
        };
        let err = WalkForwardTrainer::default().fit_horizon(x.view(), &labels).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
