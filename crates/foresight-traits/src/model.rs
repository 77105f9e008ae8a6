//! Direction model trait for per-horizon forecasting.
//!
//! This module defines the `DirectionModel` trait, the seam between the
//! walk-forward trainer and the concrete learners. A model is fitted on one
//! training partition, then asked for a direction and an up-probability on
//! any row with the same feature schema.

use crate::{Direction, ForesightError, Result};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a prediction's up-probability comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilitySource {
    /// Output of a probabilistic classifier.
    Classifier,
    /// Logistic transform of a predicted log-return. A display heuristic,
    /// not a calibrated probability.
    LogisticHeuristic,
}

/// A single row's prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalPrediction {
    /// Predicted direction.
    pub direction: Direction,
    /// Probability of an up move in `[0, 1]`.
    pub probability_up: f64,
    /// Raw model output (log-odds or predicted log-return).
    pub score: f64,
}

/// Labels for one training partition, row-aligned with the feature matrix.
#[derive(Debug, Clone, Copy)]
pub struct TrainingTargets<'a> {
    /// `true` where the close rose over the horizon.
    pub directions: &'a [bool],
    /// Simple forward return over the horizon.
    pub forward_returns: &'a [f64],
}

impl<'a> TrainingTargets<'a> {
    /// Creates targets from aligned slices.
    #[must_use]
    pub const fn new(directions: &'a [bool], forward_returns: &'a [f64]) -> Self {
        Self {
            directions,
            forward_returns,
        }
    }

    /// Number of labelled rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.directions.len()
    }

    /// Returns true when there are no labelled rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Checks that targets line up with a feature matrix of `n_rows` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::ModelFit`] on an empty partition, a length
    /// mismatch, or a non-finite forward return.
    pub fn validate(&self, n_rows: usize) -> Result<()> {
        if n_rows == 0 || self.is_empty() {
            return Err(ForesightError::ModelFit("empty training partition".to_string()));
        }
        if self.directions.len() != n_rows || self.forward_returns.len() != n_rows {
            return Err(ForesightError::ModelFit(format!(
                "target length mismatch: {} rows, {} directions, {} returns",
                n_rows,
                self.directions.len(),
                self.forward_returns.len()
            )));
        }
        if let Some(i) = self.forward_returns.iter().position(|r| !r.is_finite()) {
            return Err(ForesightError::ModelFit(format!(
                "non-finite forward return at row {i}"
            )));
        }
        Ok(())
    }
}

/// A learner that forecasts the direction of a price over a fixed horizon.
///
/// Implementations are fitted once per walk-forward fold and then discarded,
/// so `fit` must fully reset any previous state. Fitting must be deterministic
/// for a fixed configuration (including any random seed).
///
/// # Example
///
/// ```no_run
/// use foresight_traits::{
///     Direction, DirectionModel, DirectionalPrediction, ProbabilitySource, Result,
///     TrainingTargets,
/// };
/// use ndarray::ArrayView2;
///
/// #[derive(Debug, Default)]
/// struct BaseRate {
///     p_up: f64,
/// }
///
/// impl DirectionModel for BaseRate {
///     fn name(&self) -> &str {
///         "base_rate"
///     }
///
///     fn probability_source(&self) -> ProbabilitySource {
///         ProbabilitySource::Classifier
///     }
///
///     fn fit(&mut self, features: ArrayView2<'_, f64>, targets: TrainingTargets<'_>) -> Result<()> {
///         targets.validate(features.nrows())?;
///         let ups = targets.directions.iter().filter(|&&up| up).count();
///         self.p_up = ups as f64 / targets.len() as f64;
///         Ok(())
///     }
///
///     fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<DirectionalPrediction>> {
///         Ok(vec![
///             DirectionalPrediction {
///                 direction: Direction::from_probability(self.p_up),
///                 probability_up: self.p_up,
///                 score: self.p_up,
///             };
///             features.nrows()
///         ])
///     }
/// }
/// ```
pub trait DirectionModel: Send + Sync + fmt::Debug {
    /// Name of the learner, used in logs.
    fn name(&self) -> &str;

    /// How `probability_up` should be interpreted.
    fn probability_source(&self) -> ProbabilitySource;

    /// Fits the model on one training partition.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::ModelFit`] if the partition cannot be fitted
    /// (empty, misaligned, or containing non-finite values).
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: TrainingTargets<'_>) -> Result<()>;

    /// Predicts every row of `features`.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::Prediction`] if the model is unfitted or the
    /// feature width differs from the training schema.
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<DirectionalPrediction>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[derive(Debug, Default)]
    struct MajorityModel {
        p_up: Option<f64>,
    }

    impl DirectionModel for MajorityModel {
        fn name(&self) -> &str {
            "majority"
        }

        fn probability_source(&self) -> ProbabilitySource {
            ProbabilitySource::Classifier
        }

        fn fit(
            &mut self,
            features: ArrayView2<'_, f64>,
            targets: TrainingTargets<'_>,
        ) -> Result<()> {
            targets.validate(features.nrows())?;
            let ups = targets.directions.iter().filter(|&&up| up).count();
            self.p_up = Some(ups as f64 / targets.len() as f64);
            Ok(())
        }

        fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<DirectionalPrediction>> {
            let p = self
                .p_up
                .ok_or_else(|| ForesightError::Prediction("model not fitted".to_string()))?;
            Ok((0..features.nrows())
                .map(|_| DirectionalPrediction {
                    direction: Direction::from_probability(p),
                    probability_up: p,
                    score: p,
                })
                .collect())
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_mismatch() {
        let empty = TrainingTargets::new(&[], &[]);
        assert!(matches!(empty.validate(0), Err(ForesightError::ModelFit(_))));

        let targets = TrainingTargets::new(&[true, false], &[0.1, -0.1]);
        assert!(targets.validate(2).is_ok());
        assert!(targets.validate(3).is_err());

        let bad = TrainingTargets::new(&[true], &[f64::NAN]);
        assert!(bad.validate(1).is_err());
    }

    #[test]
    fn test_model_fit_then_predict() {
        let mut model = MajorityModel::default();
        let x = Array2::<f64>::zeros((3, 2));
        assert!(model.predict(x.view()).is_err());

        let targets = TrainingTargets::new(&[true, true, false], &[0.01, 0.02, -0.01]);
        model.fit(x.view(), targets).unwrap();

        let preds = model.predict(x.view()).unwrap();
        assert_eq!(preds.len(), 3);
        assert_eq!(preds[0].direction, Direction::Up);
    }

    #[test]
    fn test_model_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DirectionModel>();
    }
}
