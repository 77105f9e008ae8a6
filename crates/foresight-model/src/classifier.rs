//! Boosted binary classifier for the up/down direction.

use crate::boosting::{Booster, BoostingConfig};
use crate::objective::LogLoss;
use foresight_traits::stats::sigmoid;
use foresight_traits::{
    Direction, DirectionModel, DirectionalPrediction, ProbabilitySource, Result, TrainingTargets,
};
use ndarray::ArrayView2;
use tracing::debug;

/// Gradient-boosted trees on log-loss, predicting `P(up)`.
///
/// A training partition containing only one class yields a constant model at
/// the clamped prior instead of an error.
///
/// # Examples
///
/// ```rust,no_run
/// use foresight_model::{BoostingConfig, GradientBoostingClassifier};
/// use foresight_traits::{DirectionModel, TrainingTargets};
/// use ndarray::Array2;
///
/// let x = Array2::<f64>::zeros((40, 3));
/// let ups: Vec<bool> = (0..40).map(|i| i % 2 == 0).collect();
/// let returns = vec![0.0; 40];
///
/// let mut model = GradientBoostingClassifier::new(BoostingConfig::default());
/// model.fit(x.view(), TrainingTargets::new(&ups, &returns)).unwrap();
/// let preds = model.predict(x.view()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    booster: Booster<LogLoss>,
}

impl GradientBoostingClassifier {
    /// Creates an unfitted classifier.
    #[must_use]
    pub const fn new(config: BoostingConfig) -> Self {
        Self {
            booster: Booster::new(config, LogLoss),
        }
    }

    /// Number of fitted trees (zero for a constant model).
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.booster.trees().len()
    }
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new(BoostingConfig::default())
    }
}

impl DirectionModel for GradientBoostingClassifier {
    fn name(&self) -> &str {
        "gbdt_classifier"
    }

    fn probability_source(&self) -> ProbabilitySource {
        ProbabilitySource::Classifier
    }

    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: TrainingTargets<'_>) -> Result<()> {
        targets.validate(features.nrows())?;
        let y: Vec<f64> = targets
            .directions
            .iter()
            .map(|&up| if up { 1.0 } else { 0.0 })
            .collect();

        let ups = targets.directions.iter().filter(|&&up| up).count();
        if ups == 0 || ups == targets.len() {
            debug!(rows = targets.len(), ups, "single-class partition, fitting constant prior");
            return self.booster.fit_constant(features, &y);
        }
        self.booster.fit(features, &y)
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<DirectionalPrediction>> {
        Ok(self
            .booster
            .raw_scores(features)?
            .into_iter()
            .map(|score| {
                let probability_up = sigmoid(score);
                DirectionalPrediction {
                    direction: Direction::from_probability(probability_up),
                    probability_up,
                    score,
                }
            })
            .collect())
    }
}
