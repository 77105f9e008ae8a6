//! Boosted regressor on forward log-returns.

use crate::boosting::{Booster, BoostingConfig};
use crate::objective::SquaredError;
use foresight_traits::stats::sigmoid;
use foresight_traits::{
    Direction, DirectionModel, DirectionalPrediction, ForesightError, ProbabilitySource, Result,
    TrainingTargets,
};
use ndarray::ArrayView2;

/// Gradient-boosted trees regressing `ln(1 + forward_return)`.
///
/// The direction is UP when the predicted log-return is non-negative. The
/// reported probability is `sigmoid(prediction)`, a display heuristic rather
/// than a calibrated probability.
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    booster: Booster<SquaredError>,
}

impl GradientBoostingRegressor {
    /// Creates an unfitted regressor.
    #[must_use]
    pub const fn new(config: BoostingConfig) -> Self {
        Self {
            booster: Booster::new(config, SquaredError),
        }
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new(BoostingConfig::default())
    }
}

impl DirectionModel for GradientBoostingRegressor {
    fn name(&self) -> &str {
        "gbdt_log_return_regressor"
    }

    fn probability_source(&self) -> ProbabilitySource {
        ProbabilitySource::LogisticHeuristic
    }

    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: TrainingTargets<'_>) -> Result<()> {
        targets.validate(features.nrows())?;
        let y = targets
            .forward_returns
            .iter()
            .map(|&r| {
                if r > -1.0 {
                    Ok(r.ln_1p())
                } else {
                    Err(ForesightError::ModelFit(format!("forward return {r} has no log-return")))
                }
            })
            .collect::<Result<Vec<f64>>>()?;
        self.booster.fit(features, &y)
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Vec<DirectionalPrediction>> {
        Ok(self
            .booster
            .raw_scores(features)?
            .into_iter()
            .map(|score| DirectionalPrediction {
                direction: Direction::from_return(score),
                probability_up: sigmoid(score),
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn test_direction_follows_predicted_return() {
        let n = 80;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let returns: Vec<f64> = (0..n).map(|i| if i < n / 2 { -0.05 } else { 0.05 }).collect();
        let ups: Vec<bool> = returns.iter().map(|r| *r > 0.0).collect();

        let mut model = GradientBoostingRegressor::default();
        model.fit(x.view(), TrainingTargets::new(&ups, &returns)).unwrap();
        let preds = model.predict(x.view()).unwrap();

        assert_eq!(preds[0].direction, Direction::Down);
        assert_eq!(preds[79].direction, Direction::Up);
        assert_relative_eq!(preds[79].score, 0.05f64.ln_1p(), epsilon = 1e-3);
        assert_relative_eq!(preds[79].probability_up, sigmoid(preds[79].score));
        assert_eq!(model.probability_source(), ProbabilitySource::LogisticHeuristic);
    }

    #[test]
    fn test_total_loss_rejected() {
        let x = Array2::<f64>::zeros((2, 1));
        let mut model = GradientBoostingRegressor::default();
        let err = model
            .fit(x.view(), TrainingTargets::new(&[false, true], &[-1.0, 0.1]))
            .unwrap_err();
        assert!(matches!(err, ForesightError::ModelFit(_)));
    }
}
