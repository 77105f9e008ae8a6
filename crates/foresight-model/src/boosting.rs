//! Seeded gradient boosting over regression trees.

use crate::objective::Objective;
use crate::tree::{RegressionTree, TreeParams};
use foresight_traits::{ForesightError, Result};
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Configuration for gradient-boosted trees.
///
/// Defaults follow common LightGBM settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingConfig {
    /// Number of boosting rounds (default: 100)
    pub n_estimators: usize,

    /// Shrinkage applied to every tree (default: 0.1)
    pub learning_rate: f64,

    /// Maximum tree depth (default: 3)
    pub max_depth: usize,

    /// Minimum rows in a leaf (default: 20)
    pub min_samples_leaf: usize,

    /// Minimum hessian sum in a leaf (default: 1e-3)
    pub min_child_weight: f64,

    /// L2 penalty on leaf weights (default: 0.0)
    pub l2_regularization: f64,

    /// Fraction of rows drawn per tree (default: 1.0)
    pub subsample: f64,

    /// Fraction of features drawn per tree (default: 1.0)
    pub feature_fraction: f64,

    /// Random seed for row and feature sampling (default: 0)
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 20,
            min_child_weight: 1e-3,
            l2_regularization: 0.0,
            subsample: 1.0,
            feature_fraction: 1.0,
            seed: 0,
        }
    }
}

impl BoostingConfig {
    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] for zero rounds or depth,
    /// a learning rate or sampling fraction outside `(0, 1]`, or a negative
    /// regularization term.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(ForesightError::InvalidConfig(format!("{name} must be in (0, 1], got {v}")))
            }
        };
        if self.n_estimators == 0 {
            return Err(ForesightError::InvalidConfig("n_estimators must be positive".to_string()));
        }
        if self.max_depth == 0 {
            return Err(ForesightError::InvalidConfig("max_depth must be positive".to_string()));
        }
        unit("learning_rate", self.learning_rate)?;
        unit("subsample", self.subsample)?;
        unit("feature_fraction", self.feature_fraction)?;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(self.l2_regularization) || !non_negative(self.min_child_weight) {
            return Err(ForesightError::InvalidConfig(
                "l2_regularization and min_child_weight must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    const fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            min_child_weight: self.min_child_weight,
            lambda: self.l2_regularization,
        }
    }
}

/// An additive ensemble of trees trained against an [`Objective`].
#[derive(Debug, Clone)]
pub struct Booster<O: Objective> {
    config: BoostingConfig,
    objective: O,
    base_score: f64,
    trees: Vec<RegressionTree>,
    n_features: Option<usize>,
}

impl<O: Objective> Booster<O> {
    /// Creates an unfitted booster.
    #[must_use]
    pub const fn new(config: BoostingConfig, objective: O) -> Self {
        Self {
            config,
            objective,
            base_score: 0.0,
            trees: Vec::new(),
            n_features: None,
        }
    }

    /// The boosting configuration.
    #[must_use]
    pub const fn config(&self) -> &BoostingConfig {
        &self.config
    }

    /// The fitted trees, in boosting order.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Raw score every row starts from.
    #[must_use]
    pub const fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Fits the ensemble, discarding any previous fit.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::ModelFit`] for an empty or misaligned
    /// partition or non-finite inputs, and [`ForesightError::InvalidConfig`]
    /// for an invalid configuration.
    pub fn fit(&mut self, x: ArrayView2<'_, f64>, targets: &[f64]) -> Result<()> {
        self.check_inputs(x, targets)?;
        self.config.validate()?;

        let n = x.nrows();
        let n_features = x.ncols();
        let params = self.config.tree_params();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.trees.clear();
        self.base_score = self.objective.initial_score(targets);
        self.n_features = Some(n_features);

        let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|r| r.to_vec()).collect();
        let mut scores = vec![self.base_score; n];
        let mut grad = vec![0.0; n];
        let mut hess = vec![0.0; n];

        for round in 0..self.config.n_estimators {
            self.objective.gradients(targets, &scores, &mut grad, &mut hess);
            let sample = self.sample_rows(&mut rng, n);
            let features = self.sample_features(&mut rng, n_features);

            let tree = RegressionTree::fit(x.view(), &grad, &hess, sample, &features, &params);
            for (score, row) in scores.iter_mut().zip(&rows) {
                *score += self.config.learning_rate * tree.predict_row(row);
            }
            trace!(
                round,
                leaves = tree.n_leaves(),
                objective = self.objective.name(),
                "added tree"
            );
            self.trees.push(tree);
        }
        Ok(())
    }

    /// Fits a constant model that always returns the initial score.
    ///
    /// # Errors
    ///
    /// Same input checks as [`Booster::fit`].
    pub fn fit_constant(&mut self, x: ArrayView2<'_, f64>, targets: &[f64]) -> Result<()> {
        self.check_inputs(x, targets)?;
        self.trees.clear();
        self.base_score = self.objective.initial_score(targets);
        self.n_features = Some(x.ncols());
        Ok(())
    }

    /// Raw scores for every row.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::Prediction`] if the booster is unfitted or
    /// the feature width differs from training.
    pub fn raw_scores(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        let expected = self
            .n_features
            .ok_or_else(|| ForesightError::Prediction("model not fitted".to_string()))?;
        if x.ncols() != expected {
            return Err(ForesightError::Prediction(format!(
                "expected {expected} features, got {}",
                x.ncols()
            )));
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let row = row.to_vec();
                self.trees.iter().fold(self.base_score, |acc, tree| {
                    acc + self.config.learning_rate * tree.predict_row(&row)
                })
            })
            .collect())
    }

    /// Scores mapped through the objective's output transform.
    ///
    /// # Errors
    ///
    /// See [`Booster::raw_scores`].
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>> {
        Ok(self
            .raw_scores(x)?
            .into_iter()
            .map(|s| self.objective.transform(s))
            .collect())
    }

    fn check_inputs(&self, x: ArrayView2<'_, f64>, targets: &[f64]) -> Result<()> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ForesightError::ModelFit("empty training partition".to_string()));
        }
        if targets.len() != x.nrows() {
            return Err(ForesightError::ModelFit(format!(
                "{} rows but {} targets",
                x.nrows(),
                targets.len()
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ForesightError::ModelFit("non-finite feature value".to_string()));
        }
        if targets.iter().any(|v| !v.is_finite()) {
            return Err(ForesightError::ModelFit("non-finite target".to_string()));
        }
        Ok(())
    }

    fn sample_rows(&self, rng: &mut StdRng, n: usize) -> Vec<usize> {
        if self.config.subsample >= 1.0 {
            return (0..n).collect();
        }
        let picked: Vec<usize> = (0..n).filter(|_| rng.gen_bool(self.config.subsample)).collect();
        if picked.is_empty() { (0..n).collect() } else { picked }
    }

    fn sample_features(&self, rng: &mut StdRng, n_features: usize) -> Vec<usize> {
        if self.config.feature_fraction >= 1.0 {
            return (0..n_features).collect();
        }
        let k = ((n_features as f64 * self.config.feature_fraction).ceil() as usize)
            .clamp(1, n_features);
        let mut picked = rand::seq::index::sample(rng, n_features, k).into_vec();
        picked.sort_unstable();
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{LogLoss, SquaredError};
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn step_data(n: usize) -> (Array2<f64>, Vec<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 { i as f64 } else { (i % 5) as f64 }
        });
        let y = (0..n).map(|i| if i < n / 2 { -1.0 } else { 1.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BoostingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad = [
            BoostingConfig { n_estimators: 0, ..Default::default() },
            BoostingConfig { learning_rate: 0.0, ..Default::default() },
            BoostingConfig { learning_rate: 1.5, ..Default::default() },
            BoostingConfig { subsample: 0.0, ..Default::default() },
            BoostingConfig { l2_regularization: -1.0, ..Default::default() },
            BoostingConfig { max_depth: 0, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_regression_learns_step() {
        let (x, y) = step_data(100);
        let mut booster = Booster::new(BoostingConfig::default(), SquaredError);
        booster.fit(x.view(), &y).unwrap();
        let pred = booster.predict(x.view()).unwrap();
        assert!(pred[10] < -0.9);
        assert!(pred[90] > 0.9);
        assert_eq!(booster.trees().len(), 100);
    }

    #[test]
    fn test_classifier_scores_are_probabilities() {
        let (x, y) = step_data(100);
        let y: Vec<f64> = y.iter().map(|v| if *v > 0.0 { 1.0 } else { 0.0 }).collect();
        let mut booster = Booster::new(BoostingConfig::default(), LogLoss);
        booster.fit(x.view(), &y).unwrap();
        let p = booster.predict(x.view()).unwrap();
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(p[5] < 0.5);
        assert!(p[95] > 0.5);
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let (x, y) = step_data(80);
        let config = BoostingConfig {
            subsample: 0.7,
            feature_fraction: 0.5,
            seed: 42,
            ..Default::default()
        };
        let mut a = Booster::new(config.clone(), SquaredError);
        let mut b = Booster::new(config, SquaredError);
        a.fit(x.view(), &y).unwrap();
        b.fit(x.view(), &y).unwrap();
        assert_eq!(a.raw_scores(x.view()).unwrap(), b.raw_scores(x.view()).unwrap());
        assert_eq!(a.trees(), b.trees());
    }

    #[test]
    fn test_refit_discards_previous_state() {
        let (x, y) = step_data(60);
        let mut booster = Booster::new(BoostingConfig::default(), SquaredError);
        booster.fit(x.view(), &y).unwrap();
        let first = booster.raw_scores(x.view()).unwrap();
        booster.fit(x.view(), &y).unwrap();
        assert_eq!(booster.trees().len(), 100);
        assert_eq!(booster.raw_scores(x.view()).unwrap(), first);
    }

    #[test]
    fn test_fit_errors() {
        let mut booster = Booster::new(BoostingConfig::default(), SquaredError);
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(booster.fit(empty.view(), &[]), Err(ForesightError::ModelFit(_))));

        let x = Array2::<f64>::zeros((3, 2));
        assert!(booster.fit(x.view(), &[1.0, 2.0]).is_err());

        let mut bad = Array2::<f64>::zeros((2, 2));
        bad[[1, 1]] = f64::NAN;
        assert!(booster.fit(bad.view(), &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_predict_checks_width_and_fit() {
        let booster = Booster::new(BoostingConfig::default(), SquaredError);
        let x = Array2::<f64>::zeros((2, 2));
        assert!(matches!(booster.raw_scores(x.view()), Err(ForesightError::Prediction(_))));

        let mut booster = booster;
        booster.fit_constant(x.view(), &[1.0, 3.0]).unwrap();
        assert_relative_eq!(booster.raw_scores(x.view()).unwrap()[0], 2.0);
        let wide = Array2::<f64>::zeros((1, 3));
        assert!(booster.raw_scores(wide.view()).is_err());
    }
}
