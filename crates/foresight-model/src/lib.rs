//! Gradient-boosted decision trees for direction forecasting.
//!
//! This crate provides the learners plugged into the walk-forward trainer
//! through the [`DirectionModel`](foresight_traits::DirectionModel) seam:
//! a binary classifier on log-loss and a regressor on forward log-returns,
//! both built on the same seeded, exact-greedy boosting core.
//!
//! # Examples
//!
//! ```rust,no_run
//! use foresight_model::{BoostingConfig, ModelKind};
//! use foresight_traits::TrainingTargets;
//! use ndarray::Array2;
//!
//! let x = Array2::<f64>::zeros((50, 15));
//! let ups = vec![true; 50];
//! let returns = vec![0.01; 50];
//!
//! let mut model = ModelKind::Classifier.build(&BoostingConfig::default());
//! model.fit(x.view(), TrainingTargets::new(&ups, &returns)).unwrap();
//! let live = model.predict(x.view()).unwrap();
//! ```

mod boosting;
mod classifier;
mod kind;
mod objective;
mod regressor;
mod tree;

// Re-export main types
pub use boosting::{Booster, BoostingConfig};
pub use classifier::GradientBoostingClassifier;
pub use kind::ModelKind;
pub use objective::{LogLoss, Objective, SquaredError};
pub use regressor::GradientBoostingRegressor;
pub use tree::RegressionTree;
