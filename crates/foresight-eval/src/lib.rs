//! Walk-forward training and evaluation for foresight.
//!
//! This crate provides:
//! - Forward-chaining walk-forward splits
//! - The Walk-Forward Trainer, which fits one model per fold and horizon and
//!   keeps the last fold's model for live inference
//! - The conditional Expected-Return Estimator
//!
//! # Example
//!
//! ```rust,ignore
//! use foresight_eval::WalkForwardTrainer;
//! use foresight_features::{FeatureBuilder, TrainingSet};
//!
//! let table = FeatureBuilder::default().build(&bars, &facts)?;
//! let set = TrainingSet::assemble(&table, &horizons, 5);
//! for (horizon, outcome) in WalkForwardTrainer::default().forecast_all(&set) {
//!     println!("{horizon}: {:?}", outcome.map(|f| f.prediction.direction));
//! }
//! ```

pub mod expected_return;
pub mod trainer;
pub mod walk_forward;

// Re-export main types
pub use expected_return::{ConditionalReturn, conditional_return};
pub use trainer::{HorizonForecast, RetainedFold, WalkForwardTrainer};
pub use walk_forward::{Fold, WalkForwardConfig, WalkForwardSplit};
