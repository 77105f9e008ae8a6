//! Feature and label construction for the foresight forecasting engine.
//!
//! This crate turns one symbol's raw series into model-ready data:
//! - Series normalization: ordering, de-duplication and price sanity checks
//! - Indicators: RSI, MACD, stochastic oscillator, ATR and moving averages
//! - Feature Builder: lagged returns, as-of fundamentals and indicators per day
//! - Label Builder: forward direction and return per horizon, plus the shared
//!   training set handed to the walk-forward trainer
//!
//! # Example
//!
//! ```ignore
//! use foresight_features::{FeatureBuilder, TrainingSet};
//! use foresight_traits::Horizon;
//!
//! let table = FeatureBuilder::default().build(&bars, &facts)?;
//! let set = TrainingSet::assemble(&table, &Horizon::defaults(), 5);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builder;
pub mod indicators;
pub mod labels;
pub mod registry;
pub mod series;

// Re-export key types
pub use builder::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureBuilder, FeatureConfig, FeatureTable, FeatureVector,
    FundamentalsQuality,
};
pub use labels::{HorizonLabels, LabelSet, SkippedHorizon, TrainingSet, label_set};
pub use registry::{FeatureCategory, FeatureInfo};
pub use series::{normalize_bars, normalize_facts};
