#![doc(issue_tracker_base_url = "https://github.com/foresight-rs/foresight/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait seams for the foresight forecasting engine.
//!
//! This crate provides the records the engine consumes (bars and fundamental
//! facts), the horizon and direction types it produces, the shared error type,
//! and the two seams other crates plug into: [`SeriesLoader`] for data and
//! [`DirectionModel`] for learners.

/// The version of the foresight-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod loader;
pub mod model;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{ForesightError, Result};
pub use loader::SeriesLoader;
pub use model::{DirectionModel, DirectionalPrediction, ProbabilitySource, TrainingTargets};
pub use types::{Bar, Date, Direction, FundamentalFact, Horizon, MarketData, Symbol};
