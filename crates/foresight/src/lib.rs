#![doc(issue_tracker_base_url = "https://github.com/foresight-rs/foresight/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # foresight
//!
//! Multi-horizon walk-forward direction forecasting for single equities.
//!
//! foresight takes one symbol's daily price history and its sparse
//! fundamentals, and for each requested horizon predicts whether the close
//! will be higher `h` trading days ahead, with a probability and an expected
//! return conditioned on the model's own hit record.
//!
//! This umbrella crate holds the engine and the result formatter, and
//! re-exports the sub-crates.
//!
//! ## Quick Start
//!
//! ```ignore
//! use foresight::fmp::FmpClient;
//! use foresight::{EngineConfig, ForecastEngine, format};
//!
//! # async fn run() -> foresight::Result<()> {
//! let client = FmpClient::from_env().map_err(foresight::ForesightError::from)?;
//! let engine = ForecastEngine::new(client, EngineConfig::default())?;
//!
//! let outcome = engine.forecast("7203", &[]).await?;
//! println!("{}", format::render_outcome("7203", &outcome));
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, the error type, and the loader and model seams
//! - [`features`] - Indicators, Feature Builder and Label Builder
//! - [`model`] - Seeded gradient-boosted classifier and regressor
//! - [`eval`] - Walk-forward splits, trainer and expected-return estimator
//! - [`fmp`] - Series loader over the Financial Modeling Prep API
//! - [`report`] - Narrative report boundary
//!
//! ## Pipeline
//!
//! 1. **Features**: lagged returns, as-of fundamentals and technical indicators
//! 2. **Labels**: forward direction and return per horizon
//! 3. **Training**: one fresh model per walk-forward fold; the last is kept
//! 4. **Estimate**: live prediction plus conditional expected return
//! 5. **Format**: rounded rows, style hints, optional narrative report

/// Version information for the foresight crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod engine;
pub mod format;
pub mod result;
pub mod snapshot;

pub use config::{EngineConfig, ModelConfig};
pub use engine::{ForecastEngine, SeriesInput};
pub use result::{ForecastOutcome, ForecastReport, ForecastResult, NoResultReason};
pub use snapshot::{Snapshot, SnapshotRow};

// Re-export error types
pub use foresight_traits::{ForesightError, Result};

// Re-export common types
pub use foresight_traits::{Bar, Date, Direction, FundamentalFact, Horizon, SeriesLoader};

// ============================================================================
// Sub-crates
// ============================================================================

/// Shared types and trait seams.
pub mod traits {
    pub use foresight_traits::*;
}

/// Series normalization, indicators, and feature and label construction.
pub mod features {
    pub use foresight_features::*;
}

/// Gradient-boosted direction models.
///
/// ## Available Models
///
/// - **GradientBoostingClassifier**: log-loss on the direction label
/// - **GradientBoostingRegressor**: squared error on the forward log-return;
///   its probability is a logistic heuristic, not a calibrated estimate
pub mod model {
    pub use foresight_model::*;
}

/// Walk-forward training and the expected-return estimator.
pub mod eval {
    pub use foresight_eval::*;
}

/// Financial Modeling Prep (FMP) series loader.
///
/// ## Setup
///
/// 1. Get a free API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
pub mod fmp {
    pub use foresight_fmp::*;
}

/// Narrative report generation.
pub mod report {
    pub use foresight_report::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use foresight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bar, Date, Direction, EngineConfig, ForecastEngine, ForecastOutcome, ForecastResult,
        ForesightError, FundamentalFact, Horizon, Result, SeriesLoader,
    };
}
