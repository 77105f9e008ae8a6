//! Engine configuration.
//!
//! Every section has documented defaults, so an empty JSON object is a valid
//! configuration file.

use foresight_eval::{WalkForwardConfig, WalkForwardTrainer};
use foresight_features::{FeatureBuilder, FeatureConfig};
use foresight_model::{BoostingConfig, ModelKind};
use foresight_traits::{ForesightError, Horizon, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Learner selection and its hyperparameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Learner fitted per fold (default: classifier)
    pub kind: ModelKind,
    /// Boosting hyperparameters shared by both learners
    pub boosting: BoostingConfig,
}

/// Top-level configuration of a [`ForecastEngine`](crate::ForecastEngine).
///
/// # Example
///
/// ```rust
/// use foresight::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{"horizons": [1, 5], "model": {"kind": "regressor"}}"#).unwrap();
/// assert_eq!(config.horizons.len(), 2);
/// assert_eq!(config.lookback_days, 730);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Horizons forecast when a call names none (default: 1, 7, 28)
    pub horizons: Vec<Horizon>,
    /// Calendar days of history requested from the loader (default: 730)
    pub lookback_days: u32,
    /// Feature builder settings
    pub features: FeatureConfig,
    /// Fold settings
    pub walk_forward: WalkForwardConfig,
    /// Model settings
    pub model: ModelConfig,
    /// Days shown in the latest-data snapshot (default: 5)
    pub snapshot_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizons: Horizon::defaults(),
            lookback_days: 730,
            features: FeatureConfig::default(),
            walk_forward: WalkForwardConfig::default(),
            model: ModelConfig::default(),
            snapshot_rows: 5,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] for malformed JSON or a zero
    /// horizon.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ForesightError::InvalidConfig(e.to_string()))
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ForesightError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.horizons.is_empty() {
            return Err(ForesightError::InvalidConfig(
                "at least one horizon is required".to_string(),
            ));
        }
        if self.lookback_days == 0 {
            return Err(ForesightError::InvalidConfig("lookback_days must be positive".to_string()));
        }
        self.features.validate()?;
        self.walk_forward.validate()?;
        self.model.boosting.validate()
    }

    /// Feature builder for these settings.
    #[must_use]
    pub fn feature_builder(&self) -> FeatureBuilder {
        FeatureBuilder::new(self.features.clone())
    }

    /// Walk-forward trainer for these settings.
    #[must_use]
    pub fn trainer(&self) -> WalkForwardTrainer {
        WalkForwardTrainer::new(
            self.walk_forward.clone(),
            self.model.kind,
            self.model.boosting.clone(),
        )
    }
}
