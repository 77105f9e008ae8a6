//! Feature registry for describing the columns of a feature row.
//!
//! The registry mirrors [`FEATURE_NAMES`](crate::builder::FEATURE_NAMES) and
//! adds a category, a description and the warm-up each column needs under
//! the default configuration.

use crate::builder::FeatureConfig;
use serde::{Deserialize, Serialize};

/// Feature category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    /// Lagged daily returns
    Lag,
    /// Disclosed fundamentals joined as of each day
    Fundamental,
    /// Technical indicators
    Technical,
}

impl FeatureCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Lag => "Daily returns of the previous five sessions",
            Self::Fundamental => "Latest disclosed figures, usable after the disclosure lag",
            Self::Technical => "Price-derived momentum and volatility indicators",
        }
    }
}

/// Metadata about one feature column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInfo {
    /// Column name
    pub name: &'static str,

    /// Category classification
    pub category: FeatureCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Index of the first day the column can be defined
    pub warmup_days: usize,

    /// Whether the column comes from fundamentals
    pub requires_fundamentals: bool,
}

/// Describes every feature column, in row order, for `config`.
#[must_use]
pub fn feature_catalog(config: &FeatureConfig) -> Vec<FeatureInfo> {
    let lag = |name, description, days: usize| FeatureInfo {
        name,
        category: FeatureCategory::Lag,
        description,
        warmup_days: days + 1,
        requires_fundamentals: false,
    };
    let fundamental = |name, description| FeatureInfo {
        name,
        category: FeatureCategory::Fundamental,
        description,
        warmup_days: 0,
        requires_fundamentals: true,
    };
    let technical = |name, description, warmup_days| FeatureInfo {
        name,
        category: FeatureCategory::Technical,
        description,
        warmup_days,
        requires_fundamentals: false,
    };

    let macd_line = config.macd_slow.saturating_sub(1);
    let macd_signal = (macd_line + config.macd_signal).saturating_sub(1);

    vec![
        lag("lag_1", "Return one session ago", 1),
        lag("lag_2", "Return two sessions ago", 2),
        lag("lag_3", "Return three sessions ago", 3),
        lag("lag_4", "Return four sessions ago", 4),
        lag("lag_5", "Return five sessions ago", 5),
        fundamental("eps", "Earnings per share"),
        fundamental("pe", "Price-to-earnings ratio"),
        fundamental("pb", "Price-to-book ratio"),
        technical("rsi", "Relative strength index", config.rsi_period.saturating_sub(1)),
        technical("macd", "MACD line (fast EMA minus slow EMA)", macd_line),
        technical("macd_signal", "EMA of the MACD line", macd_signal),
        technical("macd_hist", "MACD line minus signal", macd_signal),
        technical("stoch_k", "Stochastic %K", config.stoch_window.saturating_sub(1)),
        technical(
            "stoch_d",
            "Stochastic %D (SMA of %K)",
            (config.stoch_window + config.stoch_smooth).saturating_sub(2),
        ),
        technical("atr", "Average true range", config.atr_period.saturating_sub(1)),
    ]
}

/// Describes every feature column under the default configuration.
#[must_use]
pub fn available_features() -> Vec<FeatureInfo> {
    feature_catalog(&FeatureConfig::default())
}

/// Get all features in a specific category.
#[must_use]
pub fn features_by_category(category: &FeatureCategory) -> Vec<FeatureInfo> {
    available_features()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific feature by name.
#[must_use]
pub fn get_feature_info(name: &str) -> Option<FeatureInfo> {
    available_features()
        .into_iter()
        .find(|info| info.name == name)
}

/// First index at which every column is defined.
#[must_use]
pub fn warmup_days(config: &FeatureConfig) -> usize {
    feature_catalog(config)
        .iter()
        .map(|info| info.warmup_days)
        .max()
        .unwrap_or(0)
}
