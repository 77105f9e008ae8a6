//! Selection of the learner used for every horizon.

use crate::boosting::BoostingConfig;
use crate::classifier::GradientBoostingClassifier;
use crate::regressor::GradientBoostingRegressor;
use foresight_traits::DirectionModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which learner the trainer fits per fold.
///
/// # Examples
///
/// ```rust,no_run
/// use foresight_model::{BoostingConfig, ModelKind};
///
/// let kind: ModelKind = "regressor".parse().unwrap();
/// let model = kind.build(&BoostingConfig::default());
/// assert_eq!(model.name(), "gbdt_log_return_regressor");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Binary classifier on the direction label.
    #[default]
    Classifier,
    /// Regressor on the forward log-return.
    Regressor,
}

impl ModelKind {
    /// Creates a fresh, unfitted model of this kind.
    #[must_use]
    pub fn build(self, config: &BoostingConfig) -> Box<dyn DirectionModel> {
        match self {
            Self::Classifier => Box::new(GradientBoostingClassifier::new(config.clone())),
            Self::Regressor => Box::new(GradientBoostingRegressor::new(config.clone())),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Regressor => "regressor",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classifier" => Ok(Self::Classifier),
            "regressor" => Ok(Self::Regressor),
            other => Err(format!(
                "unknown model kind '{other}' (expected classifier or regressor)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_traits::ProbabilitySource;

    #[test]
    fn test_build_matches_kind() {
        let config = BoostingConfig::default();
        let classifier = ModelKind::Classifier.build(&config);
        assert_eq!(classifier.probability_source(), ProbabilitySource::Classifier);

        let regressor = ModelKind::Regressor.build(&config);
        assert_eq!(regressor.probability_source(), ProbabilitySource::LogisticHeuristic);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Regressor".parse::<ModelKind>().unwrap(), ModelKind::Regressor);
        assert_eq!(ModelKind::Classifier.to_string(), "classifier");
        assert!("forest".parse::<ModelKind>().is_err());
        assert_eq!(ModelKind::default(), ModelKind::Classifier);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ModelKind::Regressor).unwrap();
        assert_eq!(json, "\"regressor\"");
    }
}
