//! Error types for the foresight engine.
//!
//! Each pipeline stage reports through [`ForesightError`], so callers can tell
//! "no data" apart from "partial data" and "fit failure" instead of receiving a
//! uniform empty value.

use thiserror::Error;

/// The main error type for foresight operations.
#[derive(Debug, Error)]
pub enum ForesightError {
    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a frame.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// A model could not be fitted on its training partition.
    #[error("Model fit failed: {0}")]
    ModelFit(String),

    /// A fitted model could not produce a prediction.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Error fetching data from external sources.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Error when a configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl ForesightError {
    /// Returns true for the recoverable "not enough history" condition.
    #[must_use]
    pub const fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

impl From<String> for ForesightError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ForesightError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for foresight operations.
pub type Result<T> = std::result::Result<T, ForesightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForesightError::ModelFit("empty partition".to_string());
        assert_eq!(err.to_string(), "Model fit failed: empty partition");

        let err = ForesightError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "Missing required column: close");
    }

    #[test]
    fn test_insufficient_data_predicate() {
        assert!(ForesightError::InsufficientData("29 bars".into()).is_insufficient_data());
        assert!(!ForesightError::InvalidData("bad".into()).is_insufficient_data());
    }

    #[test]
    fn test_error_from_str() {
        let err: ForesightError = "boom".into();
        assert!(matches!(err, ForesightError::Other(ref s) if s == "boom"));
    }
}
