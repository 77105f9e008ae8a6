//! Error types for report generation.

use thiserror::Error;

/// Errors raised while generating a narrative report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Missing API key.
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization or parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with an error status.
    #[error("API error: {0}")]
    Api(String),

    /// The service answered without any text.
    #[error("empty response")]
    EmptyResponse,
}
