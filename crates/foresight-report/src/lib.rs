//! Narrative report generation for foresight forecasts.
//!
//! The engine hands finished forecast rows and a short snapshot of the latest
//! indicator values to a [`ReportGenerator`]. [`narrate`] never fails: a
//! missing API key or a service error turns into a readable message instead.
//!
//! # Environment Variables
//!
//! Set `GEMINI_API_KEY` in your environment or `.env` file to enable the
//! Gemini backend.

mod client;
mod error;
mod generator;
mod prompt;
mod types;

pub use client::{GeminiClient, GeminiConfig};
pub use error::ReportError;
pub use generator::{MISSING_KEY_MESSAGE, ReportGenerator, narrate};
pub use prompt::build_prompt;
pub use types::{ForecastRecord, ReportRequest, SnapshotRecord};

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
