//! Report generator boundary and the best-effort narration entry point.

use crate::{Result, types::ReportRequest};
use async_trait::async_trait;
use tracing::warn;

/// Text returned when no generator is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "Gemini API key is not configured. Please set the GEMINI_API_KEY environment variable.";

/// Produces a narrative report from forecast rows.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Name of the backing service, used in fallback text.
    fn name(&self) -> &str;

    /// Generates the report text.
    async fn generate(&self, request: &ReportRequest) -> Result<String>;
}

/// Generates a report, never failing.
///
/// Without a generator the missing-key message is returned; a generator
/// error becomes a one-line apology naming the service.
pub async fn narrate(generator: Option<&dyn ReportGenerator>, request: &ReportRequest) -> String {
    let Some(generator) = generator else {
        return MISSING_KEY_MESSAGE.to_string();
    };
    match generator.generate(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(service = generator.name(), error = %e, "report generation failed");
            format!("Error generating report from {}: {e}", generator.name())
        }
    }
}
