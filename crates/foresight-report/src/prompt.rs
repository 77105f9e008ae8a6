//! Analyst prompt assembly.

use crate::types::ReportRequest;

/// Builds the analyst-report prompt for `request`.
///
/// The prompt carries the company name and symbol, the latest snapshot table
/// and the forecast table, and asks for a short structured report covering
/// the technical picture, valuation, the outlook per horizon, and risks.
#[must_use]
pub fn build_prompt(request: &ReportRequest) -> String {
    format!(
        "You are a professional equity analyst. Using the data below, write a concise \
analyst report for {name} ({symbol}).\n\
\n\
## Latest data (technical and fundamental)\n\
{snapshot}\n\
## Model predictions\n\
{forecasts}\n\
Structure the report as follows:\n\
1. Technical assessment: trend from the moving averages, momentum from MACD and RSI.\n\
2. Valuation: what the P/E and P/B ratios suggest.\n\
3. Outlook: interpret the predicted direction, probability and expected return for each horizon.\n\
4. Risks: what could invalidate the outlook.\n\
\n\
Be objective. The predictions come from a statistical model and are not investment advice.\n",
        name = request.company_name,
        symbol = request.symbol,
        snapshot = request.snapshot_text(),
        forecasts = request.forecast_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::sample_request;

    #[test]
    fn test_prompt_carries_tables() {
        let prompt = build_prompt(&sample_request());
        assert!(prompt.contains("Toyota Mo (7203.T)"));
        assert!(prompt.contains("3290.00"));
        assert!(prompt.contains("7d"));
        assert!(prompt.contains("+1.25%"));
    }
}
