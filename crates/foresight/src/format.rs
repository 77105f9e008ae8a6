//! Result Formatter.
//!
//! Turns forecast results into display rows: rounded probability, a signed
//! two-decimal expected return, and an optional color hint for the
//! probability cell. The hint is presentation metadata only.

use crate::result::{ForecastOutcome, ForecastReport, ForecastResult};
use foresight_report::{ForecastRecord, ReportRequest};
use foresight_traits::stats::round_to;
use foresight_traits::{Horizon, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Background tint for a probability cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleHint {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl StyleHint {
    /// Hint for a rounded probability in percent: green above 50, red below,
    /// none at exactly 50. Opacity grows with the distance from 50.
    #[must_use]
    pub fn for_probability(percent: u8) -> Option<Self> {
        let alpha = ((f64::from(percent) - 50.0).abs() / 50.0).min(1.0);
        match percent {
            50 => None,
            51.. => Some(Self {
                red: 0,
                green: 255,
                blue: 0,
                alpha,
            }),
            _ => Some(Self {
                red: 255,
                green: 0,
                blue: 0,
                alpha,
            }),
        }
    }

    /// CSS declaration, e.g. `background-color: rgba(0, 255, 0, 0.26)`.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "background-color: rgba({}, {}, {}, {:.2})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Horizon.
    pub horizon: Horizon,
    /// `UP` or `DOWN`.
    pub prediction: String,
    /// Probability of an up move, rounded to a whole percent.
    pub probability_up: u8,
    /// Expected return in percent, two decimals.
    pub expected_return_pct: f64,
    /// Optional cell tint.
    pub style: Option<StyleHint>,
}

impl ForecastRow {
    /// Probability cell text, e.g. `63%`.
    #[must_use]
    pub fn probability_text(&self) -> String {
        format!("{}%", self.probability_up)
    }

    /// Expected-return cell text, e.g. `+1.25%`.
    #[must_use]
    pub fn expected_return_text(&self) -> String {
        format!("{:+.2}%", self.expected_return_pct)
    }
}

impl From<&ForecastResult> for ForecastRow {
    fn from(r: &ForecastResult) -> Self {
        let probability_up = r.probability_up.round().clamp(0.0, 100.0) as u8;
        // adding zero turns -0.0 into 0.0
        let expected_return_pct = round_to(r.expected_return, 2) + 0.0;
        Self {
            horizon: r.horizon,
            prediction: r.direction.label().to_string(),
            probability_up,
            expected_return_pct,
            style: StyleHint::for_probability(probability_up),
        }
    }
}

/// Display rows for every result, in order.
#[must_use]
pub fn forecast_rows(results: &[ForecastResult]) -> Vec<ForecastRow> {
    results.iter().map(ForecastRow::from).collect()
}

/// Rows as a DataFrame with `horizon`, `prediction`, `probability_up` and
/// `expected_return_pct` columns.
///
/// # Errors
///
/// Returns an error if the frame cannot be constructed.
pub fn rows_to_dataframe(rows: &[ForecastRow]) -> Result<DataFrame> {
    let df = df! {
        "horizon" => rows.iter().map(|r| r.horizon.days() as u32).collect::<Vec<_>>(),
        "prediction" => rows.iter().map(|r| r.prediction.clone()).collect::<Vec<_>>(),
        "probability_up" => rows.iter().map(|r| u32::from(r.probability_up)).collect::<Vec<_>>(),
        "expected_return_pct" => rows.iter().map(|r| r.expected_return_pct).collect::<Vec<_>>(),
    }?;
    Ok(df)
}

/// Renders rows as a fixed-width text table.
#[must_use]
pub fn render_rows(rows: &[ForecastRow]) -> String {
    let mut out = format!(
        "{:<8} {:<10} {:>11} {:>16}\n",
        "Horizon", "Prediction", "Probability", "Expected return"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:>11} {:>16}",
            row.horizon.to_string(),
            row.prediction,
            row.probability_text(),
            row.expected_return_text()
        );
    }
    out
}

/// Message shown in place of the table when nothing could be computed.
#[must_use]
pub fn no_result_message(symbol: &str, reason: &impl fmt::Display) -> String {
    format!("No forecast available for {symbol}: {reason}.")
}

/// Renders an engine outcome for the terminal.
///
/// Skipped horizons and degraded fundamentals are noted under the table.
#[must_use]
pub fn render_outcome(symbol: &str, outcome: &ForecastOutcome) -> String {
    match outcome {
        ForecastOutcome::NoResult(reason) => no_result_message(symbol, reason),
        ForecastOutcome::Forecasts(report) => {
            let mut out = format!(
                "{} ({}) as of {}\n\n",
                report.company_name, report.symbol, report.as_of
            );
            out.push_str(&render_rows(&forecast_rows(&report.results)));
            for skipped in &report.skipped {
                let _ = writeln!(out, "skipped {}: {}", skipped.horizon, skipped.reason);
            }
            if report.is_degraded() {
                let _ = writeln!(
                    out,
                    "note: fundamentals {:?}; neutral values used where absent",
                    report.quality
                );
            }
            out
        }
    }
}

/// Row records handed to the report generator.
#[must_use]
pub fn report_request(report: &ForecastReport) -> ReportRequest {
    ReportRequest {
        symbol: report.symbol.clone(),
        company_name: report.company_name.clone(),
        snapshot: report.snapshot.to_records(),
        forecasts: forecast_rows(&report.results)
            .into_iter()
            .map(|row| ForecastRecord {
                horizon: row.horizon.to_string(),
                prediction: row.prediction,
                probability_up: row.probability_up,
                expected_return_pct: row.expected_return_pct,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::NoResultReason;
    use crate::snapshot::Snapshot;
    use approx::assert_relative_eq;
    use foresight_features::FundamentalsQuality;
    use foresight_traits::{Date, Direction, ProbabilitySource};

    fn result(days: usize, probability_up: f64, expected_return: f64) -> ForecastResult {
        ForecastResult {
            horizon: Horizon::new(days).unwrap(),
            direction: Direction::from_probability(probability_up / 100.0),
            probability_up,
            probability_source: ProbabilitySource::Classifier,
            expected_return,
            support: 10,
            hit_rate: Some(0.6),
        }
    }

    #[test]
    fn test_row_rounding() {
        let row = ForecastRow::from(&result(7, 62.6, 1.2468));
        assert_eq!(row.probability_up, 63);
        assert_relative_eq!(row.expected_return_pct, 1.25);
        assert_eq!(row.probability_text(), "63%");
        assert_eq!(row.expected_return_text(), "+1.25%");
        assert_eq!(row.prediction, "UP");

        let row = ForecastRow::from(&result(1, 30.0, -0.5));
        assert_eq!(row.expected_return_text(), "-0.50%");
        assert_eq!(row.prediction, "DOWN");
    }

    #[test]
    fn test_negative_zero_is_plain_zero() {
        let row = ForecastRow::from(&result(1, 55.0, -0.001));
        assert_eq!(row.expected_return_text(), "+0.00%");
    }

    #[test]
    fn test_style_hint() {
        assert!(StyleHint::for_probability(50).is_none());

        let up = StyleHint::for_probability(63).unwrap();
        assert_eq!((up.red, up.green), (0, 255));
        assert_relative_eq!(up.alpha, 0.26);
        assert_eq!(up.css(), "background-color: rgba(0, 255, 0, 0.26)");

        let down = StyleHint::for_probability(0).unwrap();
        assert_eq!((down.red, down.green), (255, 0));
        assert_relative_eq!(down.alpha, 1.0);
    }

    #[test]
    fn test_render_rows() {
        let rows = forecast_rows(&[result(1, 63.0, 1.25), result(28, 41.0, -2.0)]);
        let text = render_rows(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1d"));
        assert!(lines[1].contains("63%"));
        assert!(lines[2].contains("-2.00%"));
    }

    #[test]
    fn test_dataframe_view() {
        let rows = forecast_rows(&[result(1, 63.0, 1.25), result(7, 48.0, 0.0)]);
        let df = rows_to_dataframe(&rows).unwrap();
        assert_eq!(df.shape(), (2, 4));
    }

    #[test]
    fn test_render_no_result() {
        let outcome = ForecastOutcome::NoResult(NoResultReason::NoPriceData);
        assert_eq!(
            render_outcome("7203.T", &outcome),
            "No forecast available for 7203.T: no price data."
        );
    }

    #[test]
    fn test_report_request() {
        let report = ForecastReport {
            symbol: "7203.T".to_string(),
            company_name: "Toyota Mo".to_string(),
            as_of: Date::from_ymd_opt(2024, 6, 28).unwrap(),
            quality: FundamentalsQuality::Missing,
            results: vec![result(7, 63.0, 1.25)],
            skipped: Vec::new(),
            snapshot: Snapshot::default(),
        };
        let request = report_request(&report);
        assert_eq!(request.forecasts[0].horizon, "7d");
        assert_eq!(request.forecasts[0].probability_up, 63);

        let text = render_outcome("7203.T", &ForecastOutcome::Forecasts(report));
        assert!(text.contains("Toyota Mo (7203.T) as of 2024-06-28"));
        assert!(text.contains("note: fundamentals Missing"));
    }
}
