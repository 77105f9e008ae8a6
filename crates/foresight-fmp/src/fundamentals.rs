//! Conversion of FMP statements into fundamental facts.

use crate::types::{IncomeStatement, KeyMetrics, Quote, assumed_disclosure};
use chrono::NaiveDate;
use foresight_traits::FundamentalFact;
use std::collections::BTreeMap;

/// Merges quarterly income statements and key metrics into facts.
///
/// Rows are matched on their period end date. A fact is announced on the
/// income statement's filing date when one is known, otherwise
/// [`FILING_LAG_DAYS`](crate::types::FILING_LAG_DAYS) after the period end,
/// so a ratio is never usable before it could have been published. Facts are
/// returned in announcement order.
#[must_use]
pub fn facts_from_statements(
    income: &[IncomeStatement],
    metrics: &[KeyMetrics],
) -> Vec<FundamentalFact> {
    let mut by_period: BTreeMap<NaiveDate, FundamentalFact> = BTreeMap::new();

    for stmt in income {
        let (Some(period_end), Some(announced)) = (stmt.parsed_date(), stmt.disclosed_on()) else {
            continue;
        };
        let fact = by_period
            .entry(period_end)
            .or_insert_with(|| FundamentalFact::new(announced, None, None, None));
        fact.announced_on = announced;
        fact.eps = stmt.earnings_per_share();
    }

    for row in metrics {
        let Some(period_end) = row.parsed_date() else {
            continue;
        };
        let fact = by_period.entry(period_end).or_insert_with(|| {
            FundamentalFact::new(assumed_disclosure(period_end), None, None, None)
        });
        fact.price_to_earnings = row.pe_ratio;
        fact.price_to_book = row.pb_ratio;
    }

    let mut facts: Vec<FundamentalFact> =
        by_period.into_values().filter(|f| !f.is_empty()).collect();
    facts.sort_by_key(|f| f.announced_on);
    facts
}

/// A single fact built from a quote's trailing figures, dated `as_of`.
///
/// Returns `None` when the quote carries neither EPS nor P/E.
#[must_use]
pub fn synthetic_fact(quote: &Quote, as_of: NaiveDate) -> Option<FundamentalFact> {
    let fact = FundamentalFact::new(as_of, quote.eps, quote.pe, None);
    (!fact.is_empty()).then_some(fact)
}
