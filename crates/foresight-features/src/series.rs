//! Normalization of raw loader output into a clean daily calendar.
//!
//! Loaders may hand back bars out of order, with repeated dates (for example
//! when a multi-level symbol/date index is flattened), or with broken prices.
//! Everything downstream assumes strictly increasing dates, so both series
//! pass through here first.

use foresight_traits::{Bar, FundamentalFact};

/// Cleans a bar series.
///
/// Bars with a non-finite or non-positive price are dropped, the rest are
/// stable-sorted by date, and repeated dates collapse to their last occurrence.
#[must_use]
pub fn normalize_bars(bars: &[Bar]) -> Vec<Bar> {
    let mut clean: Vec<Bar> = bars.iter().copied().filter(Bar::has_valid_prices).collect();
    clean.sort_by_key(|b| b.date);
    keep_last_per_key(clean, |b| b.date)
}

/// Cleans a fundamentals series.
///
/// Non-finite figures become absent, facts left with no figure are dropped,
/// and repeated announcement dates collapse to their last occurrence.
#[must_use]
pub fn normalize_facts(facts: &[FundamentalFact]) -> Vec<FundamentalFact> {
    let mut clean: Vec<FundamentalFact> = facts
        .iter()
        .map(|f| FundamentalFact {
            eps: f.eps.filter(|v| v.is_finite()),
            price_to_earnings: f.price_to_earnings.filter(|v| v.is_finite()),
            price_to_book: f.price_to_book.filter(|v| v.is_finite()),
            ..*f
        })
        .filter(|f| !f.is_empty())
        .collect();
    clean.sort_by_key(|f| f.announced_on);
    keep_last_per_key(clean, |f| f.announced_on)
}

fn keep_last_per_key<T, K, F>(sorted: Vec<T>, key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut out: Vec<T> = Vec::with_capacity(sorted.len());
    for item in sorted {
        match out.last_mut() {
            Some(last) if key(last) == key(&item) => *last = item,
            _ => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_traits::Date;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> Bar {
        Bar::new(day(d), close, close, close, close, 1000.0)
    }

    #[test]
    fn test_bars_sorted_and_deduplicated() {
        let bars = vec![bar(3, 12.0), bar(1, 10.0), bar(2, 11.0), bar(2, 11.5)];
        let out = normalize_bars(&bars);
        let dates: Vec<_> = out.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(out[1].close, 11.5);
    }

    #[test]
    fn test_bars_with_bad_prices_dropped() {
        let bars = vec![bar(1, 10.0), bar(2, f64::NAN), bar(3, 0.0), bar(4, 12.0)];
        let out = normalize_bars(&bars);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].date, day(4));
    }

    #[test]
    fn test_facts_drop_empty_and_non_finite() {
        let facts = vec![
            FundamentalFact::new(day(5), Some(f64::NAN), None, None),
            FundamentalFact::new(day(1), Some(1.2), Some(f64::INFINITY), Some(3.0)),
        ];
        let out = normalize_facts(&facts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].price_to_earnings, None);
        assert_eq!(out[0].price_to_book, Some(3.0));
    }

    #[test]
    fn test_facts_keep_last_duplicate() {
        let facts = vec![
            FundamentalFact::new(day(1), Some(1.0), None, None),
            FundamentalFact::new(day(1), Some(2.0), None, None),
        ];
        let out = normalize_facts(&facts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].eps, Some(2.0));
    }
}
