//! Simple and exponential moving averages, plus daily returns.

use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};
use ta::{Next, Reset};

/// Simple moving average over a trailing window.
///
/// `out[i]` is the mean of `values[i + 1 - window ..= i]`, or `None` while
/// fewer than `window` values are available or when any of them is non-finite.
#[must_use]
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let Ok(mut average) = SimpleMovingAverage::new(window) else {
        return out;
    };

    let mut run = 0usize;
    for (slot, &v) in out.iter_mut().zip(values) {
        if !v.is_finite() {
            average.reset();
            run = 0;
            continue;
        }
        let mean = average.next(v);
        run += 1;
        if run >= window {
            *slot = Some(mean);
        }
    }
    out
}

/// Exponential moving average with `alpha = 2 / (span + 1)`.
///
/// The recursion is seeded with the first present value and is not
/// bias-adjusted. Output is `None` until `span` values have been observed;
/// a missing input after the seed leaves the average unchanged and yields
/// `None` at that position.
#[must_use]
pub fn ema(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let Ok(mut average) = ExponentialMovingAverage::new(span) else {
        return out;
    };

    let mut observed = 0usize;
    for (slot, value) in out.iter_mut().zip(values) {
        let Some(x) = value.filter(|x| x.is_finite()) else {
            continue;
        };
        let next = average.next(x);
        observed += 1;
        if observed >= span {
            *slot = Some(next);
        }
    }
    out
}

/// Wilder-style recursive smoothing `y[t] = (1 - alpha) * y[t-1] + alpha * x[t]`,
/// seeded with the first present value and valid once `min_periods`
/// observations have been seen.
///
/// `ta`'s RSI and ATR smooth with `alpha = 2 / (period + 1)`; RSI here uses
/// `alpha = 1 / period`, so it goes through this instead.
pub(crate) fn smoothed(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let mut state: Option<f64> = None;
    let mut observed = 0usize;

    for (i, value) in values.iter().enumerate() {
        let Some(x) = value.filter(|x| x.is_finite()) else {
            continue;
        };
        observed += 1;
        let next = match state {
            None => x,
            Some(prev) => (1.0 - alpha) * prev + alpha * x,
        };
        state = Some(next);
        if observed >= min_periods.max(1) {
            out[i] = Some(next);
        }
    }
    out
}

/// One-day simple returns `close[t] / close[t-1] - 1`; `None` at `t = 0`.
#[must_use]
pub fn simple_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    for i in 1..closes.len() {
        let prev = closes[i - 1];
        if prev.is_finite() && prev != 0.0 && closes[i].is_finite() {
            out[i] = Some(closes[i] / prev - 1.0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_warmup_and_values() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 2.0);
        assert_relative_eq!(out[3].unwrap(), 3.0);
    }

    #[test]
    fn test_sma_window_larger_than_input() {
        assert!(sma(&[1.0, 2.0], 5).iter().all(Option::is_none));
        assert!(sma(&[1.0, 2.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_restarts_after_gap() {
        let out = sma(&[1.0, 2.0, f64::NAN, 4.0, 6.0, 8.0], 2);
        assert_relative_eq!(out[1].unwrap(), 1.5);
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        assert_relative_eq!(out[4].unwrap(), 5.0);
        assert_relative_eq!(out[5].unwrap(), 7.0);
    }

    #[test]
    fn test_ema_constant_series() {
        let values = vec![Some(5.0); 10];
        let out = ema(&values, 4);
        assert!(out[..3].iter().all(Option::is_none));
        for v in &out[3..] {
            assert_relative_eq!(v.unwrap(), 5.0);
        }
    }

    #[test]
    fn test_ema_recursion() {
        // span 3 -> alpha 0.5
        let values = vec![Some(2.0), Some(4.0), Some(8.0)];
        let out = ema(&values, 3);
        // 2 -> 3 -> 5.5
        assert_relative_eq!(out[2].unwrap(), 5.5);
    }

    #[test]
    fn test_ema_seeds_at_first_present_value() {
        let values = vec![None, None, Some(1.0), Some(1.0)];
        let out = ema(&values, 2);
        assert_eq!(out[2], None);
        assert_relative_eq!(out[3].unwrap(), 1.0);
    }

    #[test]
    fn test_simple_returns() {
        let out = simple_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[1].unwrap(), 0.1);
        assert_relative_eq!(out[2].unwrap(), -0.1, epsilon = 1e-12);
    }
}
