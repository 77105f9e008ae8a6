//! Stochastic oscillator.

use ta::Next;
use ta::indicators::{Maximum, Minimum};

/// %K and %D lines of the stochastic oscillator.
#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    /// `100 * (close - lowest low) / (highest high - lowest low)`.
    pub k: Vec<Option<f64>>,
    /// Simple moving average of %K.
    pub d: Vec<Option<f64>>,
}

/// Computes the stochastic oscillator over a `window`-day range with a
/// `smooth`-day %D.
///
/// The range is the highest high and lowest low, not the close-only range of
/// `ta`'s `SlowStochastic`, and %D is a plain mean of %K. %K is undefined on
/// days whose range is zero.
#[must_use]
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    window: usize,
    smooth: usize,
) -> Stochastic {
    let n = closes.len().min(highs.len()).min(lows.len());
    let mut k = vec![None; n];

    if let (Ok(mut highest), Ok(mut lowest)) = (Maximum::new(window), Minimum::new(window)) {
        for i in 0..n {
            let hh = highest.next(highs[i]);
            let ll = lowest.next(lows[i]);
            if i + 1 < window {
                continue;
            }
            let spread = hh - ll;
            if spread.is_finite() && spread > 0.0 && closes[i].is_finite() {
                k[i] = Some(100.0 * (closes[i] - ll) / spread);
            }
        }
    }

    let d = rolling_mean(&k, smooth);
    Stochastic { k, d }
}

fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let sum: Option<f64> = values[i + 1 - window..=i].iter().copied().sum();
        out[i] = sum.map(|s| s / window as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_close_at_high_is_100() {
        let highs = [10.0, 11.0, 12.0];
        let lows = [9.0, 10.0, 11.0];
        let closes = [9.5, 10.5, 12.0];
        let s = stochastic(&highs, &lows, &closes, 3, 1);
        assert_relative_eq!(s.k[2].unwrap(), 100.0);
        assert_relative_eq!(s.d[2].unwrap(), 100.0);
    }

    #[test]
    fn test_zero_range_is_undefined() {
        let flat = [5.0; 6];
        let s = stochastic(&flat, &flat, &flat, 3, 3);
        assert!(s.k.iter().all(Option::is_none));
        assert!(s.d.iter().all(Option::is_none));
    }

    #[test]
    fn test_d_is_mean_of_k() {
        let highs = [10.0, 12.0, 11.0, 13.0, 12.0];
        let lows = [8.0, 9.0, 9.5, 10.0, 10.5];
        let closes = [9.0, 11.0, 10.0, 12.5, 11.0];
        let s = stochastic(&highs, &lows, &closes, 2, 2);
        let expected = (s.k[3].unwrap() + s.k[4].unwrap()) / 2.0;
        assert_relative_eq!(s.d[4].unwrap(), expected, epsilon = 1e-12);
        assert_eq!(s.d[1], None);
    }

    #[test]
    fn test_range_rolls_off_old_extremes() {
        let highs = [20.0, 11.0, 12.0, 13.0];
        let lows = [1.0, 10.0, 10.5, 11.0];
        let closes = [10.0, 10.5, 11.0, 12.0];
        let s = stochastic(&highs, &lows, &closes, 3, 1);
        assert_eq!(s.k[1], None);
        // window [1..=3]: hh 13, ll 10
        assert_relative_eq!(s.k[3].unwrap(), 100.0 * 2.0 / 3.0, epsilon = 1e-12);
    }
}
