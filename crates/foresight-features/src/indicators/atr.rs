//! True range and average true range.

/// Daily true range: `max(high - low, |high - prev close|, |low - prev close|)`.
///
/// The first day has no previous close and uses `high - low`.
#[must_use]
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(highs.len()).min(lows.len());
    (0..n)
        .map(|i| {
            let hl = highs[i] - lows[i];
            if i == 0 {
                hl
            } else {
                let prev = closes[i - 1];
                hl.max((highs[i] - prev).abs()).max((lows[i] - prev).abs())
            }
        })
        .collect()
}

/// Average true range over `period` days.
///
/// The first value, at index `period - 1`, is the plain mean of the first
/// `period` true ranges; later values use Wilder smoothing
/// `atr[t] = (atr[t-1] * (period - 1) + tr[t]) / period`. `ta`'s
/// `AverageTrueRange` is an EMA of the true range and gives different values.
#[must_use]
pub fn average_true_range(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Vec<Option<f64>> {
    let tr = true_range(highs, lows, closes);
    let mut out = vec![None; tr.len()];
    if period == 0 || tr.len() < period {
        return out;
    }

    let n = period as f64;
    let mut atr = tr[..period].iter().sum::<f64>() / n;
    if atr.is_finite() {
        out[period - 1] = Some(atr);
    }
    for i in period..tr.len() {
        atr = (atr * (n - 1.0) + tr[i]) / n;
        if atr.is_finite() {
            out[i] = Some(atr);
        }
    }
    out
}
