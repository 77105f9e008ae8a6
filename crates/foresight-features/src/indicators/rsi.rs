//! Relative strength index with Wilder smoothing.

use super::moving_average::smoothed;

/// Relative strength index over `period` days, in `[0, 100]`.
///
/// Gains and losses are smoothed with `alpha = 1 / period`, seeded at the
/// first day (which contributes neither a gain nor a loss). The first value
/// is available at index `period - 1`. When the average loss is zero the
/// index is 100.
#[must_use]
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.is_empty() || period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(Some(0.0));
    losses.push(Some(0.0));
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        if change.is_finite() {
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        } else {
            gains.push(None);
            losses.push(None);
        }
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = smoothed(&gains, alpha, period);
    let avg_loss = smoothed(&losses, alpha, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(_), Some(l)) if l == 0.0 => Some(100.0),
            (Some(g), Some(l)) => Some(100.0 - 100.0 / (1.0 + g / l)),
            _ => None,
        })
        .collect()
}
