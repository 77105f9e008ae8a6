//! Moving average convergence/divergence.

use super::moving_average::ema;

/// MACD line, signal line and histogram, aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    /// `EMA(fast) - EMA(slow)` of the closes.
    pub line: Vec<Option<f64>>,
    /// `EMA(signal)` of the MACD line.
    pub signal: Vec<Option<f64>>,
    /// `line - signal`.
    pub histogram: Vec<Option<f64>>,
}

/// Computes MACD with the given fast, slow and signal spans.
///
/// All three averages are `ta` EMAs seeded at their first value.
///
/// The line is available once the slow average is (index `slow - 1`); the
/// signal and histogram after a further `signal - 1` days.
#[must_use]
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let prices: Vec<Option<f64>> = closes.iter().map(|&c| Some(c)).collect();
    let fast_ema = ema(&prices, fast);
    let slow_ema = ema(&prices, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema(&line, signal);
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    Macd {
        line,
        signal: signal_line,
        histogram,
    }
}
