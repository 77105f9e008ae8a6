//! Statistical utility functions shared across the engine.
//!
//! Small numeric helpers used by the feature builder, the boosted models and
//! the result formatter.

/// Lower bound applied to probabilities before taking log-odds.
pub const PROBABILITY_EPSILON: f64 = 1e-6;

/// Arithmetic mean of the finite values in `values`.
///
/// Returns `None` if no finite value is present.
///
/// # Examples
///
/// ```
/// use foresight_traits::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, f64::NAN, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));

    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Mean of `values[i]` over the indices where `mask[i]` is true.
///
/// Returns `None` when the mask selects nothing.
///
/// # Examples
///
/// ```
/// use foresight_traits::stats::masked_mean;
///
/// let r = [0.5, -0.25, 1.5];
/// assert_eq!(masked_mean(&r, &[true, false, true]), Some(1.0));
/// assert_eq!(masked_mean(&r, &[false, false, false]), None);
/// ```
pub fn masked_mean(values: &[f64], mask: &[bool]) -> Option<f64> {
    let selected: Vec<f64> = values
        .iter()
        .zip(mask)
        .filter_map(|(&v, &keep)| keep.then_some(v))
        .collect();
    mean(&selected)
}

/// Logistic function, numerically stable for large magnitudes.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Log-odds of `p`, with `p` clamped to `[ε, 1 − ε]`.
pub fn logit(p: f64) -> f64 {
    let p = p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
    (p / (1.0 - p)).ln()
}

/// Rounds to `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use foresight_traits::stats::round_to;
///
/// assert_eq!(round_to(1.23456, 2), 1.23);
/// assert_eq!(round_to(-0.005, 0), -0.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_skips_non_finite() {
        assert_eq!(mean(&[f64::NAN, f64::INFINITY]), None);
        assert_relative_eq!(mean(&[1.0, 3.0, f64::NAN]).unwrap(), 2.0);
    }

    #[test]
    fn test_masked_mean_alignment() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let mask = [false, true, false, true];
        assert_relative_eq!(masked_mean(&values, &mask).unwrap(), 3.0);
    }

    #[test]
    fn test_sigmoid_symmetry_and_extremes() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0) + sigmoid(-2.0), 1.0, epsilon = 1e-12);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
    }

    #[test]
    fn test_logit_inverts_sigmoid() {
        assert_relative_eq!(sigmoid(logit(0.73)), 0.73, epsilon = 1e-12);
        assert!(logit(1.0).is_finite());
        assert!(logit(0.0).is_finite());
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(63.4999, 0), 63.0);
        assert_relative_eq!(round_to(1.005_1, 2), 1.01);
    }
}
