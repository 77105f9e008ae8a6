//! Expected-return estimate conditioned on the model's own hit record.
//!
//! Training rows of the retained fold are split into true positives
//! (predicted UP, went up) and true negatives (predicted DOWN, did not go
//! up). The estimate for a live prediction is the mean forward return of the
//! partition matching its direction, or `0.0` when that partition is empty.

use foresight_traits::Direction;
use foresight_traits::stats::masked_mean;
use serde::{Deserialize, Serialize};

/// Conditional expected return and the counts behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionalReturn {
    /// Direction the estimate is conditioned on.
    pub direction: Direction,
    /// Mean forward return of the matching partition, as a fraction.
    pub mean_return: f64,
    /// Rows predicted UP that went up.
    pub true_positives: usize,
    /// Rows predicted DOWN that did not go up.
    pub true_negatives: usize,
    /// Share of rows whose predicted direction was realized.
    pub hit_rate: Option<f64>,
}

impl ConditionalReturn {
    /// Mean return in percent.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.mean_return * 100.0
    }

    /// Size of the partition the mean was taken over.
    #[must_use]
    pub const fn support(&self) -> usize {
        match self.direction {
            Direction::Up => self.true_positives,
            Direction::Down => self.true_negatives,
        }
    }
}

/// Estimates the expected return for a live prediction.
///
/// # Arguments
///
/// * `predicted` - Predicted direction of each training row
/// * `actual_up` - Whether each training row's close actually rose
/// * `forward_returns` - Forward return of each training row
/// * `live` - Direction predicted for the live row
///
/// # Example
///
/// ```rust
/// use foresight_eval::conditional_return;
/// use foresight_traits::Direction::{Down, Up};
///
/// let est = conditional_return(&[Up, Up, Down], &[true, false, false], &[0.04, 0.01, -0.02], Up);
/// assert_eq!(est.mean_return, 0.04);
/// assert_eq!(est.true_positives, 1);
/// ```
#[must_use]
pub fn conditional_return(
    predicted: &[Direction],
    actual_up: &[bool],
    forward_returns: &[f64],
    live: Direction,
) -> ConditionalReturn {
    let n = predicted.len().min(actual_up.len()).min(forward_returns.len());
    let tp: Vec<bool> = (0..n).map(|i| predicted[i].is_up() && actual_up[i]).collect();
    let tn: Vec<bool> = (0..n).map(|i| !predicted[i].is_up() && !actual_up[i]).collect();
    let true_positives = tp.iter().filter(|&&m| m).count();
    let true_negatives = tn.iter().filter(|&&m| m).count();

    let mask = if live.is_up() { &tp } else { &tn };
    let mean_return = masked_mean(&forward_returns[..n], mask).unwrap_or(0.0);
    let hit_rate = (n > 0).then(|| (true_positives + true_negatives) as f64 / n as f64);

    ConditionalReturn {
        direction: live,
        mean_return,
        true_positives,
        true_negatives,
        hit_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Down, Up};
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_over_true_positives() {
        let predicted = [Up, Up, Up, Down, Up];
        let actual = [true, true, false, false, true];
        let returns = [0.02, 0.04, -0.01, -0.03, 0.06];
        let est = conditional_return(&predicted, &actual, &returns, Up);
        assert_relative_eq!(est.mean_return, 0.04, epsilon = 1e-12);
        assert_relative_eq!(est.percent(), 4.0, epsilon = 1e-9);
        assert_eq!(est.true_positives, 3);
        assert_eq!(est.true_negatives, 1);
        assert_eq!(est.support(), 3);
        assert_relative_eq!(est.hit_rate.unwrap(), 0.8);
    }

    #[test]
    fn test_mean_over_true_negatives() {
        let predicted = [Down, Down, Up];
        let actual = [false, false, true];
        let returns = [-0.02, -0.04, 0.05];
        let est = conditional_return(&predicted, &actual, &returns, Down);
        assert_relative_eq!(est.mean_return, -0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_always_correct_model_gives_exact_mean() {
        let returns = [0.01, 0.03, 0.02, 0.06];
        let predicted = [Up; 4];
        let actual = [true; 4];
        let est = conditional_return(&predicted, &actual, &returns, Up);
        assert_relative_eq!(est.mean_return, 0.03, epsilon = 1e-12);
        assert_relative_eq!(est.hit_rate.unwrap(), 1.0);
    }

    #[test]
    fn test_empty_partition_falls_back_to_zero() {
        let predicted = [Up, Up];
        let actual = [true, true];
        let est = conditional_return(&predicted, &actual, &[0.1, 0.2], Down);
        assert_eq!(est.mean_return, 0.0);
        assert_eq!(est.support(), 0);

        let est = conditional_return(&[], &[], &[], Up);
        assert_eq!(est.mean_return, 0.0);
        assert_eq!(est.hit_rate, None);
    }
}
