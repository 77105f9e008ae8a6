//! Loss functions driving the boosting loop.

use foresight_traits::stats::{logit, sigmoid};
use std::fmt;

/// A twice-differentiable loss over raw scores.
///
/// The booster starts every row at [`Objective::initial_score`], then fits
/// each tree to the gradient statistics returned by [`Objective::gradients`].
pub trait Objective: Send + Sync + fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Constant raw score before any tree is added.
    fn initial_score(&self, targets: &[f64]) -> f64;

    /// Writes the first and second derivative of the loss for every row.
    fn gradients(&self, targets: &[f64], scores: &[f64], grad: &mut [f64], hess: &mut [f64]);

    /// Maps a raw score to the output scale (probability, return, ...).
    fn transform(&self, score: f64) -> f64;
}

/// Binary log-loss on `{0, 1}` targets; raw scores are log-odds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLoss;

impl Objective for LogLoss {
    fn name(&self) -> &str {
        "binary_logloss"
    }

    fn initial_score(&self, targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        let positive_rate = targets.iter().sum::<f64>() / targets.len() as f64;
        logit(positive_rate)
    }

    fn gradients(&self, targets: &[f64], scores: &[f64], grad: &mut [f64], hess: &mut [f64]) {
        for (i, (&y, &s)) in targets.iter().zip(scores).enumerate() {
            let p = sigmoid(s);
            grad[i] = p - y;
            hess[i] = (p * (1.0 - p)).max(f64::EPSILON);
        }
    }

    fn transform(&self, score: f64) -> f64 {
        sigmoid(score)
    }
}

/// Squared error `(pred - y)^2 / 2`: gradient `pred - y`, unit hessian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredError;

impl Objective for SquaredError {
    fn name(&self) -> &str {
        "squared_error"
    }

    fn initial_score(&self, targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        targets.iter().sum::<f64>() / targets.len() as f64
    }

    fn gradients(&self, targets: &[f64], scores: &[f64], grad: &mut [f64], hess: &mut [f64]) {
        for (i, (&y, &s)) in targets.iter().zip(scores).enumerate() {
            grad[i] = s - y;
            hess[i] = 1.0;
        }
    }

    fn transform(&self, score: f64) -> f64 {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_logloss_initial_score_is_log_odds() {
        let y = [1.0, 1.0, 1.0, 0.0];
        assert_relative_eq!(LogLoss.initial_score(&y), 3.0f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_logloss_single_class_is_clamped() {
        let s = LogLoss.initial_score(&[1.0; 10]);
        assert!(s.is_finite());
        assert!(LogLoss.transform(s) > 0.999);
    }

    #[test]
    fn test_logloss_gradients() {
        let mut g = [0.0; 2];
        let mut h = [0.0; 2];
        LogLoss.gradients(&[1.0, 0.0], &[0.0, 0.0], &mut g, &mut h);
        assert_relative_eq!(g[0], -0.5);
        assert_relative_eq!(g[1], 0.5);
        assert_relative_eq!(h[0], 0.25);
    }

    #[test]
    fn test_squared_error() {
        assert_relative_eq!(SquaredError.initial_score(&[1.0, 3.0]), 2.0);
        let mut g = [0.0; 2];
        let mut h = [0.0; 2];
        SquaredError.gradients(&[1.0, 3.0], &[2.0, 2.0], &mut g, &mut h);
        assert_eq!(g, [1.0, -1.0]);
        assert_eq!(h, [1.0, 1.0]);
        assert_relative_eq!(SquaredError.transform(0.3), 0.3);
    }
}
