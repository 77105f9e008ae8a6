//! Forward-chaining walk-forward splits.
//!
//! Provides time-ordered train/validation folds in which every training
//! partition strictly precedes its validation partition and each successive
//! training partition extends the previous one.

use foresight_traits::{ForesightError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Walk-forward configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkForwardConfig {
    /// Number of folds
    pub n_splits: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self { n_splits: 5 }
    }
}

impl WalkForwardConfig {
    /// Checks the fold count.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InvalidConfig`] when `n_splits` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.n_splits == 0 {
            return Err(ForesightError::InvalidConfig("n_splits must be positive".to_string()));
        }
        Ok(())
    }
}

/// One train/validation split over row indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Position of the fold, starting at 0.
    pub index: usize,
    /// Training rows.
    pub train: Range<usize>,
    /// Held-out rows immediately after the training rows.
    pub validation: Range<usize>,
}

/// Forward-chaining splitter.
///
/// With `n` rows and `k` splits, every validation block has
/// `n / (k + 1)` rows and fold `i` trains on `[0, n - (k - i) * test_size)`.
///
/// # Example
///
/// ```rust
/// use foresight_eval::{WalkForwardConfig, WalkForwardSplit};
///
/// let split = WalkForwardSplit::new(WalkForwardConfig { n_splits: 3 });
/// let folds = split.split(8).unwrap();
/// assert_eq!(folds[0].train, 0..2);
/// assert_eq!(folds[2].validation, 6..8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WalkForwardSplit {
    config: WalkForwardConfig,
}

impl WalkForwardSplit {
    /// Create a new splitter.
    pub const fn new(config: WalkForwardConfig) -> Self {
        Self { config }
    }

    /// Number of folds produced.
    pub const fn n_splits(&self) -> usize {
        self.config.n_splits
    }

    /// Generates the folds for `n_rows` time-ordered rows.
    ///
    /// # Errors
    ///
    /// Returns [`ForesightError::InsufficientData`] unless `n_rows > n_splits`,
    /// or [`ForesightError::InvalidConfig`] for zero splits.
    pub fn split(&self, n_rows: usize) -> Result<Vec<Fold>> {
        self.config.validate()?;
        let k = self.config.n_splits;
        if n_rows <= k {
            return Err(ForesightError::InsufficientData(format!(
                "{n_rows} rows cannot form {k} walk-forward folds"
            )));
        }

        let test_size = n_rows / (k + 1);
        Ok((0..k)
            .map(|i| {
                let train_end = n_rows - (k - i) * test_size;
                Fold {
                    index: i,
                    train: 0..train_end,
                    validation: train_end..train_end + test_size,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_five_folds() {
        let folds = WalkForwardSplit::default().split(60).unwrap();
        assert_eq!(folds.len(), 5);
        assert_eq!(folds[0].train, 0..10);
        assert_eq!(folds[0].validation, 10..20);
        assert_eq!(folds[4].train, 0..50);
        assert_eq!(folds[4].validation, 50..60);
    }

    #[test]
    fn test_remainder_goes_to_first_training_block() {
        let folds = WalkForwardSplit::default().split(63).unwrap();
        assert_eq!(folds[0].train, 0..13);
        assert_eq!(folds[4].validation, 53..63);
    }

    #[test]
    fn test_fold_monotonicity() {
        for n in [6, 7, 23, 100, 487] {
            let folds = WalkForwardSplit::default().split(n).unwrap();
            for fold in &folds {
                assert!(!fold.train.is_empty());
                assert!(!fold.validation.is_empty());
                assert!(fold.train.end <= fold.validation.start);
                assert!(fold.validation.end <= n);
            }
            for pair in folds.windows(2) {
                assert!(pair[0].train.end < pair[1].train.end);
                assert_eq!(pair[0].train.start, pair[1].train.start);
            }
        }
    }

    #[test]
    fn test_too_few_rows() {
        let split = WalkForwardSplit::default();
        assert!(split.split(5).unwrap_err().is_insufficient_data());
        assert_eq!(split.split(6).unwrap().len(), 5);
    }

    #[test]
    fn test_zero_splits_rejected() {
        let split = WalkForwardSplit::new(WalkForwardConfig { n_splits: 0 });
        assert!(matches!(split.split(10), Err(ForesightError::InvalidConfig(_))));
    }
}
