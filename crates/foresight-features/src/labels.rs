//! Label Builder and training-set assembly.
//!
//! Labels are computed on the full calendar-aligned close series, before any
//! row is dropped, so a label at day `t` always refers to exactly `t + h`.

use crate::builder::{FEATURE_COUNT, FeatureTable, FeatureVector};
use foresight_traits::{Date, Horizon};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Direction and forward-return labels for one horizon.
///
/// Both vectors are aligned with the close series; the trailing `h` entries
/// are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    /// Horizon the labels look ahead.
    pub horizon: Horizon,
    /// `close[t + h] > close[t]`.
    pub direction: Vec<Option<bool>>,
    /// `close[t + h] / close[t] - 1`.
    pub forward_return: Vec<Option<f64>>,
}

impl LabelSet {
    /// Returns true when day `t` carries a label.
    #[must_use]
    pub fn is_defined(&self, t: usize) -> bool {
        self.forward_return.get(t).is_some_and(Option::is_some)
    }
}

/// Computes labels for `horizon` on a calendar-aligned close series.
#[must_use]
pub fn label_set(closes: &[f64], horizon: Horizon) -> LabelSet {
    let h = horizon.days();
    let n = closes.len();
    let mut direction = vec![None; n];
    let mut forward_return = vec![None; n];

    for t in 0..n.saturating_sub(h) {
        let (now, later) = (closes[t], closes[t + h]);
        if now.is_finite() && later.is_finite() && now != 0.0 {
            direction[t] = Some(later > now);
            forward_return[t] = Some(later / now - 1.0);
        }
    }

    LabelSet {
        horizon,
        direction,
        forward_return,
    }
}

/// A horizon dropped before training, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedHorizon {
    /// The omitted horizon.
    pub horizon: Horizon,
    /// Why no forecast was produced.
    pub reason: String,
}

/// Training targets for one horizon, row-aligned with [`TrainingSet::features`].
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonLabels {
    /// Horizon of these labels.
    pub horizon: Horizon,
    /// Whether the close rose.
    pub directions: Vec<bool>,
    /// Simple forward returns.
    pub forward_returns: Vec<f64>,
}

/// Rows usable by every trainable horizon, plus the live row.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    /// Feature matrix, one row per date in `dates`.
    pub features: Array2<f64>,
    /// Date of each feature row.
    pub dates: Vec<Date>,
    /// Labels per trainable horizon, in request order.
    pub labels: Vec<HorizonLabels>,
    /// Horizons left out for lack of data.
    pub skipped: Vec<SkippedHorizon>,
    /// Latest complete feature row.
    pub live: Option<(Date, FeatureVector)>,
}

impl TrainingSet {
    /// Assembles training data for `horizons` from a feature table.
    ///
    /// A horizon whose own eligible rows (complete features and a defined
    /// label) do not exceed `n_splits` is skipped. The remaining horizons
    /// share the rows on which all of their labels are defined.
    #[must_use]
    pub fn assemble(table: &FeatureTable, horizons: &[Horizon], n_splits: usize) -> Self {
        let mut skipped = Vec::new();
        let mut kept: Vec<LabelSet> = Vec::new();

        for horizon in Horizon::dedup(horizons) {
            let labels = label_set(&table.closes, horizon);
            let eligible = (0..table.len())
                .filter(|&t| table.rows[t].is_some() && labels.is_defined(t))
                .count();
            if eligible <= n_splits {
                warn!(%horizon, eligible, n_splits, "skipping horizon: too few labelled rows");
                skipped.push(SkippedHorizon {
                    horizon,
                    reason: format!(
                        "insufficient data: {eligible} labelled rows for {n_splits} folds"
                    ),
                });
            } else {
                kept.push(labels);
            }
        }

        let index: Vec<usize> = if kept.is_empty() {
            Vec::new()
        } else {
            (0..table.len())
                .filter(|&t| table.rows[t].is_some() && kept.iter().all(|l| l.is_defined(t)))
                .collect()
        };

        let mut features = Array2::<f64>::zeros((index.len(), FEATURE_COUNT));
        for (r, &t) in index.iter().enumerate() {
            if let Some(row) = &table.rows[t] {
                for (c, v) in row.values().iter().enumerate() {
                    features[[r, c]] = *v;
                }
            }
        }

        let labels = kept
            .iter()
            .map(|l| HorizonLabels {
                horizon: l.horizon,
                directions: index.iter().filter_map(|&t| l.direction[t]).collect(),
                forward_returns: index.iter().filter_map(|&t| l.forward_return[t]).collect(),
            })
            .collect();

        let dates = index.iter().map(|&t| table.dates[t]).collect();
        let live = table.live_row().map(|(date, row)| (date, *row));

        debug!(rows = index.len(), skipped = skipped.len(), "assembled training set");
        Self {
            features,
            dates,
            labels,
            skipped,
            live,
        }
    }

    /// Number of shared training rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Returns true when no horizon can be trained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.n_rows() == 0
    }
}
