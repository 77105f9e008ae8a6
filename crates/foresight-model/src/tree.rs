//! Regression trees grown on gradient statistics.
//!
//! Splits are found by exact greedy search: for each candidate feature the
//! rows are sorted by value and every boundary between distinct values is
//! scored with
//!
//! ```text
//! gain = G_L² / (H_L + λ) + G_R² / (H_R + λ) − G² / (H + λ)
//! ```
//!
//! Leaves hold the Newton step `−G / (H + λ)`; the booster applies the
//! learning rate.

use ndarray::ArrayView2;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TreeParams {
    pub(crate) max_depth: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) min_child_weight: f64,
    pub(crate) lambda: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// A fitted regression tree; rows with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grows a tree on `rows`, considering only `features`.
    pub(crate) fn fit<'a>(
        x: ArrayView2<'a, f64>,
        grad: &'a [f64],
        hess: &'a [f64],
        rows: Vec<usize>,
        features: &'a [usize],
        params: &'a TreeParams,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let grower = Grower {
            x,
            grad,
            hess,
            features,
            params,
        };
        grower.grow(&mut tree.nodes, rows, 0);
        tree
    }

    /// Output for one row of features.
    pub(crate) fn predict_row(&self, row: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes.get(i) {
                Some(Node::Leaf(value)) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    i = if row[*feature] <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    /// Number of leaves.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf(_))).count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], i: usize) -> usize {
            match &nodes[i] {
                Node::Leaf(_) => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

struct Grower<'a> {
    x: ArrayView2<'a, f64>,
    grad: &'a [f64],
    hess: &'a [f64],
    features: &'a [usize],
    params: &'a TreeParams,
}

impl Grower<'_> {
    fn grow(&self, nodes: &mut Vec<Node>, rows: Vec<usize>, depth: usize) -> usize {
        let (g, h) = self.sums(&rows);
        let id = nodes.len();
        nodes.push(Node::Leaf(self.leaf_weight(g, h)));

        let min_leaf = self.params.min_samples_leaf.max(1);
        if depth >= self.params.max_depth || rows.len() < 2 * min_leaf {
            return id;
        }
        let Some(best) = self.best_split(&rows, g, h) else {
            return id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| self.x[[r, best.feature]] <= best.threshold);
        let left = self.grow(nodes, left_rows, depth + 1);
        let right = self.grow(nodes, right_rows, depth + 1);
        nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn sums(&self, rows: &[usize]) -> (f64, f64) {
        rows.iter()
            .fold((0.0, 0.0), |(g, h), &r| (g + self.grad[r], h + self.hess[r]))
    }

    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.params.lambda;
        if denom > 0.0 { -g / denom } else { 0.0 }
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.params.lambda;
        if denom > 0.0 { g * g / denom } else { 0.0 }
    }

    fn best_split(&self, rows: &[usize], g: f64, h: f64) -> Option<Candidate> {
        let min_leaf = self.params.min_samples_leaf.max(1);
        let parent = self.score(g, h);
        let mut best: Option<Candidate> = None;
        let mut order = rows.to_vec();

        for &feature in self.features {
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));

            let (mut gl, mut hl) = (0.0, 0.0);
            for k in 0..order.len() - 1 {
                gl += self.grad[order[k]];
                hl += self.hess[order[k]];

                let n_left = k + 1;
                if n_left < min_leaf {
                    continue;
                }
                if order.len() - n_left < min_leaf {
                    break;
                }

                let value = self.x[[order[k], feature]];
                let next = self.x[[order[k + 1], feature]];
                if value == next {
                    continue;
                }

                let (gr, hr) = (g - gl, h - hl);
                if hl < self.params.min_child_weight || hr < self.params.min_child_weight {
                    continue;
                }

                let gain = self.score(gl, hl) + self.score(gr, hr) - parent;
                if gain > best.map_or(0.0, |b| b.gain) {
                    let mid = value + (next - value) / 2.0;
                    best = Some(Candidate {
                        feature,
                        threshold: if mid < next { mid } else { value },
                        gain,
                    });
                }
            }
        }
        best
    }
}
