//! Regression trees for gradient boosting.
//!
//! Axis-aligned decision trees fitted to gradient/hessian statistics with
//! exact greedy splits. Nodes are stored in a flat vector with index-based
//! child links so trees serialize compactly and deterministically.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Split-finding and regularization parameters for a single tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum number of samples in each leaf
    pub min_samples_leaf: usize,
    /// L2 regularization on leaf weights
    pub lambda: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_leaf: 5,
            lambda: 1.0,
        }
    }
}

/// One node of a regression tree.
///
/// Leaves carry a weight in `value`; internal nodes route rows by
/// `feature`/`threshold` (left when `x[feature] <= threshold`).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    feature: usize,
    threshold: f32,
    left: usize,
    right: usize,
    value: f32,
    leaf: bool,
}

/// A fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit a tree to first/second-order statistics.
    ///
    /// `grad` and `hess` are per-row gradient and hessian values aligned
    /// with the rows of `x`; `rows` selects the (sub)sample to fit on.
    /// Splits maximize the standard second-order gain; a node becomes a
    /// leaf when no split improves it, when the depth limit is reached, or
    /// when either side would fall under `min_samples_leaf`.
    pub fn fit(
        x: ArrayView2<f32>,
        grad: &[f32],
        hess: &[f32],
        rows: &[usize],
        params: &TreeParams,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut rows = rows.to_vec();
        tree.build(x, grad, hess, &mut rows, 0, params);
        tree
    }

    /// Predicted weight for one feature row.
    pub fn predict_row(&self, row: ArrayView1<f32>) -> f32 {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            if node.leaf {
                return node.value;
            }
            index = if row[node.feature] <= node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Build a subtree over `rows`, returning its root index.
    fn build(
        &mut self,
        x: ArrayView2<f32>,
        grad: &[f32],
        hess: &[f32],
        rows: &mut [usize],
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let sum_g: f32 = rows.iter().map(|&r| grad[r]).sum();
        let sum_h: f32 = rows.iter().map(|&r| hess[r]).sum();

        let make_leaf = |nodes: &mut Vec<Node>| {
            nodes.push(Node {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
                value: -sum_g / (sum_h + params.lambda),
                leaf: true,
            });
            nodes.len() - 1
        };

        if depth >= params.max_depth || rows.len() < 2 * params.min_samples_leaf {
            return make_leaf(&mut self.nodes);
        }

        let split = match best_split(x, grad, hess, rows, params, sum_g, sum_h) {
            Some(s) => s,
            None => return make_leaf(&mut self.nodes),
        };

        // Partition rows in place around the chosen split.
        let pivot = partition(x, rows, split.feature, split.threshold);
        let node_index = self.nodes.len();
        self.nodes.push(Node {
            feature: split.feature,
            threshold: split.threshold,
            left: 0,
            right: 0,
            value: 0.0,
            leaf: false,
        });

        let (left_rows, right_rows) = rows.split_at_mut(pivot);
        let left = self.build(x, grad, hess, left_rows, depth + 1, params);
        let right = self.build(x, grad, hess, right_rows, depth + 1, params);
        self.nodes[node_index].left = left;
        self.nodes[node_index].right = right;
        node_index
    }
}

struct Split {
    feature: usize,
    threshold: f32,
}

/// Exact greedy split search over every feature.
fn best_split(
    x: ArrayView2<f32>,
    grad: &[f32],
    hess: &[f32],
    rows: &[usize],
    params: &TreeParams,
    sum_g: f32,
    sum_h: f32,
) -> Option<Split> {
    if rows.len() < 2 {
        return None;
    }

    let parent_score = sum_g * sum_g / (sum_h + params.lambda);
    let mut best_gain = 1e-6f32;
    let mut best: Option<Split> = None;

    let n_features = x.ncols();
    let mut ordered: Vec<(f32, usize)> = Vec::with_capacity(rows.len());

    for feature in 0..n_features {
        ordered.clear();
        ordered.extend(rows.iter().map(|&r| (x[[r, feature]], r)));
        ordered.sort_by(|a, b| crate::utils::safe_float_cmp(a.0, b.0));

        let mut left_g = 0.0f32;
        let mut left_h = 0.0f32;
        for i in 0..ordered.len() - 1 {
            let (value, row) = ordered[i];
            left_g += grad[row];
            left_h += hess[row];

            // No valid threshold between equal feature values.
            let next_value = ordered[i + 1].0;
            if next_value <= value {
                continue;
            }

            let left_count = i + 1;
            let right_count = ordered.len() - left_count;
            if left_count < params.min_samples_leaf || right_count < params.min_samples_leaf {
                continue;
            }

            let right_g = sum_g - left_g;
            let right_h = sum_h - left_h;
            let gain = left_g * left_g / (left_h + params.lambda)
                + right_g * right_g / (right_h + params.lambda)
                - parent_score;

            if gain > best_gain {
                best_gain = gain;
                best = Some(Split {
                    feature,
                    threshold: (value + next_value) / 2.0,
                });
            }
        }
    }

    best
}

/// Partition `rows` so rows with `x[feature] <= threshold` come first;
/// returns the boundary index.
fn partition(x: ArrayView2<f32>, rows: &mut [usize], feature: usize, threshold: f32) -> usize {
    let mut boundary = 0;
    for i in 0..rows.len() {
        if x[[rows[i], feature]] <= threshold {
            rows.swap(i, boundary);
            boundary += 1;
        }
    }
    boundary
}
