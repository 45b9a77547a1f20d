//! Gradient-boosted multiclass classifier.
//!
//! Softmax boosting over [`RegressionTree`]s: each round fits one tree per
//! class to the gradient of the multiclass log-loss. Chosen over deeper
//! models because it trains in seconds on small synthetic corpora, infers
//! fast on a single CPU core, and serializes to a few hundred kilobytes.

use crate::error::{Error, Result};
use crate::model::tree::{RegressionTree, TreeParams};
use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Boosting hyperparameters.
///
/// Defaults match the reference configuration this system was tuned with:
/// 50 rounds of depth-6 trees, learning rate 0.1, 80% row subsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtParams {
    /// Number of boosting rounds
    pub n_rounds: usize,
    /// Maximum depth per tree
    pub max_depth: usize,
    /// Shrinkage applied to each tree's contribution
    pub learning_rate: f32,
    /// Fraction of rows sampled per round, in (0, 1]
    pub subsample: f32,
    /// Minimum number of samples per leaf
    pub min_samples_leaf: usize,
    /// L2 regularization on leaf weights
    pub lambda: f32,
    /// RNG seed for row subsampling; fixing it makes `fit` deterministic
    pub seed: u64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            n_rounds: 50,
            max_depth: 6,
            learning_rate: 0.1,
            subsample: 0.8,
            min_samples_leaf: 5,
            lambda: 1.0,
            seed: 42,
        }
    }
}

/// A fitted gradient-boosted classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    n_classes: usize,
    n_features: usize,
    learning_rate: f32,
    /// trees[round][class]
    trees: Vec<Vec<RegressionTree>>,
}

impl GradientBoostedClassifier {
    /// Fit a classifier on a feature matrix and integer class labels.
    ///
    /// Deterministic for a fixed `params.seed`: identical inputs always
    /// produce an identical ensemble.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Training`] on an empty training set, a label out
    /// of range, or a label/row count mismatch.
    pub fn fit(
        x: ArrayView2<f32>,
        y: &[usize],
        n_classes: usize,
        params: &GbdtParams,
    ) -> Result<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(Error::Training("empty training set".to_string()));
        }
        if y.len() != n {
            return Err(Error::Training(format!(
                "feature matrix has {} rows but {} labels were given",
                n,
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(Error::Training(format!(
                "label {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf,
            lambda: params.lambda,
        };
        let subsample = params.subsample.clamp(f32::EPSILON, 1.0);
        let mut rng = StdRng::seed_from_u64(params.seed);

        let mut scores = Array2::<f32>::zeros((n, n_classes));
        let mut trees: Vec<Vec<RegressionTree>> = Vec::with_capacity(params.n_rounds);
        let mut grad = vec![0.0f32; n];
        let mut hess = vec![0.0f32; n];

        for _round in 0..params.n_rounds {
            let probs = softmax_rows(&scores);

            let rows: Vec<usize> = if subsample < 1.0 {
                (0..n)
                    .filter(|_| rng.random::<f32>() < subsample)
                    .collect()
            } else {
                (0..n).collect()
            };
            // A degenerate draw falls back to the full sample.
            let rows = if rows.len() < 2 { (0..n).collect() } else { rows };

            let mut round_trees = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                for i in 0..n {
                    let p = probs[[i, class]];
                    let target = if y[i] == class { 1.0 } else { 0.0 };
                    grad[i] = p - target;
                    hess[i] = (p * (1.0 - p)).max(1e-6);
                }
                round_trees.push(RegressionTree::fit(x, &grad, &hess, &rows, &tree_params));
            }

            for (class, tree) in round_trees.iter().enumerate() {
                for i in 0..n {
                    scores[[i, class]] += params.learning_rate * tree.predict_row(x.row(i));
                }
            }
            trees.push(round_trees);
        }

        Ok(Self {
            n_classes,
            n_features: x.ncols(),
            learning_rate: params.learning_rate,
            trees,
        })
    }

    /// Class probabilities for a batch of feature rows.
    ///
    /// Returns an `(n_rows, n_classes)` matrix; each row sums to 1.
    pub fn predict_proba(&self, x: ArrayView2<f32>) -> Array2<f32> {
        let n = x.nrows();
        let mut scores = Array2::<f32>::zeros((n, self.n_classes));
        for round_trees in &self.trees {
            for (class, tree) in round_trees.iter().enumerate() {
                for i in 0..n {
                    scores[[i, class]] += self.learning_rate * tree.predict_row(x.row(i));
                }
            }
        }
        softmax_rows(&scores)
    }

    /// Number of classes the classifier was fitted for.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of features the classifier expects per row.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Row-wise numerically stable softmax.
fn softmax_rows(scores: &Array2<f32>) -> Array2<f32> {
    let mut probs = scores.clone();
    for mut row in probs.rows_mut() {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0f32;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
    probs
}
