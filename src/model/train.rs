//! Offline training flow.
//!
//! Training is an explicit, separate phase: inference code loads an
//! existing artifact or fails, and never trains as a side effect. This
//! module wires the synthetic corpus through a holdout split, fits the
//! booster, and logs holdout accuracy before handing back the artifact.

use crate::classify::N_CLASSES;
use crate::error::Result;
use crate::model::gbdt::{GbdtParams, GradientBoostedClassifier};
use crate::model::TrainedModel;
use crate::synthetic;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fraction of samples held out for evaluation.
const HOLDOUT_FRACTION: f32 = 0.2;

/// Train a model on a synthetic corpus.
///
/// Deterministic for fixed `n_samples` and `params` (the corpus seed and
/// the subsampling seed both derive from `params.seed`). CPU-only, no
/// network access.
pub fn train_offline(n_samples: usize, params: &GbdtParams) -> Result<TrainedModel> {
    log::info!("Generating {} synthetic training samples", n_samples);
    let (x, labels) = synthetic::generate(n_samples, params.seed);
    let y: Vec<usize> = labels.iter().map(|l| l.index()).collect();

    let mut order: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(params.seed);
    order.shuffle(&mut rng);

    let holdout = ((n_samples as f32 * HOLDOUT_FRACTION) as usize).min(n_samples.saturating_sub(1));
    let (test_rows, train_rows) = order.split_at(holdout);

    let train_x = x.select(Axis(0), train_rows);
    let train_y: Vec<usize> = train_rows.iter().map(|&i| y[i]).collect();

    log::info!("Fitting gradient-boosted classifier on {} samples", train_rows.len());
    let classifier = GradientBoostedClassifier::fit(train_x.view(), &train_y, N_CLASSES, params)?;

    if !test_rows.is_empty() {
        let test_x = x.select(Axis(0), test_rows);
        let test_y: Vec<usize> = test_rows.iter().map(|&i| y[i]).collect();
        let accuracy = evaluate(&classifier, &test_x, &test_y);
        log::info!(
            "Holdout accuracy: {:.4} ({} samples)",
            accuracy,
            test_rows.len()
        );
    }

    Ok(TrainedModel::new(classifier))
}

/// Argmax accuracy on a labeled batch.
fn evaluate(classifier: &GradientBoostedClassifier, x: &Array2<f32>, y: &[usize]) -> f32 {
    let probs = classifier.predict_proba(x.view());
    let correct = probs
        .rows()
        .into_iter()
        .zip(y)
        .filter(|(row, &label)| {
            let best = row
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| crate::utils::safe_float_cmp(**a, **b))
                .map(|(i, _)| i);
            best == Some(label)
        })
        .count();
    correct as f32 / y.len().max(1) as f32
}
