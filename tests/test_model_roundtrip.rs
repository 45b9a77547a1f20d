//! Model artifact persistence tests.
//!
//! The persist/reload round trip must be lossless: a reloaded model
//! produces identical predictions on a fixed held-out batch.

use docstruct::model::{train_offline, GbdtParams, TrainedModel};
use docstruct::synthetic;
use docstruct::Error;

fn small_training() -> TrainedModel {
    let params = GbdtParams {
        n_rounds: 10,
        max_depth: 3,
        ..Default::default()
    };
    train_offline(800, &params).expect("training on synthetic data")
}

#[test]
fn test_round_trip_predictions_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structure.json");

    let model = small_training();
    model.save(&path).unwrap();
    let reloaded = TrainedModel::load(&path).unwrap();

    // Fixed held-out batch, generated with a seed never used in training.
    let (holdout, _) = synthetic::generate(200, 0xDEAD);
    assert_eq!(
        model.classifier().predict_proba(holdout.view()),
        reloaded.classifier().predict_proba(holdout.view())
    );
}

#[test]
fn test_artifact_is_small() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structure.json");

    // Full-size configuration, as the training binary would produce.
    let model = train_offline(4000, &GbdtParams::default()).unwrap();
    model.save(&path).unwrap();

    let size = std::fs::metadata(&path).unwrap().len();
    // Budget is 200 MB; a healthy artifact is several orders smaller.
    assert!(size < 200 * 1024 * 1024);
    assert!(size > 0);
}

#[test]
fn test_missing_model_is_a_clear_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never_written.json");

    match TrainedModel::load(&path) {
        Err(Error::ModelUnavailable { path: p, .. }) => {
            assert!(p.contains("never_written.json"));
        }
        other => panic!("expected ModelUnavailable, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_garbage_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structure.json");
    std::fs::write(&path, r#"{"weights": [1, 2, 3]}"#).unwrap();

    assert!(matches!(
        TrainedModel::load(&path),
        Err(Error::ModelUnavailable { .. })
    ));
}
