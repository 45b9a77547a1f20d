//! Model artifact persistence.
//!
//! A [`TrainedModel`] bundles the fitted classifier with the feature
//! schema it was fitted against. The artifact is a single JSON file;
//! loading verifies both the artifact format version and the feature
//! schema so a stale model can never be fed mismatched features.

use crate::error::{Error, Result};
use crate::features::{FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::model::gbdt::GradientBoostedClassifier;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Artifact format version. Bump on incompatible layout changes.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// A trained, read-only model artifact.
///
/// The only long-lived object in the pipeline: loaded once per process,
/// shared across all analyses via `Arc`, never mutated after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    format_version: u32,
    feature_version: String,
    feature_names: Vec<String>,
    classifier: GradientBoostedClassifier,
}

impl TrainedModel {
    /// Wrap a freshly fitted classifier with the current schema metadata.
    pub fn new(classifier: GradientBoostedClassifier) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            feature_version: FEATURE_SCHEMA_VERSION.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classifier,
        }
    }

    /// The fitted classifier.
    pub fn classifier(&self) -> &GradientBoostedClassifier {
        &self.classifier
    }

    /// Feature schema version recorded at training time.
    pub fn feature_version(&self) -> &str {
        &self.feature_version
    }

    /// Persist the model to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        log::info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Load a model from disk, failing loudly when unavailable.
    ///
    /// # Errors
    ///
    /// - [`Error::ModelUnavailable`] when the file is missing, unreadable,
    ///   or not a valid artifact. Inference callers must surface this
    ///   rather than fall back to an untrained model.
    /// - [`Error::SchemaMismatch`] when the artifact was produced under a
    ///   different format or feature schema version.
    pub fn load(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::ModelUnavailable {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
        let model: TrainedModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| unavailable(format!("invalid artifact: {}", e)))?;

        if model.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::SchemaMismatch {
                expected: format!("format-v{}", MODEL_FORMAT_VERSION),
                found: format!("format-v{}", model.format_version),
            });
        }
        if model.feature_version != FEATURE_SCHEMA_VERSION
            || model.feature_names != FEATURE_NAMES
        {
            return Err(Error::SchemaMismatch {
                expected: FEATURE_SCHEMA_VERSION.to_string(),
                found: model.feature_version,
            });
        }

        log::info!("Model loaded from {}", path.display());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::gbdt::GbdtParams;
    use ndarray::Array2;

    fn tiny_model() -> TrainedModel {
        let mut x = Array2::zeros((20, crate::features::FEATURE_COUNT));
        let mut y = Vec::new();
        for i in 0..20 {
            x[[i, 0]] = (if i < 10 { 11.0 } else { 20.0 }) + (i % 5) as f32 * 0.1;
            x[[i, 1]] = x[[i, 0]] / 11.0;
            y.push(if i < 10 { 0 } else { 3 });
        }
        let params = GbdtParams {
            n_rounds: 5,
            max_depth: 2,
            min_samples_leaf: 2,
            ..Default::default()
        };
        let classifier =
            GradientBoostedClassifier::fit(x.view(), &y, crate::classify::N_CLASSES, &params)
                .unwrap();
        TrainedModel::new(classifier)
    }

    #[test]
    fn test_load_missing_file() {
        let result = TrainedModel::load(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(Error::ModelUnavailable { .. })));
    }

    #[test]
    fn test_new_records_current_schema() {
        let model = tiny_model();
        assert_eq!(model.feature_version(), FEATURE_SCHEMA_VERSION);
        assert_eq!(model.feature_names, FEATURE_NAMES);
    }

    #[test]
    fn test_corrupt_artifact_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json at all").unwrap();

        let result = TrainedModel::load(&path);
        assert!(matches!(result, Err(Error::ModelUnavailable { .. })));
    }

    #[test]
    fn test_stale_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut stale = tiny_model();
        stale.feature_version = "features-v0".to_string();
        stale.save(&path).unwrap();

        let result = TrainedModel::load(&path);
        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let model = tiny_model();
        model.save(&path).unwrap();
        let restored = TrainedModel::load(&path).unwrap();

        let mut batch = Array2::zeros((4, crate::features::FEATURE_COUNT));
        for i in 0..4 {
            batch[[i, 0]] = 10.0 + i as f32 * 4.0;
            batch[[i, 1]] = batch[[i, 0]] / 11.0;
        }
        assert_eq!(
            model.classifier().predict_proba(batch.view()),
            restored.classifier().predict_proba(batch.view())
        );
    }
}
