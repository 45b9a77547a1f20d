//! Trainable structure model: boosting, artifact persistence, training.
//!
//! The model is a compact gradient-boosted tree ensemble fitted offline
//! (see [`train::train_offline`]) and loaded read-only at inference time
//! (see [`TrainedModel::load`]).

pub mod artifact;
pub mod gbdt;
pub mod train;
pub mod tree;

pub use artifact::{TrainedModel, MODEL_FORMAT_VERSION};
pub use gbdt::{GbdtParams, GradientBoostedClassifier};
pub use train::train_offline;
