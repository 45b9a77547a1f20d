//! Configuration for document analysis.

use serde::{Deserialize, Serialize};

/// How the document's body-text font size is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySizeEstimator {
    /// Character-count-weighted median of span font sizes
    Median,
    /// Character-count-weighted mode of span font sizes (0.5 pt bins)
    Mode,
}

/// What to do with a prediction whose confidence falls below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Reclassify by font-size percentile rank within the document
    SizePercentile,
    /// Treat the span as body text
    DemoteToBody,
}

/// Analysis configuration.
///
/// # Examples
///
/// ```
/// use docstruct::config::{AnalysisConfig, FallbackPolicy};
///
/// let config = AnalysisConfig::new()
///     .with_confidence_threshold(0.7)
///     .with_fallback_policy(FallbackPolicy::DemoteToBody);
/// assert_eq!(config.max_pages, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Predictions below this confidence are handled by `fallback_policy`.
    /// Must lie in [0, 1].
    pub confidence_threshold: f32,

    /// Documents with more pages than this are rejected with
    /// [`crate::error::Error::InputTooLarge`].
    pub max_pages: u32,

    /// Body-text size estimation strategy.
    pub body_size_estimator: BodySizeEstimator,

    /// Low-confidence handling policy.
    pub fallback_policy: FallbackPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self {
            confidence_threshold: 0.6,
            max_pages: 50,
            body_size_estimator: BodySizeEstimator::Median,
            fallback_policy: FallbackPolicy::SizePercentile,
        }
    }

    /// Set the confidence threshold (clamped to [0, 1]).
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the page limit.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the body-size estimation strategy.
    pub fn with_body_size_estimator(mut self, estimator: BodySizeEstimator) -> Self {
        self.body_size_estimator = estimator;
        self
    }

    /// Set the low-confidence fallback policy.
    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }
}
