//! Span classification: labels, predictions, and the confidence fallback.
//!
//! The classifier maps batched feature matrices to per-span labels with
//! confidences. Low-confidence predictions are handed to a configurable
//! fallback instead of being trusted: either a font-size percentile
//! heuristic or a demotion to body text.

use crate::config::{AnalysisConfig, FallbackPolicy};
use crate::context::DocumentContext;
use crate::layout::TextSpan;
use crate::model::TrainedModel;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structural class of a span.
///
/// Ordered by heading seniority: `Body < H3 < H2 < H1`. The ordering
/// reflects rank, not numeric level — H1 is the most senior heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    /// Regular body text (the majority class)
    Body,
    /// Subsection heading
    H3,
    /// Section heading
    H2,
    /// Top-level heading
    H1,
}

/// Number of structural classes.
pub const N_CLASSES: usize = 4;

impl ClassLabel {
    /// Class index used by the model (Body = 0 … H1 = 3).
    pub fn index(&self) -> usize {
        match self {
            ClassLabel::Body => 0,
            ClassLabel::H3 => 1,
            ClassLabel::H2 => 2,
            ClassLabel::H1 => 3,
        }
    }

    /// Label for a class index, if valid.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ClassLabel::Body),
            1 => Some(ClassLabel::H3),
            2 => Some(ClassLabel::H2),
            3 => Some(ClassLabel::H1),
            _ => None,
        }
    }

    /// True for H1/H2/H3.
    pub fn is_heading(&self) -> bool {
        !matches!(self, ClassLabel::Body)
    }
}

/// One prediction: a label and the classifier's confidence in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted structural class
    pub label: ClassLabel,
    /// Self-reported certainty in [0, 1]
    pub confidence: f32,
}

/// Batched structure classifier over a shared, read-only model.
#[derive(Debug, Clone)]
pub struct StructureClassifier {
    model: Arc<TrainedModel>,
}

impl StructureClassifier {
    /// Create a classifier over a loaded model.
    pub fn new(model: Arc<TrainedModel>) -> Self {
        Self { model }
    }

    /// Predict labels and confidences for a batch of feature rows.
    ///
    /// The whole matrix goes through the model in one pass; confidence is
    /// the maximum class probability of each row.
    pub fn predict(&self, features: ArrayView2<f32>) -> Vec<Prediction> {
        let probs = self.model.classifier().predict_proba(features);
        probs
            .rows()
            .into_iter()
            .map(|row| {
                let (best, confidence) = row.iter().copied().enumerate().fold(
                    (0usize, f32::NEG_INFINITY),
                    |(bi, bv), (i, v)| if v > bv { (i, v) } else { (bi, bv) },
                );
                Prediction {
                    // predict_proba emits exactly N_CLASSES columns
                    label: ClassLabel::from_index(best).unwrap_or(ClassLabel::Body),
                    confidence,
                }
            })
            .collect()
    }
}

/// Apply the configured low-confidence policy in place.
///
/// Predictions at or above the threshold are left untouched. Below it,
/// the span is treated as non-authoritative: `SizePercentile` reclassifies
/// it from its font-size rank within the document, `DemoteToBody` drops it
/// to body text. Relabeling keeps the model's original confidence so the
/// two sources stay distinguishable downstream.
pub fn apply_fallback(
    predictions: &mut [Prediction],
    spans: &[TextSpan],
    ctx: &DocumentContext,
    config: &AnalysisConfig,
) {
    debug_assert_eq!(predictions.len(), spans.len());

    for (prediction, span) in predictions.iter_mut().zip(spans) {
        if prediction.confidence >= config.confidence_threshold {
            continue;
        }
        prediction.label = match config.fallback_policy {
            FallbackPolicy::DemoteToBody => ClassLabel::Body,
            FallbackPolicy::SizePercentile => percentile_label(span, ctx),
        };
    }
}

/// Heuristic relabeling by font-size percentile rank.
///
/// Rank thresholds gate on styling the way headings are styled in
/// practice: only the very largest spans pass without being bold. A span
/// no larger than the body-size estimate is never promoted, whatever its
/// rank — in a uniform-size document every span ranks at 1.0.
fn percentile_label(span: &TextSpan, ctx: &DocumentContext) -> ClassLabel {
    if span.font_size <= ctx.body_size {
        return ClassLabel::Body;
    }

    let rank = ctx.size_percentile(span.font_size);
    let bold = span.is_bold();

    if rank >= 0.98 {
        ClassLabel::H1
    } else if rank >= 0.92 && bold {
        ClassLabel::H2
    } else if rank >= 0.85 && (bold || mostly_uppercase(&span.text)) {
        ClassLabel::H3
    } else {
        ClassLabel::Body
    }
}

/// True when more than 70% of the letters in `text` are uppercase.
fn mostly_uppercase(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    upper as f32 / letters.len() as f32 > 0.7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodySizeEstimator;
    use crate::geometry::Rect;
    use crate::layout::FontWeight;

    fn span(text: &str, size: f32, bold: bool, y: f32, seq: usize) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            page: 0,
            bbox: Rect::new(72.0, y, 200.0, size * 1.2),
            font_name: "Times".to_string(),
            font_size: size,
            font_weight: if bold { FontWeight::Bold } else { FontWeight::Normal },
            is_italic: false,
            sequence: seq,
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    #[test]
    fn test_label_ordering() {
        assert!(ClassLabel::Body < ClassLabel::H3);
        assert!(ClassLabel::H3 < ClassLabel::H2);
        assert!(ClassLabel::H2 < ClassLabel::H1);
    }

    #[test]
    fn test_label_index_round_trip() {
        for index in 0..N_CLASSES {
            let label = ClassLabel::from_index(index).unwrap();
            assert_eq!(label.index(), index);
        }
        assert_eq!(ClassLabel::from_index(N_CLASSES), None);
    }

    #[test]
    fn test_is_heading() {
        assert!(ClassLabel::H1.is_heading());
        assert!(ClassLabel::H3.is_heading());
        assert!(!ClassLabel::Body.is_heading());
    }

    /// Document where one 24 pt bold span towers over forty 11 pt spans.
    fn skewed_doc() -> Vec<TextSpan> {
        let mut spans = vec![span("BIG HEADING", 24.0, true, 72.0, 0)];
        for i in 0..40 {
            spans.push(span("body text", 11.0, false, 100.0 + i as f32 * 15.0, i + 1));
        }
        spans
    }

    #[test]
    fn test_fallback_demote_to_body() {
        let spans = skewed_doc();
        let ctx = DocumentContext::build(&spans, BodySizeEstimator::Median);
        let config = AnalysisConfig::new().with_fallback_policy(FallbackPolicy::DemoteToBody);

        let mut predictions = vec![
            Prediction {
                label: ClassLabel::H1,
                confidence: 0.3,
            };
            spans.len()
        ];
        apply_fallback(&mut predictions, &spans, &ctx, &config);
        assert!(predictions.iter().all(|p| p.label == ClassLabel::Body));
    }

    #[test]
    fn test_fallback_percentile_promotes_outlier() {
        let spans = skewed_doc();
        let ctx = DocumentContext::build(&spans, BodySizeEstimator::Median);
        let config = AnalysisConfig::new().with_fallback_policy(FallbackPolicy::SizePercentile);

        let mut predictions = vec![
            Prediction {
                label: ClassLabel::Body,
                confidence: 0.2,
            };
            spans.len()
        ];
        apply_fallback(&mut predictions, &spans, &ctx, &config);

        // The 24 pt outlier ranks above everything else.
        assert_eq!(predictions[0].label, ClassLabel::H1);
        // Plain 11 pt body spans stay body.
        assert!(predictions[1..].iter().all(|p| p.label == ClassLabel::Body));
    }

    #[test]
    fn test_fallback_percentile_keeps_uniform_document_as_body() {
        // Every span shares one size, so every span ranks at 1.0; none of
        // them may be promoted to a heading.
        let spans: Vec<TextSpan> = (0..30)
            .map(|i| span("plain paragraph text", 12.0, false, 100.0 + i as f32 * 15.0, i))
            .collect();
        let ctx = DocumentContext::build(&spans, BodySizeEstimator::Median);
        let config = AnalysisConfig::new().with_fallback_policy(FallbackPolicy::SizePercentile);

        let mut predictions = vec![
            Prediction {
                label: ClassLabel::Body,
                confidence: 0.3,
            };
            spans.len()
        ];
        apply_fallback(&mut predictions, &spans, &ctx, &config);
        assert!(predictions.iter().all(|p| p.label == ClassLabel::Body));
    }

    #[test]
    fn test_fallback_leaves_confident_predictions_alone() {
        let spans = skewed_doc();
        let ctx = DocumentContext::build(&spans, BodySizeEstimator::Median);
        let config = AnalysisConfig::new().with_fallback_policy(FallbackPolicy::DemoteToBody);

        let mut predictions = vec![
            Prediction {
                label: ClassLabel::H2,
                confidence: 0.95,
            };
            spans.len()
        ];
        apply_fallback(&mut predictions, &spans, &ctx, &config);
        assert!(predictions.iter().all(|p| p.label == ClassLabel::H2));
    }

    #[test]
    fn test_mostly_uppercase() {
        assert!(mostly_uppercase("INTRODUCTION"));
        assert!(mostly_uppercase("RESULTS AND DISCUSSION"));
        assert!(!mostly_uppercase("This is mostly lowercase"));
        assert!(!mostly_uppercase("12345"));
    }
}
