//! Document analysis orchestration.
//!
//! [`DocumentAnalyzer`] ties the pipeline together: page-limit check,
//! context build, featurization, batched classification, confidence
//! fallback, title resolution and outline assembly. Per-document analysis
//! is synchronous and CPU-bound with no I/O; batches of documents run in
//! parallel over a shared read-only model.

use crate::classify::{apply_fallback, StructureClassifier};
use crate::config::AnalysisConfig;
use crate::context::DocumentContext;
use crate::error::{Error, Result};
use crate::features::featurize_document;
use crate::layout::{RawDocument, TextSpan};
use crate::model::TrainedModel;
use crate::outline::{assemble, StructureResult};
use crate::title::resolve_title;
use rayon::prelude::*;
use std::sync::Arc;

/// Analyzes documents against a loaded model.
///
/// Holds the only long-lived state of the pipeline: an `Arc` to the
/// read-only [`TrainedModel`] plus the configuration. Cloning is cheap
/// and analyzers are freely shareable across threads.
///
/// # Examples
///
/// ```no_run
/// use docstruct::analyzer::DocumentAnalyzer;
/// use docstruct::config::AnalysisConfig;
/// use docstruct::model::TrainedModel;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn main() -> docstruct::error::Result<()> {
/// let model = Arc::new(TrainedModel::load(Path::new("models/structure.json"))?);
/// let analyzer = DocumentAnalyzer::new(model, AnalysisConfig::default());
/// # let spans = vec![];
/// let result = analyzer.analyze(&spans, 12)?;
/// println!("{}", serde_json::to_string_pretty(&result)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentAnalyzer {
    classifier: StructureClassifier,
    config: AnalysisConfig,
}

impl DocumentAnalyzer {
    /// Create an analyzer over a loaded model.
    pub fn new(model: Arc<TrainedModel>, config: AnalysisConfig) -> Self {
        Self {
            classifier: StructureClassifier::new(model),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one document.
    ///
    /// Deterministic and idempotent for a fixed model and input. An empty
    /// document (no usable spans) is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::InputTooLarge`] when `page_count` exceeds the configured
    /// limit; the document is rejected before any featurization.
    pub fn analyze(&self, spans: &[TextSpan], page_count: u32) -> Result<StructureResult> {
        if page_count > self.config.max_pages {
            return Err(Error::InputTooLarge {
                pages: page_count,
                max_pages: self.config.max_pages,
            });
        }

        // Malformed spans are skipped, never fatal for the document.
        let mut usable: Vec<TextSpan> = Vec::with_capacity(spans.len());
        let mut skipped = 0usize;
        for span in spans {
            if span.is_well_formed() {
                usable.push(span.clone());
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("Skipped {} malformed span(s) during featurization", skipped);
        }

        if usable.is_empty() {
            return Ok(StructureResult::empty());
        }

        // Reading order: page ascending, input order within a page.
        usable.sort_by_key(|s| s.page);

        let ctx = DocumentContext::build(&usable, self.config.body_size_estimator);
        let features = featurize_document(&usable, &ctx);
        let mut predictions = self.classifier.predict(features.view());
        apply_fallback(&mut predictions, &usable, &ctx, &self.config);

        let title = resolve_title(&usable);
        let result = assemble(&usable, &predictions, title);

        log::debug!(
            "Analyzed document: {} spans, {} outline entries",
            usable.len(),
            result.outline.len()
        );
        Ok(result)
    }

    /// Analyze a batch of independent documents in parallel.
    ///
    /// Documents are processed on a bounded worker pool sized to the
    /// available CPU cores; the shared model is the only state crossing
    /// documents and it is read-only. A failed document yields its own
    /// `Err` entry and never aborts its siblings. Results are returned in
    /// input order.
    pub fn analyze_batch(&self, documents: &[RawDocument]) -> Vec<Result<StructureResult>> {
        documents
            .par_iter()
            .map(|doc| self.analyze(&doc.spans, doc.page_count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::layout::FontWeight;
    use crate::model::{train_offline, GbdtParams};

    fn test_model() -> Arc<TrainedModel> {
        let params = GbdtParams {
            n_rounds: 15,
            max_depth: 4,
            ..Default::default()
        };
        Arc::new(train_offline(1200, &params).unwrap())
    }

    fn span(text: &str, page: u32, size: f32, bold: bool, y: f32, seq: usize) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            page,
            bbox: Rect::new(72.0, y, 300.0, size * 1.2),
            font_name: if bold { "Times-Bold" } else { "Times" }.to_string(),
            font_size: size,
            font_weight: if bold { FontWeight::Bold } else { FontWeight::Normal },
            is_italic: false,
            sequence: seq,
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    #[test]
    fn test_rejects_oversized_document() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let result = analyzer.analyze(&[], 51);
        assert!(matches!(result, Err(Error::InputTooLarge { pages: 51, .. })));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let result = analyzer.analyze(&[], 0).unwrap();
        assert_eq!(result, StructureResult::empty());
    }

    #[test]
    fn test_malformed_spans_skipped_not_fatal() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let mut bad = span("broken", 0, 12.0, false, 100.0, 1);
        bad.bbox.x = f32::NAN;
        let spans = vec![span("Fine Heading", 0, 24.0, true, 72.0, 0), bad];

        let result = analyzer.analyze(&spans, 1).unwrap();
        assert_eq!(result.title, "Fine Heading");
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let spans = vec![
            span("Quarterly Report", 0, 24.0, true, 72.0, 0),
            span("Revenue grew modestly across all segments this year.", 0, 11.0, false, 140.0, 1),
            span("Outlook", 1, 16.0, true, 72.0, 0),
        ];
        let a = analyzer.analyze(&spans, 2).unwrap();
        let b = analyzer.analyze(&spans, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let good = RawDocument {
            spans: vec![span("Title", 0, 24.0, true, 72.0, 0)],
            page_count: 1,
        };
        let too_big = RawDocument {
            spans: vec![],
            page_count: 400,
        };

        let results = analyzer.analyze_batch(&[good, too_big]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::InputTooLarge { .. })));
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let analyzer = DocumentAnalyzer::new(test_model(), AnalysisConfig::default());
        let docs: Vec<RawDocument> = (0..8)
            .map(|i| RawDocument {
                spans: vec![span(&format!("Document {}", i), 0, 24.0, true, 72.0, 0)],
                page_count: 1,
            })
            .collect();

        let results = analyzer.analyze_batch(&docs);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().title, format!("Document {}", i));
        }
    }
}
