//! Per-document aggregates computed before featurization.
//!
//! Every feature the classifier sees is relative to the document, because
//! absolute font sizes do not generalize across documents. This module
//! computes the reference statistics once per document: the body-text size
//! estimate, the dominant body font, vertical gaps between consecutive
//! spans, and the font-size percentile table used by the heuristic
//! fallback.

use crate::config::BodySizeEstimator;
use crate::layout::TextSpan;
use std::collections::HashMap;

/// Document-level context shared by all spans during featurization.
///
/// Built once per document from the full span list; immutable afterwards.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    /// Estimated body-text font size in points (never zero)
    pub body_size: f32,
    /// Most common font family by character count
    pub dominant_font: String,
    /// Vertical gap in points to the preceding span on the same page,
    /// aligned index-for-index with the span slice the context was built
    /// from (0.0 for the first span on each page)
    gaps: Vec<f32>,
    /// All span font sizes, sorted ascending (percentile lookups)
    sorted_sizes: Vec<f32>,
}

impl DocumentContext {
    /// Build the context from a document's spans.
    ///
    /// The span slice must already be filtered to well-formed spans; the
    /// gap table is aligned with it index-for-index.
    pub fn build(spans: &[TextSpan], estimator: BodySizeEstimator) -> Self {
        let body_size = match estimator {
            BodySizeEstimator::Median => weighted_median_size(spans),
            BodySizeEstimator::Mode => weighted_mode_size(spans),
        };

        let mut sorted_sizes: Vec<f32> = spans.iter().map(|s| s.font_size).collect();
        sorted_sizes.sort_by(crate::utils::safe_float_cmp_ref);

        Self {
            body_size,
            dominant_font: dominant_font(spans),
            gaps: vertical_gaps(spans),
            sorted_sizes,
        }
    }

    /// Vertical gap to the preceding span on the page, for the span at
    /// `index` in the slice the context was built from.
    pub fn gap_above(&self, index: usize) -> f32 {
        self.gaps.get(index).copied().unwrap_or(0.0)
    }

    /// Percentile rank of a font size within the document, in [0, 1].
    ///
    /// Fraction of spans whose size is at most `font_size`, so the
    /// document's largest size ranks at 1.0. An empty document ranks
    /// everything at 0.
    pub fn size_percentile(&self, font_size: f32) -> f32 {
        if self.sorted_sizes.is_empty() {
            return 0.0;
        }
        let at_most = self.sorted_sizes.partition_point(|&s| s <= font_size);
        at_most as f32 / self.sorted_sizes.len() as f32
    }
}

/// Character-count-weighted median of span font sizes.
///
/// Weighting by text length keeps one oversized title from dragging the
/// estimate away from the true body size.
fn weighted_median_size(spans: &[TextSpan]) -> f32 {
    if spans.is_empty() {
        return 1.0;
    }

    let mut weighted: Vec<(f32, usize)> = spans
        .iter()
        .map(|s| (s.font_size, s.text.chars().count().max(1)))
        .collect();
    weighted.sort_by(|a, b| crate::utils::safe_float_cmp(a.0, b.0));

    let total: usize = weighted.iter().map(|(_, w)| w).sum();
    let half = total / 2;
    let mut cumulative = 0usize;
    for (size, weight) in &weighted {
        cumulative += weight;
        if cumulative > half {
            return size.max(1.0);
        }
    }
    weighted[weighted.len() - 1].0.max(1.0)
}

/// Character-count-weighted mode of span font sizes, binned to 0.5 pt.
///
/// Ties go to the smaller size: body text is the smaller of two equally
/// common sizes in practice.
fn weighted_mode_size(spans: &[TextSpan]) -> f32 {
    if spans.is_empty() {
        return 1.0;
    }

    let mut bins: HashMap<i32, usize> = HashMap::new();
    for span in spans {
        let bin = (span.font_size * 2.0).round() as i32;
        *bins.entry(bin).or_insert(0) += span.text.chars().count().max(1);
    }

    let (&bin, _) = bins
        .iter()
        .max_by(|(bin_a, weight_a), (bin_b, weight_b)| {
            weight_a.cmp(weight_b).then(bin_b.cmp(bin_a))
        })
        .unwrap_or((&2, &1));

    (bin as f32 / 2.0).max(1.0)
}

/// Most common font family by character count.
fn dominant_font(spans: &[TextSpan]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for span in spans {
        *counts.entry(span.font_name.as_str()).or_insert(0) += span.text.chars().count();
    }

    counts
        .into_iter()
        .max_by(|(name_a, count_a), (name_b, count_b)| {
            count_a.cmp(count_b).then(name_b.cmp(name_a))
        })
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

/// Vertical gap from each span to its predecessor on the same page.
///
/// Predecessor order is (top edge, sequence); the gap is the whitespace
/// between the predecessor's bottom edge and the span's top edge, floored
/// at zero for overlapping spans on a shared baseline.
fn vertical_gaps(spans: &[TextSpan]) -> Vec<f32> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        spans[a]
            .page
            .cmp(&spans[b].page)
            .then(crate::utils::safe_float_cmp(spans[a].bbox.y, spans[b].bbox.y))
            .then(spans[a].sequence.cmp(&spans[b].sequence))
    });

    let mut gaps = vec![0.0f32; spans.len()];
    for window in order.windows(2) {
        let (prev, curr) = (window[0], window[1]);
        if spans[prev].page == spans[curr].page {
            gaps[curr] = (spans[curr].bbox.top() - spans[prev].bbox.bottom()).max(0.0);
        }
    }
    gaps
}
