//! Span featurization: fixed-schema numeric features for classification.
//!
//! Converts a [`TextSpan`] plus its [`DocumentContext`] into a fixed-order
//! feature vector. The schema is versioned; a trained model records the
//! schema it was fitted against and refuses to load against a different
//! one, so features and model can never drift apart silently.

use crate::context::DocumentContext;
use crate::layout::TextSpan;
use ndarray::Array2;

/// Number of features per span.
pub const FEATURE_COUNT: usize = 11;

/// Schema identifier persisted inside model artifacts.
///
/// Bump whenever `FEATURE_NAMES`, their order, or their semantics change.
pub const FEATURE_SCHEMA_VERSION: &str = "features-v1";

/// Feature names, in schema order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "font_size",
    "size_ratio",
    "is_bold",
    "is_italic",
    "text_len",
    "upper_ratio",
    "is_centered",
    "gap_above",
    "page_index",
    "page_position",
    "distinct_font",
];

/// A fixed-order feature vector for one span.
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Featurize a single span against its document context.
///
/// Pure and total for well-formed spans: the same span and context always
/// yield the same vector. Malformed spans must be filtered out by the
/// caller before featurization.
///
/// `gap_above` is the vertical gap to the preceding span on the page in
/// points; the context supplies it per span index via
/// [`DocumentContext::gap_above`].
pub fn featurize(span: &TextSpan, ctx: &DocumentContext, gap_above: f32) -> FeatureVector {
    let letters: Vec<char> = span.text.chars().filter(|c| c.is_alphabetic()).collect();
    let upper_ratio = if letters.is_empty() {
        0.0
    } else {
        letters.iter().filter(|c| c.is_uppercase()).count() as f32 / letters.len() as f32
    };

    // A span is centered when its midpoint sits within 10% of the page
    // midline.
    let midline = span.page_width / 2.0;
    let is_centered = (span.bbox.center().x - midline).abs() < span.page_width * 0.1;

    // Vertical thirds bucket: 0 top, 1 middle, 2 bottom.
    let relative_y = (span.bbox.y / span.page_height).clamp(0.0, 1.0);
    let page_position = if relative_y < 1.0 / 3.0 {
        0.0
    } else if relative_y < 2.0 / 3.0 {
        1.0
    } else {
        2.0
    };

    [
        span.font_size,
        span.font_size / ctx.body_size,
        if span.is_bold() { 1.0 } else { 0.0 },
        if span.is_italic { 1.0 } else { 0.0 },
        span.text.chars().count() as f32,
        upper_ratio,
        if is_centered { 1.0 } else { 0.0 },
        gap_above / ctx.body_size,
        span.page as f32,
        page_position,
        if span.font_name != ctx.dominant_font {
            1.0
        } else {
            0.0
        },
    ]
}

/// Featurize all spans of a document into an `(n_spans, FEATURE_COUNT)`
/// matrix for batched classification.
///
/// The span slice must be the one the context was built from, so that the
/// per-index gap table lines up.
pub fn featurize_document(spans: &[TextSpan], ctx: &DocumentContext) -> Array2<f32> {
    let mut matrix = Array2::zeros((spans.len(), FEATURE_COUNT));
    for (i, span) in spans.iter().enumerate() {
        let vector = featurize(span, ctx, ctx.gap_above(i));
        for (j, value) in vector.iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }
    matrix
}
