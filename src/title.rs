//! Title resolution.
//!
//! Titles occur once per document, so a supervised classifier has almost
//! nothing to learn from; a structural heuristic over first-page spans is
//! more robust. The resolver is independent of the per-span classifier.

use crate::layout::TextSpan;
use std::cmp::Ordering;

/// Pick the document title from its spans.
///
/// Considers page 0 only and selects the span with the maximum
/// (font size, boldness) lexicographic key; ties go to the topmost span.
/// Returns an empty string when the first page has no spans.
pub fn resolve_title(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .filter(|s| s.page == 0)
        .max_by(|a, b| title_key(a, b))
        .map(|s| crate::utils::normalize_whitespace(&s.text))
        .unwrap_or_default()
}

/// Lexicographic (font size, bold) key; smaller y wins ties so the
/// topmost candidate is picked.
fn title_key(a: &TextSpan, b: &TextSpan) -> Ordering {
    crate::utils::safe_float_cmp(a.font_size, b.font_size)
        .then(a.is_bold().cmp(&b.is_bold()))
        .then(crate::utils::safe_float_cmp(b.bbox.y, a.bbox.y))
        .then(b.sequence.cmp(&a.sequence))
}
