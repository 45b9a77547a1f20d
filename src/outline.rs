//! Outline assembly: labeled spans to the final structure.
//!
//! A linear, single-pass transform over classified spans: body text is
//! discarded, split headings are re-joined, whitespace is normalized, and
//! entries are emitted strictly in reading order. No hierarchy repair is
//! attempted — an H2 directly after an H1 stays as-is.

use crate::classify::{ClassLabel, Prediction};
use crate::layout::TextSpan;
use serde::{Deserialize, Serialize};

/// Heading level of an outline entry.
///
/// Deliberately narrower than [`ClassLabel`]: body text is not
/// representable here, so an outline can never carry a `"Body"` entry.
/// Ordered by seniority, `H3 < H2 < H1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Subsection heading
    H3,
    /// Section heading
    H2,
    /// Top-level heading
    H1,
}

impl HeadingLevel {
    /// The heading level for a classification label; `None` for body text.
    pub fn from_label(label: ClassLabel) -> Option<Self> {
        match label {
            ClassLabel::Body => None,
            ClassLabel::H3 => Some(HeadingLevel::H3),
            ClassLabel::H2 => Some(HeadingLevel::H2),
            ClassLabel::H1 => Some(HeadingLevel::H1),
        }
    }
}

/// One detected heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text, whitespace-normalized
    pub text: String,
    /// Page the heading appears on, 0-based
    pub page: u32,
}

/// The externally visible analysis result.
///
/// Serializes to exactly:
///
/// ```json
/// {
///   "title": "…",
///   "outline": [ { "level": "H1", "text": "…", "page": 0 }, … ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureResult {
    /// Document title (possibly empty)
    pub title: String,
    /// Detected headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl StructureResult {
    /// A result with no title and no outline, the valid answer for an
    /// empty document.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            outline: Vec::new(),
        }
    }
}

/// Assemble the outline from classified spans.
///
/// `spans` and `predictions` are aligned index-for-index and must already
/// be in reading order (page ascending, in-page input order). Adjacent
/// spans on the same page with the same label and near-identical vertical
/// position are collapsed into one entry — a heading the layout reader
/// split into several spans comes back together here.
pub fn assemble(spans: &[TextSpan], predictions: &[Prediction], title: String) -> StructureResult {
    debug_assert_eq!(spans.len(), predictions.len());

    let mut headings: Vec<&TextSpan> = Vec::new();
    let mut levels: Vec<HeadingLevel> = Vec::new();
    for (span, prediction) in spans.iter().zip(predictions) {
        if let Some(level) = HeadingLevel::from_label(prediction.label) {
            headings.push(span);
            levels.push(level);
        }
    }

    let mut outline = Vec::new();
    let mut i = 0;
    while i < headings.len() {
        let mut group = vec![headings[i]];
        let level = levels[i];
        let mut j = i + 1;
        while j < headings.len()
            && levels[j] == level
            && headings[j].page == headings[i].page
            && same_baseline(headings[j - 1], headings[j])
        {
            group.push(headings[j]);
            j += 1;
        }

        // Left-to-right within the merged group.
        group.sort_by(|a, b| crate::utils::safe_float_cmp(a.bbox.x, b.bbox.x));
        let text = group
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        outline.push(OutlineEntry {
            level,
            text: crate::utils::normalize_whitespace(&text),
            page: headings[i].page,
        });
        i = j;
    }

    StructureResult { title, outline }
}

/// Near-identical vertical position: the tops differ by at most half the
/// smaller span height, floored at 2 pt.
fn same_baseline(a: &TextSpan, b: &TextSpan) -> bool {
    let tolerance = (a.bbox.height.min(b.bbox.height) / 2.0).max(2.0);
    (a.bbox.y - b.bbox.y).abs() <= tolerance
}
