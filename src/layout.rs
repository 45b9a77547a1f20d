//! Layout-reader contract: text spans as supplied by the external reader.
//!
//! The library does not parse documents itself. An external layout reader
//! yields, per page, a sequence of text spans with geometry and font
//! attributes; those spans are the sole input to [`crate::analyzer::DocumentAnalyzer`].

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Font weight reported by the layout reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Regular weight
    Normal,
    /// Bold weight
    Bold,
}

/// A contiguous run of text sharing one font and style.
///
/// Immutable once read. The `sequence` number preserves the order of
/// appearance within the page and is the tie-breaker when spans share a
/// Y coordinate, mirroring how layout readers report content-stream order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content of the span
    pub text: String,
    /// Page index, 0-based
    pub page: u32,
    /// Bounding box on the page
    pub bbox: Rect,
    /// Font family name
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Font weight (normal or bold)
    pub font_weight: FontWeight,
    /// Italic style flag
    pub is_italic: bool,
    /// Order of appearance within the page
    pub sequence: usize,
    /// Width of the page this span sits on, in points
    pub page_width: f32,
    /// Height of the page this span sits on, in points
    pub page_height: f32,
}

impl TextSpan {
    /// True when the span is bold.
    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    /// True when the span can be featurized.
    ///
    /// Malformed spans (empty text, non-finite geometry or font size) are
    /// skipped by the analyzer with a warning rather than coerced.
    pub fn is_well_formed(&self) -> bool {
        !self.text.trim().is_empty()
            && self.bbox.is_finite()
            && self.font_size.is_finite()
            && self.font_size > 0.0
            && self.page_width.is_finite()
            && self.page_width > 0.0
            && self.page_height.is_finite()
            && self.page_height > 0.0
    }
}

/// One document as handed over by the layout reader: all spans up front
/// plus the reader's page count. The unit of batch processing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// All spans of the document, in reading order
    pub spans: Vec<TextSpan>,
    /// Number of pages in the document
    pub page_count: u32,
}
