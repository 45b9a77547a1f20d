//! # docstruct
//!
//! Document structure extraction: turns the text spans of a paginated
//! document (as reported by an external layout reader) into a title plus
//! an ordered outline of H1/H2/H3 headings with page numbers.
//!
//! ## Pipeline
//!
//! - **Featurization** ([`features`]): each span becomes a fixed-schema
//!   vector of document-relative typographic features.
//! - **Classification** ([`model`], [`classify`]): a compact
//!   gradient-boosted tree ensemble labels spans as Body/H3/H2/H1 in one
//!   batched pass, with a configurable low-confidence fallback.
//! - **Assembly** ([`title`], [`outline`]): a heuristic title resolver and
//!   a single-pass outline assembler produce the final
//!   [`outline::StructureResult`].
//!
//! Training is a separate offline flow ([`model::train_offline`]) that
//! bootstraps from a synthetic corpus ([`synthetic`]); inference loads a
//! persisted artifact or fails, and never trains implicitly.
//!
//! ## Quick start
//!
//! ```no_run
//! use docstruct::{AnalysisConfig, DocumentAnalyzer, TrainedModel};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> docstruct::error::Result<()> {
//! let model = Arc::new(TrainedModel::load(Path::new("models/structure.json"))?);
//! let analyzer = DocumentAnalyzer::new(model, AnalysisConfig::default());
//!
//! // Spans come from your layout reader.
//! let spans = vec![];
//! let result = analyzer.analyze(&spans, 12)?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Layout-reader contract
pub mod geometry;
pub mod layout;

// Analysis pipeline
pub mod analyzer;
pub mod classify;
pub mod config;
pub mod context;
pub mod features;
pub mod outline;
pub mod title;

// Model: training, boosting, persistence
pub mod model;
pub mod synthetic;

// Re-exports
pub use analyzer::DocumentAnalyzer;
pub use classify::{ClassLabel, Prediction};
pub use config::{AnalysisConfig, BodySizeEstimator, FallbackPolicy};
pub use error::{Error, Result};
pub use layout::{FontWeight, RawDocument, TextSpan};
pub use model::{GbdtParams, TrainedModel};
pub use outline::{HeadingLevel, OutlineEntry, StructureResult};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all
    /// other values, so sorting never panics.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap(),
        }
    }

    /// Reference-taking form of [`safe_float_cmp`] for `sort_by`.
    #[inline]
    pub fn safe_float_cmp_ref(a: &f32, b: &f32) -> Ordering {
        safe_float_cmp(*a, *b)
    }

    /// Trim and collapse internal whitespace runs to single spaces.
    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
