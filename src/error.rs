//! Error types for the document structure library.
//!
//! This module defines all error types that can occur during model handling
//! and document analysis.

/// Result type alias for document structure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document structure extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Document exceeds the configured page limit (rejected before featurization)
    #[error("Document has {pages} pages, exceeding the configured maximum of {max_pages}")]
    InputTooLarge {
        /// Number of pages reported for the document
        pages: u32,
        /// Configured page limit
        max_pages: u32,
    },

    /// Trained model could not be loaded
    #[error("Model unavailable at '{path}': {reason}")]
    ModelUnavailable {
        /// Path the model was expected at
        path: String,
        /// Why loading failed
        reason: String,
    },

    /// Model artifact was built against a different feature schema
    #[error("Model schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Schema version this library was built with
        expected: String,
        /// Schema version found in the artifact
        found: String,
    },

    /// Model training failed
    #[error("Training failed: {0}")]
    Training(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_too_large_message() {
        let err = Error::InputTooLarge {
            pages: 75,
            max_pages: 50,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("75"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_model_unavailable_message() {
        let err = Error::ModelUnavailable {
            path: "models/structure.json".to_string(),
            reason: "file not found".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("models/structure.json"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_schema_mismatch_message() {
        let err = Error::SchemaMismatch {
            expected: "features-v1".to_string(),
            found: "features-v0".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("features-v1"));
        assert!(msg.contains("features-v0"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
