//! Error types for document store operations

use thiserror::Error;

/// Failure raised by a [`crate::DocumentStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id exists in the collection
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A stored document could not be interpreted
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Filesystem failure in a persistent backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
