//! Error types surfaced by the recipe API

use thiserror::Error;

use crate::auth::AuthError;
use crate::blob::BlobError;

/// Any failure of a user-triggered recipe operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The document store rejected or failed the request
    #[error(transparent)]
    Store(#[from] store::StoreError),

    /// Sign-up, sign-in, or password reset failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Upload or deletion of an image failed
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A stored document does not have the shape of a recipe
    #[error("recipe {id} is malformed: {reason}")]
    Decode { id: String, reason: String },

    /// A category key outside the fixed set
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A recipe form failed validation before reaching the store
    #[error("{0}")]
    InvalidDraft(String),

    /// A page size the catalog does not offer
    #[error("page size {0} is not available")]
    InvalidPageSize(usize),
}

/// Result type for recipe API operations
pub type Result<T> = std::result::Result<T, ApiError>;
