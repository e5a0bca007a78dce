//! Error types for the store module.

use community_core::{CoreError, DocumentId};
use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Document not found.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: DocumentId },

    /// A document that cannot be stored or decoded (e.g. not a JSON object).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// An identifier the store refuses.
    #[error("invalid id: {0}")]
    InvalidId(#[from] CoreError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a remote or wrapped backend.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &DocumentId) -> Self {
        StoreError::NotFound {
            collection: collection.to_owned(),
            id: id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during blob uploads.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Path is empty, absolute, or escapes the store root.
    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by a remote or wrapped backend.
    #[error("backend error: {0}")]
    Backend(String),
}
