//! Error types for the community core.

use thiserror::Error;

/// Errors raised while constructing core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("document id must not be empty")]
    EmptyId,

    #[error("document id {0:?} contains a path separator")]
    IdContainsSeparator(String),

    #[error("document id exceeds {max} bytes: {len}")]
    IdTooLong { len: usize, max: usize },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
