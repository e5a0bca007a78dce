//! Strong type definitions for identifiers.
//!
//! Identifiers are newtypes so a post ID cannot be handed to something
//! expecting a user ID.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// A store-assigned document identifier.
///
/// Documents are created with an empty ID; the store generates the key
/// and writes it back into the document. Serialized as a plain string.
/// Deserialization goes through [`DocumentId::new`], so a stored ID that
/// is empty or contains `/` is rejected; only [`DocumentId::empty`]
/// produces the draft placeholder.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Maximum encoded length of an identifier.
    pub const MAX_LEN: usize = 1500;

    /// Create a validated identifier.
    ///
    /// Rejects empty strings, `/` (reserved for blob paths) and IDs
    /// longer than [`Self::MAX_LEN`] bytes.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyId);
        }
        if id.contains('/') {
            return Err(CoreError::IdContainsSeparator(id));
        }
        if id.len() > Self::MAX_LEN {
            return Err(CoreError::IdTooLong {
                len: id.len(),
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(id))
    }

    /// The empty placeholder carried by drafts before insertion.
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the draft placeholder.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for DocumentId {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// Identifier of an authenticated user, as issued by the auth provider.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The same identifier as a key in the `user` collection.
    pub fn to_document_id(&self) -> Result<DocumentId> {
        DocumentId::new(self.0.clone())
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
