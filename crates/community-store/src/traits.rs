//! Collaborator traits: the abstract interfaces the facade talks to.
//!
//! [`DocumentStore`] is the remote document database, [`BlobStore`] the
//! object storage used for images, [`AuthProvider`] the session source.
//! Implementations include in-memory and SQLite document stores, in-memory
//! and filesystem blob stores, and a static auth provider.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use community_core::{DocumentId, UserId};

use crate::error::{BlobError, Result, StoreError};

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// One sort key of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOrder {
    pub field: String,
    pub descending: bool,
}

/// An ordered, limited, cursor-paginated list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Sort keys, most significant first. Ties fall back to document ID.
    pub order_by: Vec<QueryOrder>,
    /// Maximum number of documents returned.
    pub limit: usize,
    /// Return only documents ordered strictly after this one.
    pub start_after: Option<DocumentId>,
}

impl ListQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            order_by: Vec::new(),
            limit,
            start_after: None,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.order_by.push(QueryOrder {
            field: field.into(),
            descending,
        });
        self
    }

    pub fn start_after(mut self, cursor: Option<DocumentId>) -> Self {
        self.start_after = cursor;
        self
    }
}

/// The document store: async interface to a remote document database.
///
/// Documents are addressed by collection name and identifier.
///
/// # Contract
///
/// - **Generated IDs**: `insert` with `generate_id = true` ignores the
///   document's `id` field, picks a fresh key and writes it back into the
///   stored document's `id` field.
/// - **Full replace**: `update` replaces the whole document and fails with
///   `NotFound` when it does not exist.
/// - **Partial patch**: `upsert_fields` overwrites only the given top-level
///   fields, creating the document if needed.
/// - **Idempotent delete**: deleting a missing document succeeds.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its identifier.
    async fn insert(
        &self,
        collection: &str,
        document: Document,
        generate_id: bool,
    ) -> Result<DocumentId>;

    /// Read a document by ID.
    async fn read(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>>;

    /// Replace a document.
    async fn update(&self, collection: &str, id: &DocumentId, document: Document) -> Result<()>;

    /// Overwrite selected top-level fields of a document.
    async fn upsert_fields(&self, collection: &str, id: &DocumentId, fields: Document)
        -> Result<()>;

    /// Delete a document.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()>;

    /// List documents of a collection.
    ///
    /// A `start_after` cursor that does not exist is `NotFound`.
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn insert(
        &self,
        collection: &str,
        document: Document,
        generate_id: bool,
    ) -> Result<DocumentId> {
        (**self).insert(collection, document, generate_id).await
    }

    async fn read(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        (**self).read(collection, id).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, document: Document) -> Result<()> {
        (**self).update(collection, id, document).await
    }

    async fn upsert_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> Result<()> {
        (**self).upsert_fields(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        (**self).delete(collection, id).await
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>> {
        (**self).list(collection, query).await
    }
}

/// Typed helpers over [`DocumentStore`] using serde.
pub trait DocumentStoreExt: DocumentStore {
    /// Serialize and insert a value.
    fn insert_as<T: Serialize + Sync>(
        &self,
        collection: &str,
        value: &T,
        generate_id: bool,
    ) -> impl Future<Output = Result<DocumentId>> + Send;

    /// Read and deserialize a value.
    fn read_as<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<T>>> + Send;

    /// Serialize a value and replace the stored document.
    fn update_as<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &DocumentId,
        value: &T,
    ) -> impl Future<Output = Result<()>> + Send;

    /// List and deserialize values.
    fn list_as<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<T>>> + Send;
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {
    async fn insert_as<T: Serialize + Sync>(
        &self,
        collection: &str,
        value: &T,
        generate_id: bool,
    ) -> Result<DocumentId> {
        let document = to_document(value)?;
        self.insert(collection, document, generate_id).await
    }

    async fn read_as<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<T>> {
        match self.read(collection, id).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn update_as<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &DocumentId,
        value: &T,
    ) -> Result<()> {
        let document = to_document(value)?;
        self.update(collection, id, document).await
    }

    async fn list_as<T: DeserializeOwned + Send>(
        &self,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Vec<T>> {
        self.list(collection, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}

/// Serialize a value into a document. Fails unless it is a JSON object.
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Deserialize a document into a value.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

/// The blob store: uploads image bytes and returns a download URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload bytes at `path` (e.g. `post/{id}/0`) and return the URL.
    async fn upload_image(&self, path: &str, bytes: Bytes) -> std::result::Result<String, BlobError>;
}

#[async_trait]
impl<B: BlobStore + ?Sized> BlobStore for Arc<B> {
    async fn upload_image(&self, path: &str, bytes: Bytes) -> std::result::Result<String, BlobError> {
        (**self).upload_image(path, bytes).await
    }
}

/// Source of the currently signed-in user.
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<UserId>;
}

impl<A: AuthProvider + ?Sized> AuthProvider for Arc<A> {
    fn current_user(&self) -> Option<UserId> {
        (**self).current_user()
    }
}
