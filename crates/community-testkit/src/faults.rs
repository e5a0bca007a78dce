//! Fault-injecting wrappers around document and blob stores.
//!
//! Used to exercise partial failures: a comment delete that fails in the
//! middle of a cascade, an image upload that fails after others succeeded.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use community_core::DocumentId;
use community_store::{
    BlobError, BlobStore, Document, DocumentStore, ListQuery, Result, StoreError,
};

/// A document store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Insert,
    Read,
    Update,
    UpsertFields,
    Delete,
    List,
}

#[derive(Debug, Clone)]
struct Rule {
    op: Op,
    collection: String,
    id: Option<DocumentId>,
}

impl Rule {
    fn matches(&self, op: Op, collection: &str, id: Option<&DocumentId>) -> bool {
        self.op == op
            && self.collection == collection
            && self.id.as_ref().map_or(true, |rule_id| Some(rule_id) == id)
    }
}

/// Wraps a document store and fails selected operations.
///
/// Optionally yields to the scheduler before every operation, which makes
/// interleavings of concurrently polled operations deterministic.
pub struct FaultyDocumentStore<S> {
    inner: S,
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<HashMap<Op, usize>>,
    yielding: bool,
}

impl<S: DocumentStore> FaultyDocumentStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
            yielding: false,
        }
    }

    /// Yield once before every operation.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail every `op` on `collection`.
    pub fn fail(&self, op: Op, collection: &str) {
        self.push(Rule {
            op,
            collection: collection.to_owned(),
            id: None,
        });
    }

    /// Fail `op` on one document.
    pub fn fail_id(&self, op: Op, collection: &str, id: &DocumentId) {
        self.push(Rule {
            op,
            collection: collection.to_owned(),
            id: Some(id.clone()),
        });
    }

    /// Remove all failure rules.
    pub fn heal(&self) {
        self.rules.lock().unwrap().clear();
    }

    /// How many times `op` was attempted.
    pub fn calls(&self, op: Op) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    fn push(&self, rule: Rule) {
        self.rules.lock().unwrap().push(rule);
    }

    async fn enter(&self, op: Op, collection: &str, id: Option<&DocumentId>) -> Result<()> {
        if self.yielding {
            tokio::task::yield_now().await;
        }

        *self.calls.lock().unwrap().entry(op).or_default() += 1;

        let failing = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .any(|rule| rule.matches(op, collection, id));
        if failing {
            return Err(StoreError::Backend(format!(
                "injected {:?} failure on {}",
                op, collection
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FaultyDocumentStore<S> {
    async fn insert(
        &self,
        collection: &str,
        document: Document,
        generate_id: bool,
    ) -> Result<DocumentId> {
        self.enter(Op::Insert, collection, None).await?;
        self.inner.insert(collection, document, generate_id).await
    }

    async fn read(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        self.enter(Op::Read, collection, Some(id)).await?;
        self.inner.read(collection, id).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, document: Document) -> Result<()> {
        self.enter(Op::Update, collection, Some(id)).await?;
        self.inner.update(collection, id, document).await
    }

    async fn upsert_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> Result<()> {
        self.enter(Op::UpsertFields, collection, Some(id)).await?;
        self.inner.upsert_fields(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        self.enter(Op::Delete, collection, Some(id)).await?;
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>> {
        self.enter(Op::List, collection, None).await?;
        self.inner.list(collection, query).await
    }
}

/// Wraps a blob store and fails uploads whose path ends with a suffix.
pub struct FaultyBlobStore<B> {
    inner: B,
    failing_suffixes: Mutex<Vec<String>>,
}

impl<B: BlobStore> FaultyBlobStore<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            failing_suffixes: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Fail uploads to paths ending with `suffix` (e.g. `"/1"`).
    pub fn fail_suffix(&self, suffix: &str) {
        self.failing_suffixes
            .lock()
            .unwrap()
            .push(suffix.to_owned());
    }

    pub fn heal(&self) {
        self.failing_suffixes.lock().unwrap().clear();
    }
}

#[async_trait]
impl<B: BlobStore> BlobStore for FaultyBlobStore<B> {
    async fn upload_image(&self, path: &str, bytes: Bytes) -> std::result::Result<String, BlobError> {
        let failing = self
            .failing_suffixes
            .lock()
            .unwrap()
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()));
        if failing {
            return Err(BlobError::Backend(format!("injected upload failure at {}", path)));
        }
        self.inner.upload_image(path, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use community_store::{MemoryBlobStore, MemoryDocumentStore};

    #[tokio::test]
    async fn test_fail_by_collection_and_heal() {
        let store = FaultyDocumentStore::new(MemoryDocumentStore::new());
        store.fail(Op::Insert, "post");

        let err = store.insert("post", Document::new(), true).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(store.insert("comment", Document::new(), true).await.is_ok());

        store.heal();
        assert!(store.insert("post", Document::new(), true).await.is_ok());
        assert_eq!(store.calls(Op::Insert), 3);
    }

    #[tokio::test]
    async fn test_fail_single_id() {
        let store = FaultyDocumentStore::new(MemoryDocumentStore::new());
        let a = store.insert("comment", Document::new(), true).await.unwrap();
        let b = store.insert("comment", Document::new(), true).await.unwrap();
        store.fail_id(Op::Delete, "comment", &a);

        assert!(store.delete("comment", &a).await.is_err());
        assert!(store.delete("comment", &b).await.is_ok());
    }

    #[tokio::test]
    async fn test_blob_suffix_failure() {
        let blobs = FaultyBlobStore::new(MemoryBlobStore::new());
        blobs.fail_suffix("/1");

        assert!(blobs
            .upload_image("post/p/0", Bytes::from_static(b"a"))
            .await
            .is_ok());
        assert!(blobs
            .upload_image("post/p/1", Bytes::from_static(b"b"))
            .await
            .is_err());
        assert_eq!(blobs.inner().len(), 1);
    }
}
