//! In-memory implementation of the DocumentStore trait.
//!
//! This is primarily for testing. It follows the same contract as the
//! SQLite store but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use community_core::DocumentId;

use crate::error::{Result, StoreError};
use crate::id::{embedded_id, stamp_id};
use crate::query;
use crate::traits::{Document, DocumentStore, ListQuery};

/// In-memory document store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryDocumentStore {
    /// collection -> id -> document.
    collections: RwLock<HashMap<String, BTreeMap<DocumentId, Document>>>,
}

impl MemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> Result<usize> {
        Ok(self
            .read_lock()?
            .get(collection)
            .map_or(0, BTreeMap::len))
    }

    /// Whether a document exists.
    pub fn contains(&self, collection: &str, id: &DocumentId) -> Result<bool> {
        Ok(self
            .read_lock()?
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id)))
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, HashMap<String, BTreeMap<DocumentId, Document>>>> {
        self.collections
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, BTreeMap<DocumentId, Document>>>> {
        self.collections
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
        generate_id: bool,
    ) -> Result<DocumentId> {
        let mut collections = self.write_lock()?;
        let docs = collections.entry(collection.to_owned()).or_default();

        let id = if generate_id {
            let mut id = crate::id::generate_id()?;
            while docs.contains_key(&id) {
                id = crate::id::generate_id()?;
            }
            id
        } else {
            embedded_id(&document)?
        };

        stamp_id(&mut document, &id);
        docs.insert(id.clone(), document);
        Ok(id)
    }

    async fn read(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        Ok(self
            .read_lock()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &DocumentId, mut document: Document) -> Result<()> {
        let mut collections = self.write_lock()?;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        stamp_id(&mut document, id);
        *existing = document;
        Ok(())
    }

    async fn upsert_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> Result<()> {
        let mut collections = self.write_lock()?;
        let document = collections
            .entry(collection.to_owned())
            .or_default()
            .entry(id.clone())
            .or_default();

        document.extend(fields);
        stamp_id(document, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        if let Some(docs) = self.write_lock()?.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>> {
        let documents: Vec<(DocumentId, Document)> = self
            .read_lock()?
            .get(collection)
            .map(|docs| docs.iter().map(|(id, d)| (id.clone(), d.clone())).collect())
            .unwrap_or_default();

        query::apply(collection, documents, query)
    }
}
