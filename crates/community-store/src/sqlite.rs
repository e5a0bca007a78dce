//! SQLite implementation of the DocumentStore trait.
//!
//! Documents are stored as JSON text keyed by `(collection, id)`. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use community_core::{now_millis, DocumentId};

use crate::error::{Result, StoreError};
use crate::id::{embedded_id, stamp_id};
use crate::migration;
use crate::query;
use crate::traits::{Document, DocumentStore, ListQuery};

/// SQLite-based document store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

fn read_body(conn: &Connection, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    body.map(|b| decode(&b)).transpose()
}

fn write_body(conn: &Connection, collection: &str, id: &DocumentId, document: &Document) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO documents (collection, id, body, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            collection,
            id.as_str(),
            serde_json::to_string(document)?,
            now_millis()
        ],
    )?;
    Ok(())
}

fn exists(conn: &Connection, collection: &str, id: &DocumentId) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn decode(body: &str) -> Result<Document> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
        generate_id: bool,
    ) -> Result<DocumentId> {
        let collection = collection.to_owned();

        self.with_conn(move |conn| {
            let id = if generate_id {
                let mut id = crate::id::generate_id()?;
                while exists(conn, &collection, &id)? {
                    id = crate::id::generate_id()?;
                }
                id
            } else {
                embedded_id(&document)?
            };

            stamp_id(&mut document, &id);
            write_body(conn, &collection, &id, &document)?;
            Ok(id)
        })
        .await
    }

    async fn read(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>> {
        let collection = collection.to_owned();
        let id = id.clone();

        self.with_conn(move |conn| read_body(conn, &collection, &id))
            .await
    }

    async fn update(&self, collection: &str, id: &DocumentId, mut document: Document) -> Result<()> {
        let collection = collection.to_owned();
        let id = id.clone();

        self.with_conn(move |conn| {
            stamp_id(&mut document, &id);
            let changed = conn.execute(
                "UPDATE documents SET body = ?3, updated_at = ?4
                 WHERE collection = ?1 AND id = ?2",
                params![
                    collection,
                    id.as_str(),
                    serde_json::to_string(&document)?,
                    now_millis()
                ],
            )?;

            if changed == 0 {
                return Err(StoreError::not_found(&collection, &id));
            }
            Ok(())
        })
        .await
    }

    async fn upsert_fields(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: Document,
    ) -> Result<()> {
        let collection = collection.to_owned();
        let id = id.clone();

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let mut document = read_body(&tx, &collection, &id)?.unwrap_or_default();
            document.extend(fields);
            stamp_id(&mut document, &id);
            write_body(&tx, &collection, &id, &document)?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<()> {
        let collection = collection.to_owned();
        let id = id.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<Vec<Document>> {
        let collection = collection.to_owned();
        let query = query.clone();

        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, body FROM documents WHERE collection = ?1")?;

            let rows = stmt
                .query_map(params![collection], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let documents = rows
                .into_iter()
                .map(|(id, body)| Ok((DocumentId::new(id)?, decode(&body)?)))
                .collect::<Result<Vec<_>>>()?;

            query::apply(&collection, documents, &query)
        })
        .await
    }
}
