//! # Community Store
//!
//! Collaborator abstractions for the community kit: the document store,
//! the blob store used for images, and the auth provider.
//!
//! ## Overview
//!
//! The facade never talks to a database directly. It goes through the
//! [`DocumentStore`] trait, which models a remote document database
//! addressed by collection and identifier. [`SqliteDocumentStore`] is a
//! persistent local backend, [`MemoryDocumentStore`] keeps everything in
//! memory for tests.
//!
//! ## Key Types
//!
//! - [`DocumentStore`] - Async trait for insert/read/update/patch/delete/list
//! - [`DocumentStoreExt`] - Typed serde helpers over any document store
//! - [`BlobStore`] - Async trait for image uploads
//! - [`AuthProvider`] - Source of the signed-in user
//! - [`ListQuery`] - Ordered, limited, cursor-paginated list query
//!
//! ## Usage
//!
//! ```rust,no_run
//! use community_store::{DocumentStoreExt, ListQuery, SqliteDocumentStore};
//! use community_core::{fields, Post};
//!
//! async fn example() {
//!     let store = SqliteDocumentStore::open("community.db").unwrap();
//!
//!     let query = ListQuery::new(20).order_by(fields::CREATED_AT, true);
//!     let posts: Vec<Post> = store.list_as("post", &query).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Generated IDs**: the store assigns keys and writes them into `id`
//! - **Idempotent deletes**: deleting a missing document is not an error
//! - **Shared ordering**: both backends evaluate list queries with the
//!   same comparator, ties broken by document ID

pub mod auth;
pub mod blob;
pub mod error;
pub mod id;
pub mod memory;
pub mod migration;
pub mod query;
pub mod sqlite;
pub mod traits;

pub use auth::StaticAuth;
pub use blob::{FsBlobStore, MemoryBlobStore};
pub use error::{BlobError, Result, StoreError};
pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;
pub use traits::{
    from_document, to_document, AuthProvider, BlobStore, Document, DocumentStore,
    DocumentStoreExt, ListQuery, QueryOrder,
};
