//! # Community
//!
//! Post and comment operations over a remote document store and a blob
//! store, with the post → comments backreference kept up to date.
//!
//! ## Overview
//!
//! [`Community`] is a stateless facade. Each operation translates into a
//! few document-store calls:
//!
//! - **Posts**: insert (with concurrent image uploads), update, list, delete
//!   (cascading to the post's comments)
//! - **Comments**: insert (appending to the post's `commentIDs`), update,
//!   delete (pruning the backreference first), batch read
//!
//! ## Usage
//!
//! ```rust,no_run
//! use community::{Community, CommunityConfig};
//! use community::core::UserId;
//! use community::store::{MemoryBlobStore, SqliteDocumentStore, StaticAuth};
//!
//! async fn example() {
//!     let store = SqliteDocumentStore::open("community.db").unwrap();
//!     let auth = StaticAuth::signed_in(UserId::new("user-1"));
//!     let community = Community::new(store, MemoryBlobStore::new(), auth, CommunityConfig::default());
//!
//!     let post_id = community.insert_post("Hello", "First post", vec![]).await.unwrap();
//!     let comment_id = community.insert_comment(&post_id, "Nice").await.unwrap();
//!
//!     let post = community.get_post(&post_id).await.unwrap();
//!     let comments = community.get_comments(&post.comment_ids).await.unwrap();
//!     assert_eq!(comments[0].id, comment_id);
//! }
//! ```
//!
//! ## Consistency
//!
//! The store offers no transactions across documents. Updates of a post's
//! list fields are serialized per post inside one `Community` (see
//! [`mutation`]); writers in other processes can still race. Multi-step
//! operations are ordered so that a failure leaves an orphaned child rather
//! than a parent pointing at a deleted child, and every step is safe to
//! retry.
//!
//! ## Re-exports
//!
//! - `community::core` - Domain types (Post, Comment, DocumentId, ...)
//! - `community::store` - Collaborator traits and backends

pub mod community;
pub mod config;
pub mod error;
pub mod mutation;

pub use community_core as core;
pub use community_store as store;

pub use community::Community;
pub use config::{Collections, CommunityConfig};
pub use error::{CommunityError, Result};

pub use community_core::{AuthoredComment, Comment, DocumentId, Image, Post, User, UserId};
