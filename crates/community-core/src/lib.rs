//! # Community Core
//!
//! Pure domain types for the community kit: posts, comments, users and
//! the identifiers that link them.
//!
//! This crate contains no I/O, no storage, no networking. Everything that
//! talks to a document store or blob store lives in `community-store` and
//! `community`.
//!
//! ## Key Types
//!
//! - [`Post`] - A post holding the denormalized list of its comment IDs
//! - [`Comment`] - A comment pointing back at its post
//! - [`User`] - Author data, read lazily when enriching comments
//! - [`DocumentId`] - Store-assigned document identifier
//! - [`UserId`] - Identifier of an authenticated user
//!
//! ## Stored Shape
//!
//! Types serialize to the camelCase document shape used in the store
//! (`userID`, `postID`, `commentIDs`, `imageURLs`, ...). Field names are
//! exported from [`fields`] so partial patches never drift from the
//! serde renames.

pub mod error;
pub mod fields;
pub mod model;
pub mod time;
pub mod types;

pub use error::{CoreError, Result};
pub use model::{AuthoredComment, Comment, Image, Post, User};
pub use time::{now_millis, Timestamp};
pub use types::{DocumentId, UserId};
