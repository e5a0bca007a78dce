//! Posts, comments and users as stored in the document store.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::time::Timestamp;
use crate::types::{DocumentId, UserId};

/// A post.
///
/// `comment_ids` is a denormalized backreference: it must list exactly the
/// comments whose `post_id` is this post. The store does not enforce it;
/// the facade maintains it on every comment insert and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<Timestamp>,
    #[serde(rename = "commentIDs", default)]
    pub comment_ids: Vec<DocumentId>,
    #[serde(rename = "imageURLs", default)]
    pub image_urls: Vec<String>,
}

impl Post {
    /// A new post with an empty ID, no comments and no images.
    pub fn draft(
        title: impl Into<String>,
        content: impl Into<String>,
        user_id: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DocumentId::empty(),
            title: title.into(),
            content: content.into(),
            user_id,
            created_at: now,
            updated_at: None,
            comment_ids: Vec::new(),
            image_urls: Vec::new(),
        }
    }

    /// A copy with the given fields replaced and `updated_at` stamped.
    ///
    /// `None` keeps the prior value.
    pub fn merged(&self, title: Option<&str>, content: Option<&str>, now: Timestamp) -> Self {
        Self {
            title: title.map_or_else(|| self.title.clone(), str::to_owned),
            content: content.map_or_else(|| self.content.clone(), str::to_owned),
            updated_at: Some(now),
            ..self.clone()
        }
    }

    /// Whether `comment_id` is in the backreference list.
    pub fn references(&self, comment_id: &DocumentId) -> bool {
        self.comment_ids.contains(comment_id)
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DocumentId,
    #[serde(rename = "postID")]
    pub post_id: DocumentId,
    pub content: String,
    #[serde(rename = "userID")]
    pub user_id: UserId,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<Timestamp>,
    #[serde(rename = "imageURLs", default)]
    pub image_urls: Vec<String>,
}

impl Comment {
    pub fn draft(
        post_id: DocumentId,
        content: impl Into<String>,
        user_id: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DocumentId::empty(),
            post_id,
            content: content.into(),
            user_id,
            created_at: now,
            updated_at: None,
            image_urls: Vec::new(),
        }
    }

    pub fn merged(&self, content: Option<&str>, now: Timestamp) -> Self {
        Self {
            content: content.map_or_else(|| self.content.clone(), str::to_owned),
            updated_at: Some(now),
            ..self.clone()
        }
    }
}

/// Author data from the `user` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: DocumentId,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

/// A comment together with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredComment {
    pub comment: Comment,
    pub author: User,
}

/// Raw image bytes to be uploaded to blob storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image(Bytes);

impl Image {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Image {
    fn from(v: Vec<u8>) -> Self {
        Self(Bytes::from(v))
    }
}

impl From<&'static [u8]> for Image {
    fn from(v: &'static [u8]) -> Self {
        Self(Bytes::from_static(v))
    }
}
