//! Error types for the community facade.

use community_core::{CoreError, DocumentId};
use community_store::{BlobError, StoreError};
use thiserror::Error;

/// Errors returned by [`crate::Community`] operations.
///
/// Kinds are coarse so callers can branch on them; the underlying store or
/// blob failure stays attached as the error source.
#[derive(Debug, Error)]
pub enum CommunityError {
    /// The operation needs a signed-in user and there is none.
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("post not found: {0}")]
    PostNotFound(DocumentId),

    #[error("comment not found: {0}")]
    CommentNotFound(DocumentId),

    #[error("user not found: {0}")]
    UserNotFound(DocumentId),

    /// Writing the post draft failed. Nothing was created.
    #[error("failed to insert post")]
    InsertPost(#[source] StoreError),

    /// The post exists but at least one image failed to upload.
    ///
    /// `uploaded` holds the URLs that did upload. Retry with
    /// [`crate::Community::attach_images`].
    #[error("failed to upload images for post {post_id} ({} uploaded)", .uploaded.len())]
    ImageUpload {
        post_id: DocumentId,
        uploaded: Vec<String>,
        #[source]
        source: BlobError,
    },

    /// Listing posts failed.
    #[error("failed to read posts")]
    ReadPosts(#[source] StoreError),

    /// Some comments of a post could not be deleted; the post was kept.
    ///
    /// Retrying `delete_post` finishes the remaining deletions.
    #[error("failed to delete {} comment(s) of post {post_id}", .failed.len())]
    CommentDeletion {
        post_id: DocumentId,
        deleted: Vec<DocumentId>,
        failed: Vec<(DocumentId, StoreError)>,
    },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    #[error("invalid identifier: {0}")]
    InvalidId(#[from] CoreError),
}

/// Result type for community operations.
pub type Result<T> = std::result::Result<T, CommunityError>;
