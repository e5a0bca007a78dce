//! Stored field names.
//!
//! These must match the serde renames on [`crate::Post`] and
//! [`crate::Comment`].

pub const ID: &str = "id";
pub const TITLE: &str = "title";
pub const CONTENT: &str = "content";
pub const USER_ID: &str = "userID";
pub const POST_ID: &str = "postID";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";
pub const COMMENT_IDS: &str = "commentIDs";
pub const IMAGE_URLS: &str = "imageURLs";
