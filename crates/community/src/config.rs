//! Configuration for the community facade.

use serde::Deserialize;

/// Collection names in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub user: String,
    pub post: String,
    pub comment: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            user: "user".into(),
            post: "post".into(),
            comment: "comment".into(),
        }
    }
}

/// Configuration for [`crate::Community`].
///
/// Deserializable with every field optional, so it can be embedded in an
/// application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Collection names.
    pub collections: Collections,
    /// First segment of image blob paths: `{prefix}/{post_id}/{index}`.
    pub image_path_prefix: String,
    /// Serialize read-modify-write updates of a post's `commentIDs` and
    /// `imageURLs` per post. When off, concurrent comment inserts on the
    /// same post can lose an ID.
    pub serialize_post_mutations: bool,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            collections: Collections::default(),
            image_path_prefix: "post".into(),
            serialize_post_mutations: true,
        }
    }
}
