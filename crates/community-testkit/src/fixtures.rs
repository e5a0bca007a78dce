//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use community::{Community, CommunityConfig};
use community_core::{Comment, DocumentId, Post, User, UserId};
use community_store::{
    DocumentStore, DocumentStoreExt, MemoryBlobStore, MemoryDocumentStore, StaticAuth,
};

use crate::faults::{FaultyBlobStore, FaultyDocumentStore};

/// The user fixtures sign in as.
pub const TEST_USER: &str = "test-user";

/// The facade type built by [`TestFixture`].
pub type TestCommunity =
    Community<Arc<MemoryDocumentStore>, Arc<MemoryBlobStore>, Arc<StaticAuth>>;

/// The facade type built by [`FaultyFixture`].
pub type FaultyCommunity = Community<
    Arc<FaultyDocumentStore<Arc<MemoryDocumentStore>>>,
    Arc<FaultyBlobStore<Arc<MemoryBlobStore>>>,
    Arc<StaticAuth>,
>;

/// A facade over in-memory collaborators, with handles to each of them.
pub struct TestFixture {
    pub store: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub auth: Arc<StaticAuth>,
    pub community: TestCommunity,
}

impl TestFixture {
    /// Signed in as [`TEST_USER`], default config.
    pub fn new() -> Self {
        Self::with_config(CommunityConfig::default())
    }

    pub fn with_config(config: CommunityConfig) -> Self {
        let store = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::with_base_url("https://blobs.test"));
        let auth = Arc::new(StaticAuth::signed_in(UserId::new(TEST_USER)));
        let community = Community::new(
            Arc::clone(&store),
            Arc::clone(&blobs),
            Arc::clone(&auth),
            config,
        );

        Self {
            store,
            blobs,
            auth,
            community,
        }
    }

    /// Write a post directly with a fixed creation time.
    pub async fn seed_post(&self, title: &str, created_at: i64) -> Post {
        seed_post(self.store.as_ref(), self.community.config(), title, created_at).await
    }

    /// Write a comment directly and link it from its post.
    pub async fn seed_comment(&self, post_id: &DocumentId, content: &str, created_at: i64) -> Comment {
        seed_comment(
            self.store.as_ref(),
            self.community.config(),
            post_id,
            content,
            TEST_USER,
            created_at,
        )
        .await
    }

    /// Write a user document.
    pub async fn seed_user(&self, user_id: &str, display_name: &str) -> User {
        seed_user(self.store.as_ref(), self.community.config(), user_id, display_name).await
    }

    pub async fn read_post(&self, post_id: &DocumentId) -> Option<Post> {
        let collection = &self.community.config().collections.post;
        self.store.read_as(collection, post_id).await.unwrap()
    }

    pub async fn read_comment(&self, comment_id: &DocumentId) -> Option<Comment> {
        let collection = &self.community.config().collections.comment;
        self.store.read_as(collection, comment_id).await.unwrap()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A facade whose store and blob store can be told to fail.
pub struct FaultyFixture {
    pub store: Arc<FaultyDocumentStore<Arc<MemoryDocumentStore>>>,
    pub blobs: Arc<FaultyBlobStore<Arc<MemoryBlobStore>>>,
    pub auth: Arc<StaticAuth>,
    pub community: FaultyCommunity,
}

impl FaultyFixture {
    pub fn new() -> Self {
        Self::build(CommunityConfig::default(), false)
    }

    /// Every store operation yields first, so concurrently polled
    /// operations interleave step by step.
    pub fn interleaved(config: CommunityConfig) -> Self {
        Self::build(config, true)
    }

    fn build(config: CommunityConfig, yielding: bool) -> Self {
        let mut store = FaultyDocumentStore::new(Arc::new(MemoryDocumentStore::new()));
        if yielding {
            store = store.yielding();
        }
        let store = Arc::new(store);
        let blobs = Arc::new(FaultyBlobStore::new(Arc::new(MemoryBlobStore::with_base_url(
            "https://blobs.test",
        ))));
        let auth = Arc::new(StaticAuth::signed_in(UserId::new(TEST_USER)));
        let community = Community::new(
            Arc::clone(&store),
            Arc::clone(&blobs),
            Arc::clone(&auth),
            config,
        );

        Self {
            store,
            blobs,
            auth,
            community,
        }
    }

    pub async fn seed_post(&self, title: &str, created_at: i64) -> Post {
        seed_post(self.store.inner().as_ref(), self.community.config(), title, created_at).await
    }

    pub async fn seed_comment(&self, post_id: &DocumentId, content: &str, created_at: i64) -> Comment {
        seed_comment(
            self.store.inner().as_ref(),
            self.community.config(),
            post_id,
            content,
            TEST_USER,
            created_at,
        )
        .await
    }

    pub async fn read_post(&self, post_id: &DocumentId) -> Option<Post> {
        let collection = &self.community.config().collections.post;
        self.store.inner().read_as(collection, post_id).await.unwrap()
    }

    pub async fn read_comment(&self, comment_id: &DocumentId) -> Option<Comment> {
        let collection = &self.community.config().collections.comment;
        self.store.inner().read_as(collection, comment_id).await.unwrap()
    }
}

impl Default for FaultyFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert a post with a fixed creation time into any document store.
pub async fn seed_post<S: DocumentStore + ?Sized>(
    store: &S,
    config: &CommunityConfig,
    title: &str,
    created_at: i64,
) -> Post {
    let mut post = Post::draft(title, format!("{} body", title), UserId::new(TEST_USER), created_at);
    post.id = store
        .insert_as(&config.collections.post, &post, true)
        .await
        .unwrap();
    post
}

/// Insert a comment and append it to its post's `commentIDs`.
pub async fn seed_comment<S: DocumentStore + ?Sized>(
    store: &S,
    config: &CommunityConfig,
    post_id: &DocumentId,
    content: &str,
    user_id: &str,
    created_at: i64,
) -> Comment {
    let mut comment = Comment::draft(post_id.clone(), content, UserId::new(user_id), created_at);
    comment.id = store
        .insert_as(&config.collections.comment, &comment, true)
        .await
        .unwrap();

    let mut post: Post = store
        .read_as(&config.collections.post, post_id)
        .await
        .unwrap()
        .expect("seeded comment needs an existing post");
    post.comment_ids.push(comment.id.clone());
    store
        .update_as(&config.collections.post, post_id, &post)
        .await
        .unwrap();

    comment
}

/// Insert a user document under `user_id`.
pub async fn seed_user<S: DocumentStore + ?Sized>(
    store: &S,
    config: &CommunityConfig,
    user_id: &str,
    display_name: &str,
) -> User {
    let user = User {
        id: DocumentId::new(user_id).unwrap(),
        display_name: Some(display_name.to_owned()),
        photo_url: None,
    };
    store
        .insert_as(&config.collections.user, &user, false)
        .await
        .unwrap();
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_comment_links_post() {
        let fixture = TestFixture::new();
        let post = fixture.seed_post("p", 10).await;
        let comment = fixture.seed_comment(&post.id, "c", 20).await;

        let stored = fixture.read_post(&post.id).await.unwrap();
        assert_eq!(stored.comment_ids, vec![comment.id]);
    }

    #[tokio::test]
    async fn test_fixture_is_signed_in() {
        let fixture = TestFixture::new();
        assert_eq!(
            fixture.community.current_user().unwrap(),
            UserId::new(TEST_USER)
        );
    }
}
