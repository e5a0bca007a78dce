//! The Community facade: posts and comments over a document store.
//!
//! Every operation is a short pipeline of document-store calls. The only
//! state kept here is the per-post mutation queue; the backreference list
//! `Post::comment_ids` is maintained by this module on every comment
//! insert and delete.

use std::collections::{BTreeSet, HashMap};

use futures::future::{join_all, try_join_all};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use community_core::{
    fields, now_millis, AuthoredComment, Comment, DocumentId, Image, Post, User, UserId,
};
use community_store::{
    AuthProvider, BlobStore, Document, DocumentStore, DocumentStoreExt, ListQuery,
};

use crate::config::CommunityConfig;
use crate::error::{CommunityError, Result};
use crate::mutation::PostMutations;

/// The community service facade.
///
/// Sits between application code and three collaborators:
/// - a [`DocumentStore`] holding the `user`, `post` and `comment` collections
/// - a [`BlobStore`] receiving post images
/// - an [`AuthProvider`] naming the signed-in user
pub struct Community<D, B, A> {
    store: D,
    blobs: B,
    auth: A,
    config: CommunityConfig,
    mutations: PostMutations,
}

impl<D, B, A> Community<D, B, A>
where
    D: DocumentStore,
    B: BlobStore,
    A: AuthProvider,
{
    /// Create a new facade.
    pub fn new(store: D, blobs: B, auth: A, config: CommunityConfig) -> Self {
        let mutations = PostMutations::new(config.serialize_post_mutations);
        Self {
            store,
            blobs,
            auth,
            config,
            mutations,
        }
    }

    /// The document store.
    pub fn store(&self) -> &D {
        &self.store
    }

    /// The blob store receiving post images.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// The auth provider.
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// The configuration this facade was built with.
    pub fn config(&self) -> &CommunityConfig {
        &self.config
    }

    /// The signed-in user.
    pub fn current_user(&self) -> Result<UserId> {
        self.auth.current_user().ok_or(CommunityError::NotSignedIn)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a post owned by the signed-in user and upload its images.
    ///
    /// The draft is written first with no images. Images are then uploaded
    /// concurrently to `{prefix}/{post_id}/{index}` and the resulting URLs,
    /// in input order, are patched into `imageURLs`. With no images the
    /// upload phase is skipped.
    #[instrument(skip_all, fields(images = images.len()))]
    pub async fn insert_post(
        &self,
        title: &str,
        content: &str,
        images: Vec<Image>,
    ) -> Result<DocumentId> {
        let user_id = self.current_user()?;
        let draft = Post::draft(title, content, user_id, now_millis());

        let post_id = self
            .store
            .insert_as(self.posts(), &draft, true)
            .await
            .map_err(CommunityError::InsertPost)?;
        debug!(%post_id, "inserted post");

        if images.is_empty() {
            return Ok(post_id);
        }

        let _guard = self.mutations.acquire(&post_id).await;
        let urls = self.upload_images(&post_id, 0, images).await?;
        self.patch_image_urls(&post_id, urls).await?;

        Ok(post_id)
    }

    /// Upload more images for an existing post and append their URLs.
    ///
    /// Indices continue after the images already on the post. Returns the
    /// new URLs. Also the way to resume after
    /// [`CommunityError::ImageUpload`]: uploads overwrite the same paths.
    #[instrument(skip_all, fields(post_id = %post_id, images = images.len()))]
    pub async fn attach_images(
        &self,
        post_id: &DocumentId,
        images: Vec<Image>,
    ) -> Result<Vec<String>> {
        let _guard = self.mutations.acquire(post_id).await;
        let post = self.read_post(post_id).await?;

        let new_urls = self
            .upload_images(post_id, post.image_urls.len(), images)
            .await?;

        let mut urls = post.image_urls;
        urls.extend(new_urls.iter().cloned());
        self.patch_image_urls(post_id, urls).await?;

        Ok(new_urls)
    }

    /// Replace a post with a merged copy.
    ///
    /// `None` keeps the prior title or content; `updatedAt` is stamped.
    /// The backreference and image lists are taken from the stored post so
    /// a stale `post` cannot drop comments added since it was read.
    #[instrument(skip_all, fields(post_id = %post.id))]
    pub async fn update_post(
        &self,
        post: &Post,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<()> {
        let _guard = self.mutations.acquire(&post.id).await;
        let stored = self.read_post(&post.id).await?;

        let mut updated = post.merged(title, content, now_millis());
        updated.comment_ids = stored.comment_ids;
        updated.image_urls = stored.image_urls;

        self.store
            .update_as(self.posts(), &post.id, &updated)
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => CommunityError::PostNotFound(post.id.clone()),
                e => CommunityError::Store(e),
            })
    }

    /// Read one post.
    pub async fn get_post(&self, post_id: &DocumentId) -> Result<Post> {
        self.read_post(post_id).await
    }

    /// List posts, newest first.
    ///
    /// With `latest_post_id`, only posts ordered after that post are
    /// returned, i.e. the next page. Any store failure is reported as
    /// [`CommunityError::ReadPosts`].
    #[instrument(skip(self))]
    pub async fn get_posts(
        &self,
        limit: usize,
        latest_post_id: Option<&DocumentId>,
    ) -> Result<Vec<Post>> {
        let query = ListQuery::new(limit)
            .order_by(fields::CREATED_AT, true)
            .start_after(latest_post_id.cloned());

        self.store
            .list_as(self.posts(), &query)
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to list posts");
                CommunityError::ReadPosts(e)
            })
    }

    /// Delete a post and every comment it references.
    ///
    /// Comment deletions run concurrently and all of them are awaited. The
    /// post is deleted only if every comment deletion succeeded; otherwise
    /// [`CommunityError::CommentDeletion`] reports what was removed and
    /// the post is left in place so a retry can finish the job. Deleting a
    /// post that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: &DocumentId) -> Result<()> {
        let _guard = self.mutations.acquire(post_id).await;
        let Some(post) = self.store.read_as::<Post>(self.posts(), post_id).await? else {
            debug!("post already deleted");
            return Ok(());
        };

        let results = join_all(post.comment_ids.iter().map(|comment_id| async move {
            let result = self.store.delete(self.comments(), comment_id).await;
            (comment_id.clone(), result)
        }))
        .await;

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (comment_id, result) in results {
            match result {
                Ok(()) => deleted.push(comment_id),
                Err(e) => failed.push((comment_id, e)),
            }
        }

        if !failed.is_empty() {
            warn!(
                deleted = deleted.len(),
                failed = failed.len(),
                "comment deletion incomplete; keeping post"
            );
            return Err(CommunityError::CommentDeletion {
                post_id: post_id.clone(),
                deleted,
                failed,
            });
        }

        self.store.delete(self.posts(), post_id).await?;
        debug!(comments = deleted.len(), "deleted post");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Comments
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a comment by the signed-in user to a post.
    ///
    /// Inserts the comment, then appends its ID to the post's `commentIDs`
    /// and patches only that field.
    #[instrument(skip(self, content))]
    pub async fn insert_comment(&self, post_id: &DocumentId, content: &str) -> Result<DocumentId> {
        let user_id = self.current_user()?;

        let _guard = self.mutations.acquire(post_id).await;
        // Checked before the insert so a missing post leaves no orphan.
        let post = self.read_post(post_id).await?;

        let draft = Comment::draft(post_id.clone(), content, user_id, now_millis());
        let comment_id = self.store.insert_as(self.comments(), &draft, true).await?;

        let mut comment_ids = post.comment_ids;
        comment_ids.push(comment_id.clone());
        self.patch_comment_ids(post_id, &comment_ids).await?;

        debug!(%comment_id, "inserted comment");
        Ok(comment_id)
    }

    /// Replace a comment with a merged copy, stamping `updatedAt`.
    #[instrument(skip_all, fields(comment_id = %comment.id))]
    pub async fn update_comment(&self, comment: &Comment, content: Option<&str>) -> Result<()> {
        let updated = comment.merged(content, now_millis());

        self.store
            .update_as(self.comments(), &comment.id, &updated)
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => CommunityError::CommentNotFound(comment.id.clone()),
                e => CommunityError::Store(e),
            })
    }

    /// Delete a comment, pruning it from its post first.
    ///
    /// The backreference is removed and awaited before the comment itself
    /// is deleted. A comment whose post is already gone is still deleted;
    /// deleting a comment that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: &DocumentId) -> Result<()> {
        let Some(comment) = self
            .store
            .read_as::<Comment>(self.comments(), comment_id)
            .await?
        else {
            debug!("comment already deleted");
            return Ok(());
        };

        let _guard = self.mutations.acquire(&comment.post_id).await;
        match self
            .store
            .read_as::<Post>(self.posts(), &comment.post_id)
            .await?
        {
            Some(post) if post.references(comment_id) => {
                let remaining: Vec<DocumentId> = post
                    .comment_ids
                    .into_iter()
                    .filter(|id| id != comment_id)
                    .collect();
                self.patch_comment_ids(&comment.post_id, &remaining).await?;
            }
            Some(_) => debug!("comment already pruned from post"),
            None => warn!(post_id = %comment.post_id, "deleting comment of missing post"),
        }

        self.store.delete(self.comments(), comment_id).await?;
        Ok(())
    }

    /// Read comments concurrently, oldest first.
    ///
    /// All-or-nothing: a failed or missing read fails the whole call.
    #[instrument(skip_all, fields(count = comment_ids.len()))]
    pub async fn get_comments(&self, comment_ids: &[DocumentId]) -> Result<Vec<Comment>> {
        let mut comments =
            try_join_all(comment_ids.iter().map(|id| self.read_comment(id))).await?;

        comments.sort_by_key(|comment| comment.created_at);
        Ok(comments)
    }

    /// Read comments as [`Self::get_comments`] and attach their authors.
    ///
    /// Each distinct author is read once, concurrently. A missing author
    /// fails the call.
    #[instrument(skip_all, fields(count = comment_ids.len()))]
    pub async fn get_comments_with_authors(
        &self,
        comment_ids: &[DocumentId],
    ) -> Result<Vec<AuthoredComment>> {
        let comments = self.get_comments(comment_ids).await?;

        let author_ids: BTreeSet<&UserId> = comments.iter().map(|c| &c.user_id).collect();
        let authors = try_join_all(author_ids.into_iter().map(|user_id| async move {
            let user = self.read_user(user_id).await?;
            Ok::<_, CommunityError>((user_id.clone(), user))
        }))
        .await?;
        let authors: HashMap<UserId, User> = authors.into_iter().collect();

        comments
            .into_iter()
            .map(|comment| match authors.get(&comment.user_id) {
                Some(author) => Ok(AuthoredComment {
                    author: author.clone(),
                    comment,
                }),
                // Not reached: `authors` holds every distinct author of `comments`.
                None => Err(CommunityError::UserNotFound(
                    comment.user_id.to_document_id()?,
                )),
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn posts(&self) -> &str {
        &self.config.collections.post
    }

    fn comments(&self) -> &str {
        &self.config.collections.comment
    }

    fn users(&self) -> &str {
        &self.config.collections.user
    }

    async fn read_post(&self, post_id: &DocumentId) -> Result<Post> {
        self.store
            .read_as(self.posts(), post_id)
            .await?
            .ok_or_else(|| CommunityError::PostNotFound(post_id.clone()))
    }

    async fn read_comment(&self, comment_id: &DocumentId) -> Result<Comment> {
        self.store
            .read_as(self.comments(), comment_id)
            .await?
            .ok_or_else(|| CommunityError::CommentNotFound(comment_id.clone()))
    }

    async fn read_user(&self, user_id: &UserId) -> Result<User> {
        let id = user_id.to_document_id()?;
        self.store
            .read_as(self.users(), &id)
            .await?
            .ok_or_else(|| CommunityError::UserNotFound(id.clone()))
    }

    /// Upload images concurrently, numbering paths from `first_index`.
    async fn upload_images(
        &self,
        post_id: &DocumentId,
        first_index: usize,
        images: Vec<Image>,
    ) -> Result<Vec<String>> {
        let uploads = images.into_iter().enumerate().map(|(offset, image)| {
            let path = format!(
                "{}/{}/{}",
                self.config.image_path_prefix,
                post_id,
                first_index + offset
            );
            async move { self.blobs.upload_image(&path, image.bytes().clone()).await }
        });

        let mut uploaded = Vec::new();
        let mut first_error = None;
        for result in join_all(uploads).await {
            match result {
                Ok(url) => uploaded.push(url),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!(error = %e, "additional image upload failure"),
            }
        }

        match first_error {
            None => Ok(uploaded),
            Some(source) => {
                warn!(%post_id, uploaded = uploaded.len(), error = %source, "image upload failed");
                Err(CommunityError::ImageUpload {
                    post_id: post_id.clone(),
                    uploaded,
                    source,
                })
            }
        }
    }

    async fn patch_image_urls(&self, post_id: &DocumentId, urls: Vec<String>) -> Result<()> {
        let mut patch = Document::new();
        patch.insert(
            fields::IMAGE_URLS.to_owned(),
            Value::Array(urls.into_iter().map(Value::String).collect()),
        );
        self.store.upsert_fields(self.posts(), post_id, patch).await?;
        Ok(())
    }

    async fn patch_comment_ids(&self, post_id: &DocumentId, comment_ids: &[DocumentId]) -> Result<()> {
        let mut patch = Document::new();
        patch.insert(
            fields::COMMENT_IDS.to_owned(),
            Value::Array(
                comment_ids
                    .iter()
                    .map(|id| Value::String(id.as_str().to_owned()))
                    .collect(),
            ),
        );
        self.store.upsert_fields(self.posts(), post_id, patch).await?;
        Ok(())
    }
}
