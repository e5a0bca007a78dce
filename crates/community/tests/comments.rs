//! Comment operations and the post → comments backreference.

use community::store::DocumentStore;
use community::{CommunityError, DocumentId, UserId};
use community_testkit::{TestFixture, TEST_USER};

#[tokio::test]
async fn insert_comment_links_post_exactly_once() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;

    let comment_id = fixture
        .community
        .insert_comment(&post.id, "first!")
        .await
        .unwrap();

    let stored = fixture.read_post(&post.id).await.unwrap();
    assert_eq!(stored.comment_ids, vec![comment_id.clone()]);

    let comment = fixture.read_comment(&comment_id).await.unwrap();
    assert_eq!(comment.id, comment_id);
    assert_eq!(comment.post_id, post.id);
    assert_eq!(comment.content, "first!");
    assert_eq!(comment.user_id.as_str(), TEST_USER);
    assert_eq!(comment.updated_at, None);
}

#[tokio::test]
async fn insert_comment_keeps_post_fields() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("title", 42).await;

    fixture.community.insert_comment(&post.id, "c").await.unwrap();

    let stored = fixture.read_post(&post.id).await.unwrap();
    assert_eq!(stored.title, post.title);
    assert_eq!(stored.content, post.content);
    assert_eq!(stored.created_at, 42);
}

#[tokio::test]
async fn sequential_comments_append_in_order() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;

    let mut expected = Vec::new();
    for i in 0..5 {
        let id = fixture
            .community
            .insert_comment(&post.id, &format!("c{}", i))
            .await
            .unwrap();
        expected.push(id);
    }

    let stored = fixture.read_post(&post.id).await.unwrap();
    assert_eq!(stored.comment_ids, expected);
}

#[tokio::test]
async fn insert_comment_on_missing_post_writes_nothing() {
    let fixture = TestFixture::new();
    let missing = DocumentId::new("missing").unwrap();

    let err = fixture
        .community
        .insert_comment(&missing, "orphan?")
        .await
        .unwrap_err();

    assert!(matches!(err, CommunityError::PostNotFound(id) if id == missing));
    assert_eq!(fixture.store.len("comment").unwrap(), 0);
    assert_eq!(fixture.store.len("post").unwrap(), 0);
}

#[tokio::test]
async fn insert_comment_requires_signed_in_user() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    fixture.auth.sign_out();

    let err = fixture
        .community
        .insert_comment(&post.id, "anon")
        .await
        .unwrap_err();

    assert!(matches!(err, CommunityError::NotSignedIn));
    assert_eq!(fixture.store.len("comment").unwrap(), 0);
    assert!(fixture.read_post(&post.id).await.unwrap().comment_ids.is_empty());
}

#[tokio::test]
async fn comment_author_follows_sign_in() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    fixture.auth.sign_in(UserId::new("someone-else"));

    let id = fixture.community.insert_comment(&post.id, "hi").await.unwrap();

    let comment = fixture.read_comment(&id).await.unwrap();
    assert_eq!(comment.user_id.as_str(), "someone-else");
}

#[tokio::test]
async fn update_comment_merges_content() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let comment = fixture.seed_comment(&post.id, "typo", 5).await;

    fixture
        .community
        .update_comment(&comment, Some("fixed"))
        .await
        .unwrap();

    let stored = fixture.read_comment(&comment.id).await.unwrap();
    assert_eq!(stored.content, "fixed");
    assert_eq!(stored.created_at, 5);
    assert_eq!(stored.post_id, post.id);
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn update_comment_without_content_only_stamps() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let comment = fixture.seed_comment(&post.id, "same", 5).await;

    fixture
        .community
        .update_comment(&comment, None)
        .await
        .unwrap();

    let stored = fixture.read_comment(&comment.id).await.unwrap();
    assert_eq!(stored.content, "same");
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn update_missing_comment() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let comment = fixture.seed_comment(&post.id, "gone", 5).await;
    fixture.community.delete_comment(&comment.id).await.unwrap();

    let err = fixture
        .community
        .update_comment(&comment, Some("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, CommunityError::CommentNotFound(id) if id == comment.id));
}

#[tokio::test]
async fn delete_comment_prunes_backreference() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let keep = fixture.seed_comment(&post.id, "keep", 2).await;
    let drop = fixture.seed_comment(&post.id, "drop", 3).await;

    fixture.community.delete_comment(&drop.id).await.unwrap();

    let stored = fixture.read_post(&post.id).await.unwrap();
    assert_eq!(stored.comment_ids, vec![keep.id.clone()]);
    assert!(fixture.read_comment(&drop.id).await.is_none());
    assert!(fixture.read_comment(&keep.id).await.is_some());
}

#[tokio::test]
async fn delete_comment_twice_succeeds() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let keep = fixture.seed_comment(&post.id, "keep", 2).await;
    let comment = fixture.seed_comment(&post.id, "c", 3).await;

    fixture.community.delete_comment(&comment.id).await.unwrap();
    fixture.community.delete_comment(&comment.id).await.unwrap();

    assert!(fixture.read_comment(&comment.id).await.is_none());
    let stored = fixture.read_post(&post.id).await.unwrap();
    assert_eq!(stored.comment_ids, vec![keep.id]);
}

#[tokio::test]
async fn delete_never_existing_comment_succeeds() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;

    fixture
        .community
        .delete_comment(&DocumentId::new("never").unwrap())
        .await
        .unwrap();

    assert!(fixture.read_post(&post.id).await.unwrap().comment_ids.is_empty());
    assert_eq!(fixture.store.len("comment").unwrap(), 0);
}

#[tokio::test]
async fn delete_comment_of_deleted_post() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let comment = fixture.seed_comment(&post.id, "c", 2).await;

    // Drop the post without cascading, leaving the comment orphaned.
    fixture.store.delete("post", &post.id).await.unwrap();

    fixture.community.delete_comment(&comment.id).await.unwrap();
    assert!(fixture.read_comment(&comment.id).await.is_none());
    assert!(fixture.read_post(&post.id).await.is_none());
}

#[tokio::test]
async fn get_comments_oldest_first() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let late = fixture.seed_comment(&post.id, "late", 300).await;
    let early = fixture.seed_comment(&post.id, "early", 100).await;
    let mid = fixture.seed_comment(&post.id, "mid", 200).await;

    let comments = fixture
        .community
        .get_comments(&[late.id.clone(), early.id.clone(), mid.id.clone()])
        .await
        .unwrap();

    let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["early", "mid", "late"]);
}

#[tokio::test]
async fn get_comments_empty_input() {
    let fixture = TestFixture::new();
    let comments = fixture.community.get_comments(&[]).await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn get_comments_is_all_or_nothing() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let present = fixture.seed_comment(&post.id, "here", 1).await;
    let missing = DocumentId::new("missing").unwrap();

    let err = fixture
        .community
        .get_comments(&[present.id.clone(), missing.clone()])
        .await
        .unwrap_err();

    assert!(matches!(err, CommunityError::CommentNotFound(id) if id == missing));
}

#[tokio::test]
async fn get_comments_with_authors_attaches_users() {
    let fixture = TestFixture::new();
    fixture.seed_user(TEST_USER, "Tester").await;
    fixture.seed_user("other", "Other").await;
    let post = fixture.seed_post("p", 1).await;
    let mine = fixture.seed_comment(&post.id, "mine", 1).await;

    fixture.auth.sign_in(UserId::new("other"));
    let theirs = fixture
        .community
        .insert_comment(&post.id, "theirs")
        .await
        .unwrap();

    let comments = fixture
        .community
        .get_comments_with_authors(&[theirs.clone(), mine.id.clone()])
        .await
        .unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.id, mine.id);
    assert_eq!(comments[0].author.display_name.as_deref(), Some("Tester"));
    assert_eq!(comments[1].comment.id, theirs);
    assert_eq!(comments[1].author.display_name.as_deref(), Some("Other"));
}

#[tokio::test]
async fn get_comments_with_missing_author() {
    let fixture = TestFixture::new();
    let post = fixture.seed_post("p", 1).await;
    let comment = fixture.seed_comment(&post.id, "nobody wrote this", 1).await;

    let err = fixture
        .community
        .get_comments_with_authors(&[comment.id])
        .await
        .unwrap_err();

    assert!(matches!(err, CommunityError::UserNotFound(id) if id.as_str() == TEST_USER));
}
