//! Property-based tests for listing order, paging and backreferences.

use proptest::prelude::*;

use community_testkit::{generators, TestFixture};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn get_posts_is_newest_first_and_bounded(
        timestamps in generators::distinct_timestamps(12),
        limit in 0usize..16,
    ) {
        let (listed, expected) = block_on(async {
            let fixture = TestFixture::new();
            for (i, ts) in timestamps.iter().enumerate() {
                fixture.seed_post(&format!("p{}", i), *ts).await;
            }
            let listed = fixture.community.get_posts(limit, None).await.unwrap();

            let mut expected = timestamps.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(limit);
            (listed, expected)
        });

        let created: Vec<_> = listed.iter().map(|p| p.created_at).collect();
        prop_assert_eq!(created, expected);
    }

    #[test]
    fn paging_visits_every_post_once(
        timestamps in generators::distinct_timestamps(10),
        page in 1usize..5,
    ) {
        let visited = block_on(async {
            let fixture = TestFixture::new();
            for (i, ts) in timestamps.iter().enumerate() {
                fixture.seed_post(&format!("p{}", i), *ts).await;
            }

            let mut visited = Vec::new();
            let mut cursor = None;
            loop {
                let batch = fixture
                    .community
                    .get_posts(page, cursor.as_ref())
                    .await
                    .unwrap();
                if batch.is_empty() {
                    break;
                }
                cursor = batch.last().map(|p| p.id.clone());
                visited.extend(batch.into_iter().map(|p| p.created_at));
            }
            visited
        });

        let mut expected = timestamps.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(visited, expected);
    }

    #[test]
    fn get_comments_sorted_regardless_of_request_order(
        timestamps in generators::distinct_timestamps(8),
    ) {
        let created = block_on(async {
            let fixture = TestFixture::new();
            let post = fixture.seed_post("p", 0).await;
            let mut ids = Vec::new();
            for ts in &timestamps {
                ids.push(fixture.seed_comment(&post.id, "c", *ts).await.id);
            }
            ids.reverse();

            fixture
                .community
                .get_comments(&ids)
                .await
                .unwrap()
                .into_iter()
                .map(|c| c.created_at)
                .collect::<Vec<_>>()
        });

        let mut expected = timestamps.clone();
        expected.sort_unstable();
        prop_assert_eq!(created, expected);
    }

    #[test]
    fn backreferences_match_surviving_comments(
        deletions in prop::collection::vec(any::<bool>(), 1..10),
        content in generators::content(),
    ) {
        let (linked, surviving) = block_on(async {
            let fixture = TestFixture::new();
            let post = fixture.seed_post("p", 0).await;

            let mut surviving = Vec::new();
            let mut doomed = Vec::new();
            for delete in &deletions {
                let id = fixture
                    .community
                    .insert_comment(&post.id, &content)
                    .await
                    .unwrap();
                if *delete {
                    doomed.push(id);
                } else {
                    surviving.push(id);
                }
            }
            for id in &doomed {
                fixture.community.delete_comment(id).await.unwrap();
            }

            let linked = fixture.read_post(&post.id).await.unwrap().comment_ids;
            (linked, surviving)
        });

        prop_assert_eq!(linked, surviving);
    }

    #[test]
    fn every_image_gets_a_url(images in generators::images(6), title in generators::title()) {
        let (urls, post_id, stored) = block_on(async {
            let fixture = TestFixture::new();
            let post_id = fixture
                .community
                .insert_post(&title, "body", images.clone())
                .await
                .unwrap();
            let urls = fixture.read_post(&post_id).await.unwrap().image_urls;
            (urls, post_id, fixture.blobs.len())
        });

        prop_assert_eq!(urls.len(), images.len());
        prop_assert_eq!(stored, images.len());
        for (index, url) in urls.iter().enumerate() {
            prop_assert_eq!(url, &format!("https://blobs.test/post/{}/{}", post_id, index));
        }
    }
}
