//! Proptest generators for property-based testing.

use proptest::prelude::*;

use community_core::{Image, Timestamp};

/// A post title.
pub fn title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,39}".prop_map(String::from)
}

/// Free-form post or comment body.
pub fn content() -> impl Strategy<Value = String> {
    ".{0,200}".prop_map(String::from)
}

/// A small image payload.
pub fn image() -> impl Strategy<Value = Image> {
    prop::collection::vec(any::<u8>(), 1..=64).prop_map(Image::from)
}

/// Up to `max` images.
pub fn images(max: usize) -> impl Strategy<Value = Vec<Image>> {
    prop::collection::vec(image(), 0..=max)
}

/// `len` distinct creation timestamps in arbitrary order.
pub fn distinct_timestamps(len: usize) -> impl Strategy<Value = Vec<Timestamp>> {
    prop::collection::btree_set(0i64..=1_700_000_000_000i64, len)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_distinct_timestamps_are_distinct(ts in distinct_timestamps(8)) {
            let mut sorted = ts.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), 8);
        }

        #[test]
        fn test_images_respect_max(imgs in images(4)) {
            prop_assert!(imgs.len() <= 4);
            prop_assert!(imgs.iter().all(|i| !i.is_empty()));
        }
    }
}
