//! # Community Testkit
//!
//! Testing utilities for the community kit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a facade wired to in-memory collaborators, plus seeding
//!   helpers that write posts and comments with fixed timestamps
//! - **Fault injection**: store wrappers that fail chosen operations or
//!   force step-by-step interleaving of concurrent calls
//! - **Generators**: Proptest strategies for titles, bodies, images and
//!   timestamps
//!
//! ## Test Fixtures
//!
//! ```rust
//! use community_testkit::TestFixture;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let fixture = TestFixture::new();
//! let post_id = fixture.community.insert_post("title", "body", vec![]).await.unwrap();
//! assert!(fixture.read_post(&post_id).await.is_some());
//! # });
//! ```
//!
//! ## Fault Injection
//!
//! ```rust
//! use community_testkit::{FaultyFixture, Op};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let fixture = FaultyFixture::new();
//! fixture.store.fail(Op::Insert, "post");
//! assert!(fixture.community.insert_post("t", "b", vec![]).await.is_err());
//! # });
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;

pub use faults::{FaultyBlobStore, FaultyDocumentStore, Op};
pub use fixtures::{
    seed_comment, seed_post, seed_user, FaultyCommunity, FaultyFixture, TestCommunity,
    TestFixture, TEST_USER,
};
