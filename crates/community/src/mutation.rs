//! Per-post mutation queue.
//!
//! Read-modify-write updates of a post's list fields go through
//! [`PostMutations::acquire`], which hands out one async lock per post ID.
//! Waiters are served in FIFO order by `tokio::sync::Mutex`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use community_core::DocumentId;

/// Held while mutating a post. Dropping it lets the next writer in.
#[derive(Debug)]
pub struct PostGuard {
    _guard: Option<OwnedMutexGuard<()>>,
}

/// Keyed async locks, one per post.
#[derive(Debug)]
pub struct PostMutations {
    enabled: bool,
    locks: Mutex<HashMap<DocumentId, Arc<AsyncMutex<()>>>>,
}

impl PostMutations {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `post_id`.
    ///
    /// When disabled this returns immediately with a no-op guard.
    pub async fn acquire(&self, post_id: &DocumentId) -> PostGuard {
        if !self.enabled {
            return PostGuard { _guard: None };
        }

        let lock = {
            let mut locks = match self.locks.lock() {
                Ok(locks) => locks,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Entries only the map still references are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(post_id.clone()).or_default())
        };

        PostGuard {
            _guard: Some(lock.lock_owned().await),
        }
    }
}
