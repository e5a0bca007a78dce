//! Auth provider implementations.

use std::sync::RwLock;

use community_core::UserId;

use crate::traits::AuthProvider;

/// An auth provider whose session is set by the application.
///
/// Starts signed out unless constructed with [`StaticAuth::signed_in`].
#[derive(Default)]
pub struct StaticAuth {
    user: RwLock<Option<UserId>>,
}

impl StaticAuth {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        if let Ok(mut current) = self.user.write() {
            *current = Some(user);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut current) = self.user.write() {
            *current = None;
        }
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<UserId> {
        self.user.read().ok().and_then(|user| user.clone())
    }
}
