// Application services
// Use cases that coordinate several repositories

pub mod job_service;
pub mod social_auth;

#[cfg(test)]
pub(crate) mod testing;

use uuid::Uuid;

use crate::domain::user::User;

/// The authenticated user performing a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub is_staff: bool,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_staff: user.is_staff,
        }
    }

    /// Staff may act on anything, others only on what they own
    pub fn can_modify(&self, owner_id: Option<Uuid>) -> bool {
        self.is_staff || owner_id == Some(self.user_id)
    }
}

pub use job_service::JobService;
pub use social_auth::{SocialAuthService, SocialLogin};
