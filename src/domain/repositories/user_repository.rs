use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::user::{Email, Phone, User};

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    ///
    /// Unique violations on e-mail, phone or social UID surface as
    /// `RepositoryError::Conflict` with the offending field.
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    /// Persist every mutable column of an existing user
    async fn update(&self, user: &User) -> RepositoryResult<()>;

    /// Delete a user; fails with `InUse` while the user owns listings
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;

    async fn find_by_phone(&self, phone: &Phone) -> RepositoryResult<Option<User>>;

    /// Find the account bound to a social provider identity
    async fn find_by_social_uid(&self, uid: &str) -> RepositoryResult<Option<User>>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()>;
}
