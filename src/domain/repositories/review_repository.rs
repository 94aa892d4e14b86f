use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::review::Review;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> RepositoryResult<()>;

    async fn update(&self, review: &Review) -> RepositoryResult<()>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Review>>;

    /// Reviews written by `user_id`, newest first
    async fn list_by_author(&self, user_id: Uuid, page: PageRequest) -> RepositoryResult<Page<Review>>;
}
