use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ads::Category;
use crate::domain::errors::RepositoryResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> RepositoryResult<()>;

    async fn update(&self, category: &Category) -> RepositoryResult<()>;

    /// Delete a category and its listings; fails with `InUse` while it has children
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Category>>;

    /// All categories ordered by name
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    /// Ancestors of `id`, nearest parent first
    async fn parent_chain(&self, id: Uuid) -> RepositoryResult<Vec<Category>>;
}
