use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ads::OptionalField;
use crate::domain::errors::RepositoryResult;

/// Repository trait for dynamic field descriptors
#[async_trait]
pub trait OptionalFieldRepository: Send + Sync {
    async fn create(&self, field: &OptionalField) -> RepositoryResult<()>;

    async fn update(&self, field: &OptionalField) -> RepositoryResult<()>;

    /// Delete a descriptor; its attached values go with it
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OptionalField>>;

    /// Fetch every descriptor whose id is in `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OptionalField>>;

    async fn list(&self, only_active: bool) -> RepositoryResult<Vec<OptionalField>>;
}
