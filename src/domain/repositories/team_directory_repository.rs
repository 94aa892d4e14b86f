use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::RepositoryResult;
use crate::domain::team::{TeamMember, TeamRole};

/// Repository trait for the team directory
#[async_trait]
pub trait TeamDirectoryRepository: Send + Sync {
    async fn create_role(&self, role: &TeamRole) -> RepositoryResult<()>;

    async fn update_role(&self, role: &TeamRole) -> RepositoryResult<()>;

    /// Delete a role; fails with `InUse` while members hold it
    async fn delete_role(&self, id: Uuid) -> RepositoryResult<()>;

    async fn find_role(&self, id: Uuid) -> RepositoryResult<Option<TeamRole>>;

    async fn list_roles(&self) -> RepositoryResult<Vec<TeamRole>>;

    async fn create_member(&self, member: &TeamMember) -> RepositoryResult<()>;

    async fn update_member(&self, member: &TeamMember) -> RepositoryResult<()>;

    async fn delete_member(&self, id: Uuid) -> RepositoryResult<()>;

    /// A member together with their role
    async fn find_member(&self, id: Uuid) -> RepositoryResult<Option<(TeamMember, TeamRole)>>;

    /// All members with their roles, in creation order
    async fn list_members(&self) -> RepositoryResult<Vec<(TeamMember, TeamRole)>>;
}
