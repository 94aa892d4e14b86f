use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{map_delete_error, map_write_error};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::TeamDirectoryRepository;
use crate::domain::team::{TeamMember, TeamRole};

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
}

impl From<RoleRow> for TeamRole {
    fn from(r: RoleRow) -> Self {
        TeamRole { id: r.id, name: r.name }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    description: String,
    photo: String,
    role_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role_name: String,
}

impl MemberRow {
    fn into_parts(self) -> (TeamMember, TeamRole) {
        let role = TeamRole {
            id: self.role_id,
            name: self.role_name,
        };
        let member = TeamMember::from_persistence(
            self.id,
            self.name,
            self.description,
            self.photo,
            self.role_id,
            self.created_at,
            self.updated_at,
        );
        (member, role)
    }
}

const MEMBER_SELECT: &str = r#"
    SELECT m.id, m.name, m.description, m.photo, m.role_id, m.created_at, m.updated_at,
           r.name AS role_name
    FROM team_members m
    JOIN team_roles r ON r.id = m.role_id
"#;

/// PostgreSQL implementation of TeamDirectoryRepository
pub struct PostgresTeamDirectoryRepository {
    pool: PgPool,
}

impl PostgresTeamDirectoryRepository {
    /// Creates a new PostgresTeamDirectoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamDirectoryRepository for PostgresTeamDirectoryRepository {
    async fn create_role(&self, role: &TeamRole) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO team_roles (id, name) VALUES ($1, $2)")
            .bind(role.id)
            .bind(&role.name)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_role(&self, role: &TeamRole) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE team_roles SET name = $2 WHERE id = $1")
            .bind(role.id)
            .bind(&role.name)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Team role".to_string()));
        }
        Ok(())
    }

    async fn delete_role(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM team_roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Team role".to_string()));
        }
        Ok(())
    }

    async fn find_role(&self, id: Uuid) -> RepositoryResult<Option<TeamRole>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM team_roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TeamRole::from))
    }

    async fn list_roles(&self) -> RepositoryResult<Vec<TeamRole>> {
        let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM team_roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TeamRole::from).collect())
    }

    async fn create_member(&self, member: &TeamMember) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO team_members (id, name, description, photo, role_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(member.id())
        .bind(member.name())
        .bind(member.description())
        .bind(member.photo())
        .bind(member.role_id())
        .bind(member.created_at())
        .bind(member.updated_at())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_member(&self, member: &TeamMember) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE team_members
            SET name = $2, description = $3, photo = $4, role_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(member.id())
        .bind(member.name())
        .bind(member.description())
        .bind(member.photo())
        .bind(member.role_id())
        .bind(member.updated_at())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Team member".to_string()));
        }
        Ok(())
    }

    async fn delete_member(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Team member".to_string()));
        }
        Ok(())
    }

    async fn find_member(&self, id: Uuid) -> RepositoryResult<Option<(TeamMember, TeamRole)>> {
        let sql = format!("{} WHERE m.id = $1", MEMBER_SELECT);
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MemberRow::into_parts))
    }

    async fn list_members(&self) -> RepositoryResult<Vec<(TeamMember, TeamRole)>> {
        let sql = format!("{} ORDER BY m.created_at, m.id", MEMBER_SELECT);
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(MemberRow::into_parts).collect())
    }
}
