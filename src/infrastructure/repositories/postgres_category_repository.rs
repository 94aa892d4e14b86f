use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{map_delete_error, map_write_error};
use crate::domain::ads::Category;
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::CategoryRepository;

/// Depth guard for the ancestor walk
const MAX_CHAIN_DEPTH: i32 = 32;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    subcategory_id: Option<Uuid>,
    icon: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            subcategory_id: r.subcategory_id,
            icon: r.icon,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of CategoryRepository
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, category: &Category) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, subcategory_id, icon, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.subcategory_id)
        .bind(category.icon.as_deref())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, category: &Category) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, subcategory_id = $3, icon = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.subcategory_id)
        .bind(category.icon.as_deref())
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Category".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Category".to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, subcategory_id, icon, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, subcategory_id, icon, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn parent_chain(&self, id: Uuid) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            WITH RECURSIVE chain AS (
                SELECT p.id, p.name, p.subcategory_id, p.icon, p.created_at, p.updated_at, 1 AS depth
                FROM categories c
                JOIN categories p ON p.id = c.subcategory_id
                WHERE c.id = $1
                UNION ALL
                SELECT p.id, p.name, p.subcategory_id, p.icon, p.created_at, p.updated_at, chain.depth + 1
                FROM categories p
                JOIN chain ON p.id = chain.subcategory_id
                WHERE chain.depth < $2
            )
            SELECT id, name, subcategory_id, icon, created_at, updated_at
            FROM chain
            ORDER BY depth
            "#,
        )
        .bind(id)
        .bind(MAX_CHAIN_DEPTH)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
