use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{map_delete_error, map_write_error};
use crate::domain::ads::{FieldType, OptionalField};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::OptionalFieldRepository;

#[derive(sqlx::FromRow)]
struct OptionalFieldRow {
    id: Uuid,
    name: String,
    key: String,
    field_type: FieldType,
    is_required: bool,
    default_value: Option<String>,
    max_length: Option<i32>,
    min_length: Option<i32>,
    is_active: bool,
}

impl From<OptionalFieldRow> for OptionalField {
    fn from(r: OptionalFieldRow) -> Self {
        OptionalField {
            id: r.id,
            name: r.name,
            key: r.key,
            field_type: r.field_type,
            is_required: r.is_required,
            default_value: r.default_value,
            max_length: r.max_length,
            min_length: r.min_length,
            is_active: r.is_active,
        }
    }
}

const FIELD_COLUMNS: &str =
    "id, name, key, field_type, is_required, default_value, max_length, min_length, is_active";

/// PostgreSQL implementation of OptionalFieldRepository
pub struct PostgresOptionalFieldRepository {
    pool: PgPool,
}

impl PostgresOptionalFieldRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OptionalFieldRepository for PostgresOptionalFieldRepository {
    async fn create(&self, field: &OptionalField) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO optional_fields (
                id, name, key, field_type, is_required, default_value,
                max_length, min_length, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(field.id)
        .bind(&field.name)
        .bind(&field.key)
        .bind(field.field_type)
        .bind(field.is_required)
        .bind(field.default_value.as_deref())
        .bind(field.max_length)
        .bind(field.min_length)
        .bind(field.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, field: &OptionalField) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE optional_fields
            SET name = $2, key = $3, field_type = $4, is_required = $5,
                default_value = $6, max_length = $7, min_length = $8, is_active = $9
            WHERE id = $1
            "#,
        )
        .bind(field.id)
        .bind(&field.name)
        .bind(&field.key)
        .bind(field.field_type)
        .bind(field.is_required)
        .bind(field.default_value.as_deref())
        .bind(field.max_length)
        .bind(field.min_length)
        .bind(field.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("OptionalField".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM optional_fields WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("OptionalField".to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<OptionalField>> {
        let sql = format!("SELECT {} FROM optional_fields WHERE id = $1", FIELD_COLUMNS);
        let row = sqlx::query_as::<_, OptionalFieldRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(OptionalField::from))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<OptionalField>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM optional_fields WHERE id = ANY($1)", FIELD_COLUMNS);
        let rows = sqlx::query_as::<_, OptionalFieldRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(OptionalField::from).collect())
    }

    async fn list(&self, only_active: bool) -> RepositoryResult<Vec<OptionalField>> {
        let sql = format!(
            "SELECT {} FROM optional_fields WHERE ($1 = FALSE OR is_active) ORDER BY name",
            FIELD_COLUMNS
        );
        let rows = sqlx::query_as::<_, OptionalFieldRow>(&sql)
            .bind(only_active)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(OptionalField::from).collect())
    }
}
