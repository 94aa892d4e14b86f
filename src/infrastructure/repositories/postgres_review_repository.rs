use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::errors::{corrupt_row, map_delete_error, map_write_error};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::ReviewRepository;
use crate::domain::review::{Rating, Review};
use crate::domain::user::Email;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    job_id: Uuid,
    user_id: Option<Uuid>,
    rating: i16,
    description: String,
    first_name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(r: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: r.id,
            job_id: r.job_id,
            user_id: r.user_id,
            rating: Rating::new(r.rating).map_err(|e| corrupt_row("rating", e))?,
            description: r.description,
            first_name: r.first_name,
            email: Email::new(r.email).map_err(|e| corrupt_row("email", e))?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// PostgreSQL implementation of ReviewRepository
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (
                id, job_id, user_id, rating, description, first_name, email, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(review.id)
        .bind(review.job_id)
        .bind(review.user_id)
        .bind(review.rating.value())
        .bind(&review.description)
        .bind(&review.first_name)
        .bind(review.email.as_str())
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, review: &Review) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET job_id = $2, rating = $3, description = $4, first_name = $5,
                email = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(review.id)
        .bind(review.job_id)
        .bind(review.rating.value())
        .bind(&review.description)
        .bind(&review.first_name)
        .bind(review.email.as_str())
        .bind(review.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Review".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Review".to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Review>> {
        sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, job_id, user_id, rating, description, first_name, email, created_at, updated_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Review::try_from)
        .transpose()
    }

    async fn list_by_author(&self, user_id: Uuid, page: PageRequest) -> RepositoryResult<Page<Review>> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, job_id, user_id, rating, description, first_name, email, created_at, updated_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let results = rows
            .into_iter()
            .map(Review::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(results, count, page))
    }
}
