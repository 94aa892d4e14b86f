use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::errors::{map_delete_error, map_write_error};
use crate::domain::ads::{
    AttachmentView, Country, FieldType, Job, JobFilter, JobStatus, OptionalField,
    OptionalFieldThrough, ReconciliationPlan,
};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{CitySummary, JobListing, JobRepository, OwnerSummary};

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    category_id: Option<Uuid>,
    city_id: Option<Uuid>,
    description: String,
    contact_number: Option<String>,
    email: Option<String>,
    name: Option<String>,
    user_id: Option<Uuid>,
    status: JobStatus,
    photo: Option<String>,
    is_vip: bool,
    is_top: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(r: JobRow) -> Self {
        Job::from_persistence(
            r.id,
            r.title,
            r.category_id,
            r.city_id,
            r.description,
            r.contact_number,
            r.email,
            r.name,
            r.user_id,
            r.status,
            r.photo,
            r.is_vip,
            r.is_top,
            r.created_at,
            r.updated_at,
        )
    }
}

/// Job row joined with its category, city, country and owner
#[derive(sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    job: JobRow,
    category_name: Option<String>,
    city_name: Option<String>,
    country_id: Option<Uuid>,
    country_name: Option<String>,
    country_short_name: Option<String>,
    country_created_at: Option<DateTime<Utc>>,
    country_updated_at: Option<DateTime<Utc>>,
    owner_email: Option<String>,
    owner_phone: Option<String>,
    owner_first_name: Option<String>,
    owner_last_name: Option<String>,
    owner_photo: Option<String>,
}

impl ListingRow {
    fn into_listing(self, attachments: Vec<AttachmentView>) -> JobListing {
        let country = match (
            self.country_id,
            self.country_name,
            self.country_created_at,
            self.country_updated_at,
        ) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Country {
                id,
                name,
                short_name: self.country_short_name,
                created_at,
                updated_at,
            }),
            _ => None,
        };
        let city = match (self.job.city_id, self.city_name) {
            (Some(id), Some(name)) => Some(CitySummary { id, name, country }),
            _ => None,
        };
        let owner = match (self.job.user_id, self.owner_email) {
            (Some(id), Some(email)) => Some(OwnerSummary {
                id,
                email,
                phone: self.owner_phone,
                first_name: self.owner_first_name.unwrap_or_default(),
                last_name: self.owner_last_name.unwrap_or_default(),
                photo: self.owner_photo,
            }),
            _ => None,
        };

        JobListing {
            job: self.job.into(),
            category_name: self.category_name,
            city,
            owner,
            attachments,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ThroughRow {
    id: Uuid,
    job_id: Uuid,
    optional_field_id: Uuid,
    value: Option<String>,
    image: Option<String>,
    file: Option<String>,
}

impl From<ThroughRow> for OptionalFieldThrough {
    fn from(r: ThroughRow) -> Self {
        OptionalFieldThrough {
            id: r.id,
            job_id: r.job_id,
            optional_field_id: r.optional_field_id,
            value: r.value,
            image: r.image,
            file: r.file,
        }
    }
}

/// Through-row joined with its descriptor
#[derive(sqlx::FromRow)]
struct AttachmentRow {
    #[sqlx(flatten)]
    through: ThroughRow,
    field_name: String,
    field_key: String,
    field_type: FieldType,
    field_is_required: bool,
    field_default_value: Option<String>,
    field_max_length: Option<i32>,
    field_min_length: Option<i32>,
    field_is_active: bool,
}

impl From<AttachmentRow> for AttachmentView {
    fn from(r: AttachmentRow) -> Self {
        let field = OptionalField {
            id: r.through.optional_field_id,
            name: r.field_name,
            key: r.field_key,
            field_type: r.field_type,
            is_required: r.field_is_required,
            default_value: r.field_default_value,
            max_length: r.field_max_length,
            min_length: r.field_min_length,
            is_active: r.field_is_active,
        };
        AttachmentView {
            through: r.through.into(),
            field,
        }
    }
}

const LISTING_SELECT: &str = r#"
    SELECT j.id, j.title, j.category_id, j.city_id, j.description, j.contact_number,
           j.email, j.name, j.user_id, j.status, j.photo, j.is_vip, j.is_top,
           j.created_at, j.updated_at,
           cat.name AS category_name,
           ci.name AS city_name,
           co.id AS country_id, co.name AS country_name, co.short_name AS country_short_name,
           co.created_at AS country_created_at, co.updated_at AS country_updated_at,
           u.email AS owner_email, u.phone AS owner_phone, u.first_name AS owner_first_name,
           u.last_name AS owner_last_name, u.photo AS owner_photo
    FROM jobs j
    LEFT JOIN categories cat ON cat.id = j.category_id
    LEFT JOIN cities ci ON ci.id = j.city_id
    LEFT JOIN countries co ON co.id = ci.country_id
    LEFT JOIN users u ON u.id = j.user_id
"#;

const LISTING_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR j.title ILIKE '%' || $1 || '%')
      AND (cardinality($2::uuid[]) = 0 OR j.category_id = ANY($2))
      AND (cardinality($3::uuid[]) = 0 OR j.city_id = ANY($3))
      AND ($4 = FALSE OR j.is_top)
      AND ($5 = FALSE OR j.is_vip)
      AND ($6::uuid IS NULL OR j.user_id = $6)
"#;

/// Escapes LIKE wildcards so the title filter matches literally
fn like_pattern(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn insert_attachment(conn: &mut PgConnection, row: &OptionalFieldThrough) -> RepositoryResult<()> {
    sqlx::query(
        r#"
        INSERT INTO optional_field_through (id, job_id, optional_field_id, value, image, file)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(row.id)
    .bind(row.job_id)
    .bind(row.optional_field_id)
    .bind(row.value.as_deref())
    .bind(row.image.as_deref())
    .bind(row.file.as_deref())
    .execute(conn)
    .await
    .map_err(map_write_error)?;

    Ok(())
}

fn stale_attachments() -> RepositoryError {
    RepositoryError::Stale("Job attachments were changed by another request, retry".to_string())
}

/// PostgreSQL implementation of JobRepository
pub struct PostgresJobRepository {
    pool: PgPool,
}

impl PostgresJobRepository {
    /// Creates a new PostgresJobRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attachments_for(&self, job_ids: &[Uuid]) -> RepositoryResult<HashMap<Uuid, Vec<AttachmentView>>> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, AttachmentRow>(
            r#"
            SELECT t.id, t.job_id, t.optional_field_id, t.value, t.image, t.file,
                   f.name AS field_name, f.key AS field_key, f.field_type,
                   f.is_required AS field_is_required, f.default_value AS field_default_value,
                   f.max_length AS field_max_length, f.min_length AS field_min_length,
                   f.is_active AS field_is_active
            FROM optional_field_through t
            JOIN optional_fields f ON f.id = t.optional_field_id
            WHERE t.job_id = ANY($1)
            ORDER BY t.seq
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<AttachmentView>> = HashMap::new();
        for row in rows {
            let view = AttachmentView::from(row);
            grouped.entry(view.through.job_id).or_default().push(view);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create_with_attachments(
        &self,
        job: &Job,
        attachments: &[OptionalFieldThrough],
    ) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, title, category_id, city_id, description, contact_number, email,
                name, user_id, status, photo, is_vip, is_top, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(job.id())
        .bind(job.title())
        .bind(job.category_id())
        .bind(job.city_id())
        .bind(job.description())
        .bind(job.contact_number())
        .bind(job.email())
        .bind(job.name())
        .bind(job.user_id())
        .bind(job.status())
        .bind(job.photo())
        .bind(job.is_vip())
        .bind(job.is_top())
        .bind(job.created_at())
        .bind(job.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        for row in attachments {
            insert_attachment(&mut *tx, row).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_with_attachments(
        &self,
        job: &Job,
        plan: Option<&ReconciliationPlan>,
    ) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        // Writers of one job queue up here; the attachment read below sees
        // whatever the previous writer committed.
        let locked = sqlx::query("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
            .bind(job.id())
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(RepositoryError::NotFound("Job".to_string()));
        }

        if let Some(plan) = plan {
            let current = sqlx::query_as::<_, ThroughRow>(
                r#"
                SELECT id, job_id, optional_field_id, value, image, file
                FROM optional_field_through
                WHERE job_id = $1
                "#,
            )
            .bind(job.id())
            .fetch_all(&mut *tx)
            .await?;
            let current: Vec<OptionalFieldThrough> =
                current.into_iter().map(OptionalFieldThrough::from).collect();

            if !plan.is_current(&current) {
                return Err(stale_attachments());
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $2, category_id = $3, city_id = $4, description = $5,
                contact_number = $6, email = $7, name = $8, status = $9, photo = $10,
                is_vip = $11, is_top = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(job.id())
        .bind(job.title())
        .bind(job.category_id())
        .bind(job.city_id())
        .bind(job.description())
        .bind(job.contact_number())
        .bind(job.email())
        .bind(job.name())
        .bind(job.status())
        .bind(job.photo())
        .bind(job.is_vip())
        .bind(job.is_top())
        .bind(job.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Job".to_string()));
        }

        if let Some(plan) = plan {
            if !plan.delete.is_empty() {
                sqlx::query("DELETE FROM optional_field_through WHERE job_id = $1 AND id = ANY($2)")
                    .bind(job.id())
                    .bind(plan.delete.as_slice())
                    .execute(&mut *tx)
                    .await?;
            }

            for row in &plan.update {
                let patched = sqlx::query(
                    r#"
                    UPDATE optional_field_through
                    SET value = $3, image = $4, file = $5
                    WHERE id = $1 AND job_id = $2
                    "#,
                )
                .bind(row.id)
                .bind(job.id())
                .bind(row.value.as_deref())
                .bind(row.image.as_deref())
                .bind(row.file.as_deref())
                .execute(&mut *tx)
                .await?;

                if patched.rows_affected() == 0 {
                    return Err(stale_attachments());
                }
            }

            for row in &plan.create {
                insert_attachment(&mut *tx, row).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_delete_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Job".to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, category_id, city_id, description, contact_number, email,
                   name, user_id, status, photo, is_vip, is_top, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Job::from))
    }

    async fn find_attachments(&self, job_id: Uuid) -> RepositoryResult<Vec<OptionalFieldThrough>> {
        let rows = sqlx::query_as::<_, ThroughRow>(
            r#"
            SELECT id, job_id, optional_field_id, value, image, file
            FROM optional_field_through
            WHERE job_id = $1
            ORDER BY seq
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OptionalFieldThrough::from).collect())
    }

    async fn find_listing(&self, id: Uuid) -> RepositoryResult<Option<JobListing>> {
        let sql = format!("{} WHERE j.id = $1", LISTING_SELECT);
        let Some(row) = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut attachments = self.attachments_for(&[id]).await?;
        Ok(Some(row.into_listing(attachments.remove(&id).unwrap_or_default())))
    }

    async fn list(&self, filter: &JobFilter, page: PageRequest) -> RepositoryResult<Page<JobListing>> {
        let title = filter
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM jobs j {}", LISTING_FILTER);
        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(title.as_deref())
            .bind(filter.category_ids.as_slice())
            .bind(filter.city_ids.as_slice())
            .bind(filter.only_top)
            .bind(filter.only_vip)
            .bind(filter.owner_id)
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "{} {} ORDER BY j.created_at DESC, j.id LIMIT $7 OFFSET $8",
            LISTING_SELECT, LISTING_FILTER
        );
        let rows = sqlx::query_as::<_, ListingRow>(&list_sql)
            .bind(title.as_deref())
            .bind(filter.category_ids.as_slice())
            .bind(filter.city_ids.as_slice())
            .bind(filter.only_top)
            .bind(filter.only_vip)
            .bind(filter.owner_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.job.id).collect();
        let mut attachments = self.attachments_for(&ids).await?;
        let results = rows
            .into_iter()
            .map(|row| {
                let own = attachments.remove(&row.job.id).unwrap_or_default();
                row.into_listing(own)
            })
            .collect();

        Ok(Page::new(results, count, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_remote"), "100\\%\\_remote");
        assert_eq!(like_pattern("plain"), "plain");
    }
}
