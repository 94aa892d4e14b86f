use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::locations::CountryResponse;
use super::optional_fields::OptionalFieldResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, CurrentUser};
use crate::api::state::AppState;
use crate::domain::ads::{AttachmentInput, AttachmentView, JobDraft, JobFilter, JobFlags, JobStatus};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{JobListing, JobRepository, OwnerSummary};
use crate::infrastructure::repositories::{PostgresJobRepository, PostgresOptionalFieldRepository};
use crate::services::JobService;

/// One entry of the `additionally` list
#[derive(Debug, Default, Deserialize)]
pub struct AttachmentItem {
    /// Through-row to patch; omitted for new rows
    pub id: Option<Uuid>,
    #[serde(rename = "optionalFieldID", alias = "optional_field")]
    pub optional_field_id: Option<Uuid>,
    /// Scalars may arrive as JSON numbers or booleans
    pub value: Option<Value>,
    pub image: Option<String>,
    pub file: Option<String>,
}

impl From<AttachmentItem> for AttachmentInput {
    fn from(item: AttachmentItem) -> Self {
        let value = match item.value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };
        Self {
            id: item.id,
            optional_field_id: item.optional_field_id,
            value,
            image: item.image,
            file: item.file,
        }
    }
}

/// Request body for creating or replacing a listing
#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub title: String,
    pub category: Option<Uuid>,
    pub city: Option<Uuid>,
    pub description: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
    /// Staff only
    pub status: Option<JobStatus>,
    pub is_top: Option<bool>,
    pub is_vip: Option<bool>,
    pub additionally: Option<Vec<AttachmentItem>>,
}

impl JobRequest {
    fn into_parts(self) -> (JobDraft, JobFlags, Option<Vec<AttachmentInput>>) {
        let draft = JobDraft {
            title: self.title,
            category_id: self.category,
            city_id: self.city,
            description: self.description,
            contact_number: self.contact_number,
            email: self.email,
            name: self.name,
            photo: self.photo,
        };
        let flags = JobFlags {
            status: self.status,
            is_top: self.is_top,
            is_vip: self.is_vip,
        };
        let additionally = self
            .additionally
            .map(|items| items.into_iter().map(AttachmentInput::from).collect());
        (draft, flags, additionally)
    }
}

/// Listing filters shared by `/api/ads` and `/api/myads`
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub title: Option<String>,
    /// Comma-separated category ids
    pub category: Option<String>,
    /// Comma-separated city ids
    pub city: Option<String>,
    #[serde(rename = "isTop")]
    pub is_top: Option<String>,
    #[serde(rename = "isPop")]
    pub is_pop: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl JobQuery {
    fn to_filter(&self, owner_id: Option<Uuid>) -> Result<JobFilter, ApiError> {
        Ok(JobFilter {
            title: self
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            category_ids: parse_id_list("category", self.category.as_deref())?,
            city_ids: parse_id_list("city", self.city.as_deref())?,
            only_top: is_truthy(self.is_top.as_deref()),
            only_vip: is_truthy(self.is_pop.as_deref()),
            owner_id,
        })
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

fn parse_id_list(field: &str, raw: Option<&str>) -> Result<Vec<Uuid>, ApiError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|_| ApiError::validation(field, format!("Invalid id: {}", s)))
        })
        .collect()
}

fn is_truthy(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("1")
    )
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
}

impl From<OwnerSummary> for OwnerResponse {
    fn from(owner: OwnerSummary) -> Self {
        Self {
            id: owner.id,
            email: owner.email,
            phone: owner.phone,
            first_name: owner.first_name,
            last_name: owner.last_name,
            photo: owner.photo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobCityResponse {
    pub id: Uuid,
    pub name: String,
    pub country: Option<CountryResponse>,
}

/// Through-row with its descriptor and the title of the listing it belongs to
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub id: Uuid,
    pub job: String,
    pub optional_field: OptionalFieldResponse,
    pub value: Option<String>,
    pub image: Option<String>,
    pub file: Option<String>,
}

impl AttachmentResponse {
    fn new(view: AttachmentView, job_title: &str) -> Self {
        Self {
            id: view.through.id,
            job: job_title.to_string(),
            optional_field: OptionalFieldResponse::from(&view.field),
            value: view.through.value,
            image: view.through.image,
            file: view.through.file,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub category_id: Option<Uuid>,
    /// Category name
    pub category: Option<String>,
    pub city: Option<JobCityResponse>,
    pub user: Option<OwnerResponse>,
    pub description: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub status: JobStatus,
    pub photo: Option<String>,
    pub is_top: bool,
    pub is_vip: bool,
    pub optional_field: Vec<AttachmentResponse>,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl From<JobListing> for JobResponse {
    fn from(listing: JobListing) -> Self {
        let JobListing {
            job,
            category_name,
            city,
            owner,
            attachments,
        } = listing;

        Self {
            id: job.id(),
            title: job.title().to_string(),
            category_id: job.category_id(),
            category: category_name,
            city: city.map(|c| JobCityResponse {
                id: c.id,
                name: c.name,
                country: c.country.as_ref().map(CountryResponse::from),
            }),
            user: owner.map(OwnerResponse::from),
            description: job.description().to_string(),
            contact_number: job.contact_number().map(str::to_string),
            email: job.email().map(str::to_string),
            name: job.name().map(str::to_string),
            status: job.status(),
            photo: job.photo().map(str::to_string),
            is_top: job.is_top(),
            is_vip: job.is_vip(),
            optional_field: attachments
                .into_iter()
                .map(|view| AttachmentResponse::new(view, job.title()))
                .collect(),
            date_create: job.created_at(),
            date_update: job.updated_at(),
        }
    }
}

async fn load_listing(jobs: &PostgresJobRepository, id: Uuid) -> Result<JobResponse, ApiError> {
    jobs.find_listing(id)
        .await?
        .map(JobResponse::from)
        .ok_or_else(|| ApiError::not_found("Job not found"))
}

/// List listings, newest first
///
/// GET /api/ads?title=&category=&city=&isTop=&isPop=&page=&page_size=
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<Page<JobResponse>>, ApiError> {
    let filter = query.to_filter(None)?;
    let page = PostgresJobRepository::new(state.pool.clone())
        .list(&filter, query.page_request())
        .await?;
    Ok(Json(page.map(JobResponse::from)))
}

/// The caller's own listings, same filters as [`list_jobs`]
///
/// GET /api/myads
pub async fn list_my_jobs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<JobQuery>,
) -> Result<Json<Page<JobResponse>>, ApiError> {
    let filter = query.to_filter(Some(user.id))?;
    let page = PostgresJobRepository::new(state.pool.clone())
        .list(&filter, query.page_request())
        .await?;
    Ok(Json(page.map(JobResponse::from)))
}

/// GET /api/ads/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, ApiError> {
    let jobs = PostgresJobRepository::new(state.pool.clone());
    Ok(Json(load_listing(&jobs, id).await?))
}

/// Create a listing with its `additionally` values
///
/// POST /api/ads
pub async fn create_job(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(req): ApiJson<JobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let jobs = PostgresJobRepository::new(state.pool.clone());
    let fields = PostgresOptionalFieldRepository::new(state.pool.clone());
    let service = JobService::new(&jobs, &fields);

    let (draft, flags, additionally) = req.into_parts();
    let job = service
        .create(current.actor(), draft, flags, &additionally.unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(load_listing(&jobs, job.id()).await?)))
}

/// Replace a listing; a present `additionally` list is reconciled against
/// the stored through-rows
///
/// PUT /api/ads/:id
pub async fn update_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<JobRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    let jobs = PostgresJobRepository::new(state.pool.clone());
    let fields = PostgresOptionalFieldRepository::new(state.pool.clone());
    let service = JobService::new(&jobs, &fields);

    let (draft, flags, additionally) = req.into_parts();
    service
        .update(current.actor(), id, draft, flags, additionally.as_deref())
        .await?;

    Ok(Json(load_listing(&jobs, id).await?))
}

/// DELETE /api/ads/:id
pub async fn delete_job(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let jobs = PostgresJobRepository::new(state.pool.clone());
    let fields = PostgresOptionalFieldRepository::new(state.pool.clone());

    JobService::new(&jobs, &fields)
        .delete(current.actor(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
