use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, CurrentUser};
use crate::api::state::AppState;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::ReviewRepository;
use crate::domain::review::{Review, ReviewDraft};
use crate::domain::user::User;
use crate::infrastructure::repositories::PostgresReviewRepository;

/// Request body for writing a review
///
/// `first_name` and `email` default to the author's own.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub job: Uuid,
    pub rating: i16,
    pub description: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
}

impl ReviewRequest {
    fn into_draft(self, author: &User) -> ReviewDraft {
        ReviewDraft {
            job_id: self.job,
            rating: self.rating,
            description: self.description,
            first_name: self.first_name.unwrap_or_else(|| author.first_name.clone()),
            email: self
                .email
                .unwrap_or_else(|| author.email.as_str().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub job: Uuid,
    pub user: Option<Uuid>,
    pub rating: i16,
    pub description: String,
    pub first_name: String,
    pub email: String,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            job: review.job_id,
            user: review.user_id,
            rating: review.rating.value(),
            description: review.description.clone(),
            first_name: review.first_name.clone(),
            email: review.email.as_str().to_string(),
            date_create: review.created_at,
            date_update: review.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

async fn find_modifiable(
    repo: &PostgresReviewRepository,
    current: &CurrentUser,
    id: Uuid,
) -> Result<Review, ApiError> {
    let review = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;
    if !current.actor().can_modify(review.user_id) {
        return Err(ApiError::forbidden("Only the author or staff can modify this review"));
    }
    Ok(review)
}

/// The caller's reviews, newest first
///
/// GET /api/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Page<ReviewResponse>>, ApiError> {
    let page = PostgresReviewRepository::new(state.pool.clone())
        .list_by_author(user.id, PageRequest::new(query.page, query.page_size))
        .await?;
    Ok(Json(page.map(|r| ReviewResponse::from(&r))))
}

/// GET /api/reviews/:id
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = PostgresReviewRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;
    Ok(Json(ReviewResponse::from(&review)))
}

/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let review = Review::new(user.id, req.into_draft(&user))?;

    // An unknown job surfaces as a `job` field error
    PostgresReviewRepository::new(state.pool.clone())
        .create(&review)
        .await?;

    info!(review_id = %review.id, job_id = %review.job_id, "Review created");
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// PUT /api/reviews/:id
pub async fn update_review(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let repo = PostgresReviewRepository::new(state.pool.clone());
    let mut review = find_modifiable(&repo, &current, id).await?;

    review.update(req.into_draft(&current.0))?;
    repo.update(&review).await?;

    info!(review_id = %id, "Review updated");
    Ok(Json(ReviewResponse::from(&review)))
}

/// DELETE /api/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = PostgresReviewRepository::new(state.pool.clone());
    find_modifiable(&repo, &current, id).await?;
    repo.delete(id).await?;

    info!(review_id = %id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}
