use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, StaffAuth};
use crate::api::state::AppState;
use crate::domain::ads::Category;
use crate::domain::repositories::CategoryRepository;
use crate::infrastructure::repositories::PostgresCategoryRepository;

/// Request body for creating or replacing a category
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    /// Parent category id
    pub subcategory: Option<Uuid>,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub subcategory: Option<Uuid>,
    pub icon: Option<String>,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            subcategory: category.subcategory_id,
            icon: category.icon.clone(),
            date_create: category.created_at,
            date_update: category.updated_at,
        }
    }
}

/// A category with its parent chain nested under `subcategory`
#[derive(Debug, Serialize)]
pub struct CategoryDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub subcategory: Option<Box<CategoryDetailResponse>>,
    pub icon: Option<String>,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl CategoryDetailResponse {
    /// Nests `chain` (nearest parent first) beneath `category`
    fn nest(category: &Category, chain: &[Category]) -> Self {
        let subcategory = chain
            .iter()
            .rev()
            .fold(None, |child: Option<Box<Self>>, parent| {
                Some(Box::new(Self::leaf(parent, child)))
            });
        Self::leaf(category, subcategory)
    }

    fn leaf(category: &Category, subcategory: Option<Box<Self>>) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            subcategory,
            icon: category.icon.clone(),
            date_create: category.created_at,
            date_update: category.updated_at,
        }
    }
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = PostgresCategoryRepository::new(state.pool.clone()).list().await?;
    Ok(Json(categories.iter().map(CategoryResponse::from).collect()))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDetailResponse>, ApiError> {
    let repo = PostgresCategoryRepository::new(state.pool.clone());
    let category = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    let chain = repo.parent_chain(id).await?;

    Ok(Json(CategoryDetailResponse::nest(&category, &chain)))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = Category::new(&req.name, req.subcategory, req.icon.as_deref())?;

    PostgresCategoryRepository::new(state.pool.clone())
        .create(&category)
        .await?;

    info!(category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(&category))))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let repo = PostgresCategoryRepository::new(state.pool.clone());
    let mut category = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    // The proposed parent and everything above it
    let chain = match req.subcategory {
        Some(parent_id) => {
            let parent = repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| ApiError::validation("subcategory", "Parent category does not exist"))?;
            let mut chain = vec![parent];
            chain.extend(repo.parent_chain(parent_id).await?);
            chain
        }
        None => Vec::new(),
    };

    category.update(&req.name, req.subcategory, req.icon.as_deref(), &chain)?;
    repo.update(&category).await?;

    info!(category_id = %id, "Category updated");
    Ok(Json(CategoryResponse::from(&category)))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresCategoryRepository::new(state.pool.clone())
        .delete(id)
        .await?;

    info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
