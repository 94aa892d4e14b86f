use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, StaffAuth};
use crate::api::state::AppState;
use crate::domain::ads::{FieldType, OptionalField, OptionalFieldDefinition};
use crate::domain::repositories::OptionalFieldRepository;
use crate::infrastructure::repositories::PostgresOptionalFieldRepository;

fn default_true() -> bool {
    true
}

/// Descriptor as administrators submit it
#[derive(Debug, Deserialize)]
pub struct OptionalFieldRequest {
    pub name: String,
    pub key: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    pub default: Option<String>,
    pub max_length: Option<i32>,
    pub min_length: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<OptionalFieldRequest> for OptionalFieldDefinition {
    fn from(req: OptionalFieldRequest) -> Self {
        Self {
            name: req.name,
            key: req.key,
            field_type: req.field_type,
            is_required: req.is_required,
            default_value: req.default,
            max_length: req.max_length,
            min_length: req.min_length,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionalFieldResponse {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_required: bool,
    pub default: Option<String>,
    pub max_length: Option<i32>,
    pub min_length: Option<i32>,
    pub is_active: bool,
}

impl From<&OptionalField> for OptionalFieldResponse {
    fn from(field: &OptionalField) -> Self {
        Self {
            id: field.id,
            name: field.name.clone(),
            key: field.key.clone(),
            field_type: field.field_type,
            is_required: field.is_required,
            default: field.default_value.clone(),
            max_length: field.max_length,
            min_length: field.min_length,
            is_active: field.is_active,
        }
    }
}

/// `?is_active=true` limits the list to descriptors accepting new values
#[derive(Debug, Default, Deserialize)]
pub struct OptionalFieldQuery {
    pub is_active: Option<bool>,
}

/// GET /api/optional-fields
pub async fn list_optional_fields(
    State(state): State<AppState>,
    Query(query): Query<OptionalFieldQuery>,
) -> Result<Json<Vec<OptionalFieldResponse>>, ApiError> {
    let fields = PostgresOptionalFieldRepository::new(state.pool.clone())
        .list(query.is_active.unwrap_or(false))
        .await?;
    Ok(Json(fields.iter().map(OptionalFieldResponse::from).collect()))
}

/// GET /api/optional-fields/:id
pub async fn get_optional_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OptionalFieldResponse>, ApiError> {
    let field = PostgresOptionalFieldRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("OptionalField not found"))?;
    Ok(Json(OptionalFieldResponse::from(&field)))
}

/// POST /api/optional-fields
pub async fn create_optional_field(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<OptionalFieldRequest>,
) -> Result<(StatusCode, Json<OptionalFieldResponse>), ApiError> {
    let field = OptionalField::new(req.into())?;
    PostgresOptionalFieldRepository::new(state.pool.clone())
        .create(&field)
        .await?;

    info!(optional_field_id = %field.id, key = %field.key, "OptionalField created");
    Ok((StatusCode::CREATED, Json(OptionalFieldResponse::from(&field))))
}

/// PUT /api/optional-fields/:id
///
/// Values already attached to listings are not re-checked.
pub async fn update_optional_field(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<OptionalFieldRequest>,
) -> Result<Json<OptionalFieldResponse>, ApiError> {
    let repo = PostgresOptionalFieldRepository::new(state.pool.clone());
    let mut field = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("OptionalField not found"))?;

    field.update(req.into())?;
    repo.update(&field).await?;

    info!(optional_field_id = %id, "OptionalField updated");
    Ok(Json(OptionalFieldResponse::from(&field)))
}

/// DELETE /api/optional-fields/:id
pub async fn delete_optional_field(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresOptionalFieldRepository::new(state.pool.clone())
        .delete(id)
        .await?;

    info!(optional_field_id = %id, "OptionalField deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_names() {
        let req: OptionalFieldRequest = serde_json::from_value(serde_json::json!({
            "name": "Salary",
            "key": "salary",
            "type": "integer",
            "default": "0"
        }))
        .unwrap();

        assert_eq!(req.field_type, FieldType::Integer);
        assert!(req.is_active);
        assert!(!req.is_required);

        let field = OptionalField::new(req.into()).unwrap();
        let json = serde_json::to_value(OptionalFieldResponse::from(&field)).unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["default"], "0");
    }
}
