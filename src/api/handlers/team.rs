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
use crate::domain::repositories::TeamDirectoryRepository;
use crate::domain::team::{TeamMember, TeamMemberDraft, TeamRole};
use crate::infrastructure::repositories::PostgresTeamDirectoryRepository;

#[derive(Debug, Deserialize)]
pub struct TeamRoleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TeamRoleResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&TeamRole> for TeamRoleResponse {
    fn from(role: &TeamRole) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
        }
    }
}

/// Request body for creating or replacing a team member
#[derive(Debug, Deserialize)]
pub struct TeamMemberRequest {
    pub name: String,
    pub description: Option<String>,
    /// Stored media path of the portrait
    pub photo: String,
    pub role: Uuid,
}

impl From<TeamMemberRequest> for TeamMemberDraft {
    fn from(req: TeamMemberRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            photo: req.photo,
            role_id: req.role,
        }
    }
}

/// Directory entry with its role nested
#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub photo: String,
    pub role: TeamRoleResponse,
    pub date_create: DateTime<Utc>,
    pub date_update: DateTime<Utc>,
}

impl TeamMemberResponse {
    fn new(member: &TeamMember, role: &TeamRole) -> Self {
        Self {
            id: member.id(),
            name: member.name().to_string(),
            description: member.description().to_string(),
            photo: member.photo().to_string(),
            role: TeamRoleResponse::from(role),
            date_create: member.created_at(),
            date_update: member.updated_at(),
        }
    }
}

async fn require_role(
    repo: &PostgresTeamDirectoryRepository,
    role_id: Uuid,
) -> Result<TeamRole, ApiError> {
    repo.find_role(role_id)
        .await?
        .ok_or_else(|| ApiError::validation("role", "Team role does not exist"))
}

// ===== Members =====

/// GET /api/team
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamMemberResponse>>, ApiError> {
    let members = PostgresTeamDirectoryRepository::new(state.pool.clone())
        .list_members()
        .await?;
    Ok(Json(
        members
            .iter()
            .map(|(member, role)| TeamMemberResponse::new(member, role))
            .collect(),
    ))
}

/// GET /api/team/:id
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamMemberResponse>, ApiError> {
    let (member, role) = PostgresTeamDirectoryRepository::new(state.pool.clone())
        .find_member(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;
    Ok(Json(TeamMemberResponse::new(&member, &role)))
}

/// POST /api/team
pub async fn create_member(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<TeamMemberRequest>,
) -> Result<(StatusCode, Json<TeamMemberResponse>), ApiError> {
    let repo = PostgresTeamDirectoryRepository::new(state.pool.clone());
    let role = require_role(&repo, req.role).await?;

    let member = TeamMember::new(req.into())?;
    repo.create_member(&member).await?;

    info!(member_id = %member.id(), "Team member created");
    Ok((StatusCode::CREATED, Json(TeamMemberResponse::new(&member, &role))))
}

/// PUT /api/team/:id
pub async fn update_member(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TeamMemberRequest>,
) -> Result<Json<TeamMemberResponse>, ApiError> {
    let repo = PostgresTeamDirectoryRepository::new(state.pool.clone());
    let (mut member, _) = repo
        .find_member(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team member not found"))?;
    let role = require_role(&repo, req.role).await?;

    member.update(req.into())?;
    repo.update_member(&member).await?;

    info!(member_id = %id, "Team member updated");
    Ok(Json(TeamMemberResponse::new(&member, &role)))
}

/// DELETE /api/team/:id
pub async fn delete_member(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresTeamDirectoryRepository::new(state.pool.clone())
        .delete_member(id)
        .await?;

    info!(member_id = %id, "Team member deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ===== Roles =====

/// GET /api/team-roles
pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamRoleResponse>>, ApiError> {
    let roles = PostgresTeamDirectoryRepository::new(state.pool.clone())
        .list_roles()
        .await?;
    Ok(Json(roles.iter().map(TeamRoleResponse::from).collect()))
}

/// GET /api/team-roles/:id
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamRoleResponse>, ApiError> {
    let role = PostgresTeamDirectoryRepository::new(state.pool.clone())
        .find_role(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team role not found"))?;
    Ok(Json(TeamRoleResponse::from(&role)))
}

/// POST /api/team-roles
pub async fn create_role(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    ApiJson(req): ApiJson<TeamRoleRequest>,
) -> Result<(StatusCode, Json<TeamRoleResponse>), ApiError> {
    let role = TeamRole::new(&req.name)?;
    PostgresTeamDirectoryRepository::new(state.pool.clone())
        .create_role(&role)
        .await?;

    info!(role_id = %role.id, "Team role created");
    Ok((StatusCode::CREATED, Json(TeamRoleResponse::from(&role))))
}

/// PUT /api/team-roles/:id
pub async fn update_role(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TeamRoleRequest>,
) -> Result<Json<TeamRoleResponse>, ApiError> {
    let repo = PostgresTeamDirectoryRepository::new(state.pool.clone());
    let mut role = repo
        .find_role(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team role not found"))?;

    role.rename(&req.name)?;
    repo.update_role(&role).await?;

    info!(role_id = %id, "Team role updated");
    Ok(Json(TeamRoleResponse::from(&role)))
}

/// DELETE /api/team-roles/:id
///
/// Refused with 409 while members still hold the role.
pub async fn delete_role(
    State(state): State<AppState>,
    StaffAuth(_staff): StaffAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    PostgresTeamDirectoryRepository::new(state.pool.clone())
        .delete_role(id)
        .await?;

    info!(role_id = %id, "Team role deleted");
    Ok(StatusCode::NO_CONTENT)
}
