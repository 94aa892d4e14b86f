use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::UserResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::ApiJson;
use crate::api::state::AppState;
use crate::auth::jwt::{create_token_pair, TokenPair};
use crate::infrastructure::repositories::PostgresUserRepository;
use crate::services::SocialAuthService;

#[derive(Debug, Deserialize)]
pub struct SocialLoginRequest {
    pub code: String,
    pub social_media_type: String,
}

#[derive(Debug, Serialize)]
pub struct SocialLoginResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
    pub created: bool,
}

/// Sign in (or sign up) with a social provider authorization code
///
/// POST /api/auth/social-media
pub async fn social_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SocialLoginRequest>,
) -> Result<(StatusCode, Json<SocialLoginResponse>), ApiError> {
    if req.code.trim().is_empty() {
        return Err(ApiError::validation("code", "This field may not be blank."));
    }

    let users = PostgresUserRepository::new(state.pool.clone());
    let service = SocialAuthService::new(&users, state.oauth.as_ref());
    let outcome = service
        .login(req.social_media_type.trim(), req.code.trim())
        .await?;

    let tokens = create_token_pair(outcome.user.id, &state.config.token_settings())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    info!(
        user_id = %outcome.user.id,
        provider = %req.social_media_type,
        created = outcome.created,
        "Social login"
    );

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SocialLoginResponse {
            user: UserResponse::from(&outcome.user),
            tokens,
            created: outcome.created,
        }),
    ))
}
