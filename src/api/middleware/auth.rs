use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::{verify_token, TokenType};
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;
use crate::infrastructure::repositories::PostgresUserRepository;
use crate::services::Actor;

/// JWT authentication extractor for protected routes
///
/// Accepts only access tokens; refresh tokens are rejected.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(user_id): JwtAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
pub struct JwtAuth(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        // Extract the authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        // Extract bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

        let claims = verify_token(token, TokenType::Access, &state.config.jwt_secret).map_err(|e| {
            warn!(error = %e, "Rejected bearer token");
            ApiError::unauthorized(format!("Invalid token: {}", e))
        })?;

        Ok(JwtAuth(claims.sub))
    }
}

/// The authenticated, active user behind the bearer token
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::from_user(&self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(user_id) = JwtAuth::from_request_parts(parts, state).await?;
        let state = AppState::from_ref(state);

        let user = PostgresUserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active {
            warn!(user_id = %user_id, "Inactive user presented a token");
            return Err(ApiError::unauthorized("Account is disabled"));
        }

        Ok(CurrentUser(user))
    }
}

/// Like [`CurrentUser`] but only lets staff through
pub struct StaffAuth(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for StaffAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(ApiError::forbidden("Staff privileges required"));
        }
        Ok(StaffAuth(user))
    }
}
