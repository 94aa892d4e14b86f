use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, CurrentUser};
use crate::api::state::AppState;
use crate::auth::jwt::{create_token_pair, verify_token, TokenPair, TokenType};
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::domain::repositories::UserRepository;
use crate::domain::user::{AuthType, Email, Phone, User};
use crate::infrastructure::repositories::PostgresUserRepository;

/// Public view of an account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub about: String,
    pub photo: Option<String>,
    pub auth_type: AuthType,
    pub is_agree_terms: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            phone: user.phone.as_ref().map(|p| p.as_str().to_string()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            about: user.about.clone(),
            photo: user.photo.clone(),
            auth_type: user.auth_type,
            is_agree_terms: user.is_agree_terms,
            is_staff: user.is_staff,
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}

/// An account together with freshly issued tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_agree_terms: bool,
}

/// Request body for user login
///
/// `login` is an e-mail address or a phone number.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "phone", alias = "email")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Partial profile update; absent members are left as they are
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    /// An empty string removes the phone number
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    pub photo: Option<String>,
    pub is_agree_terms: Option<bool>,
    pub password: Option<String>,
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::new(raw).map_err(|e| ApiError::validation("email", e))
}

fn parse_phone(raw: Option<&str>) -> Result<Option<Phone>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Phone::new(raw).map(Some).map_err(|e| ApiError::validation("phone", e)),
    }
}

fn hash_new_password(password: &str) -> Result<String, ApiError> {
    validate_password(password).map_err(|e| ApiError::validation("password", e))?;
    hash_password(password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))
}

fn issue_tokens(state: &AppState, user: &User) -> Result<TokenPair, ApiError> {
    create_token_pair(user.id, &state.config.token_settings())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = parse_email(&req.email)?;
    let phone = parse_phone(req.phone.as_deref())?;
    User::validate_names(&req.first_name, &req.last_name)
        .map_err(|(field, message)| ApiError::validation(field, message))?;
    let password_hash = hash_new_password(&req.password)?;

    let mut user = User::with_password(email, phone, password_hash);
    user.first_name = req.first_name.trim().to_string();
    user.last_name = req.last_name.trim().to_string();
    user.is_agree_terms = req.is_agree_terms;

    // Unique e-mail/phone violations come back as field errors
    PostgresUserRepository::new(state.pool.clone())
        .create(&user)
        .await?;

    info!(user_id = %user.id, "User registered");

    let tokens = issue_tokens(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            tokens,
        }),
    ))
}

/// Login with e-mail or phone and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user_repo = PostgresUserRepository::new(state.pool.clone());

    let login = req.login.trim();
    let found = if login.contains('@') {
        match Email::new(login) {
            Ok(email) => user_repo.find_by_email(&email).await?,
            Err(_) => None,
        }
    } else {
        match Phone::new(login) {
            Ok(phone) => user_repo.find_by_phone(&phone).await?,
            Err(_) => None,
        }
    };
    let mut user = found.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    // Check if user is active
    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    // Social accounts have no password to check
    let hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    let valid = verify_password(&req.password, hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        warn!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    // Update last login
    if let Err(e) = user_repo.update_last_login(user.id).await {
        warn!(user_id = %user.id, error = %e, "Failed to record last login");
    } else {
        user.last_login = Some(Utc::now());
    }

    let tokens = issue_tokens(&state, &user)?;
    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        tokens,
    }))
}

/// Exchange a refresh token for a new pair
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let claims = verify_token(&req.refresh, TokenType::Refresh, &state.config.jwt_secret)
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

    let user = PostgresUserRepository::new(state.pool.clone())
        .find_by_id(claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::unauthorized("Account is disabled or no longer exists"))?;

    Ok(Json(issue_tokens(&state, &user)?))
}

/// GET /api/auth/profile
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Update the caller's own profile
///
/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(email) = req.email.as_deref() {
        user.email = parse_email(email)?;
    }
    if req.phone.is_some() {
        user.phone = parse_phone(req.phone.as_deref())?;
    }
    if let Some(first_name) = req.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = req.last_name {
        user.last_name = last_name.trim().to_string();
    }
    User::validate_names(&user.first_name, &user.last_name)
        .map_err(|(field, message)| ApiError::validation(field, message))?;
    if let Some(about) = req.about {
        user.about = about;
    }
    if let Some(photo) = req.photo {
        user.photo = Some(photo).filter(|p| !p.trim().is_empty());
    }
    if let Some(agree) = req.is_agree_terms {
        user.is_agree_terms = agree;
    }
    if let Some(password) = req.password.as_deref() {
        user.password_hash = Some(hash_new_password(password)?);
    }

    PostgresUserRepository::new(state.pool.clone())
        .update(&user)
        .await?;

    info!(user_id = %user.id, "Profile updated");
    Ok(Json(UserResponse::from(&user)))
}

/// Delete the caller's account
///
/// DELETE /api/auth/profile
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    PostgresUserRepository::new(state.pool.clone())
        .delete(user.id)
        .await?;

    info!(user_id = %user.id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
