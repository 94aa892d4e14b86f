use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::errors::{DomainError, RepositoryError};

/// API error type with HTTP status code and message
///
/// Validation failures also carry a map from request field to message,
/// rendered as `{"error": "...", "fields": {"<field>": "<message>"}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a 400 error pointing at one request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.into(), message.clone());
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
            fields: Some(fields),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "error": self.message, "fields": fields }),
            None => json!({ "error": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                Self::internal_server_error("Internal server error")
            }
            RepositoryError::NotFound(what) => Self::not_found(format!("{} not found", what)),
            RepositoryError::Conflict { field, message }
            | RepositoryError::InvalidReference { field, message } => Self::validation(field, message),
            RepositoryError::InUse(message) | RepositoryError::Stale(message) => Self::conflict(message),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::NotFound(what) => Self::not_found(format!("{} not found", what)),
            DomainError::Forbidden(message) => Self::forbidden(message),
            DomainError::Unauthorized(message) => Self::unauthorized(message),
            e @ DomainError::ExternalAuth(_) => Self::bad_request(e.to_string()),
            DomainError::Repository(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                let (field, message) = data_error_field(&e.body_text());
                Self::validation(field, message)
            }
            JsonRejection::JsonSyntaxError(_) => {
                Self::validation(NON_FIELD_ERRORS, "Malformed JSON body")
            }
            other => Self::new(other.status(), other.body_text()),
        }
    }
}

const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Splits a deserialization failure into the offending field path and a message
///
/// Handles the `path: message` and "missing field" forms; anything else
/// is reported under `non_field_errors`.
fn data_error_field(body_text: &str) -> (String, String) {
    let detail = body_text
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .unwrap_or(body_text);
    let detail = match detail.rfind(" at line ") {
        Some(idx) => &detail[..idx],
        None => detail,
    };

    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains([' ', '`']) => (Some(path), message),
        _ => (None, detail),
    };

    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name);

    let field = match (path, missing) {
        (Some(path), Some(name)) => format!("{}.{}", path, name),
        (None, Some(name)) => name.to_string(),
        (Some(path), None) => path.to_string(),
        (None, None) => NON_FIELD_ERRORS.to_string(),
    };
    let message = match missing {
        Some(_) => "This field is required".to_string(),
        None => message.to_string(),
    };

    (field, message)
}
