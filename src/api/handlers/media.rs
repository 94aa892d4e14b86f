use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::infrastructure::storage::{MediaError, MediaKind, StoredMedia};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Path to put into `photo`, `icon`, `image` or `file` members
    pub path: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

impl From<StoredMedia> for UploadResponse {
    fn from(media: StoredMedia) -> Self {
        Self {
            path: media.path,
            url: media.url,
            content_type: media.content_type,
            size: media.size,
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Empty | MediaError::NotAnImage(_) => Self::validation("file", err.to_string()),
            MediaError::TooLarge(_) => Self::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string()),
            MediaError::Io(e) => {
                error!(error = %e, "Failed to write upload");
                Self::internal_server_error("Failed to store upload")
            }
        }
    }
}

/// Upload a file or image
///
/// POST /api/media (multipart: `file`, optional `kind=image|file`)
pub async fn upload_media(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut kind = MediaKind::default();
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("kind") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.to_string()))?;
                kind = MediaKind::parse(&text)
                    .ok_or_else(|| ApiError::validation("kind", "Expected \"image\" or \"file\""))?;
            }
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, format!("Failed to read upload: {}", e))
                })?;
                file_bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::validation("file", "No file was submitted."))?;
    let stored = state
        .media
        .store(kind, file_name.as_deref(), content_type.as_deref(), &bytes)
        .await?;

    info!(user_id = %user.id, path = %stored.path, size = stored.size, "Upload stored");
    Ok((StatusCode::CREATED, Json(UploadResponse::from(stored))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_errors_map_to_statuses() {
        let empty: ApiError = MediaError::Empty.into();
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);
        assert!(empty.fields.unwrap().contains_key("file"));

        let large: ApiError = MediaError::TooLarge(10).into();
        assert_eq!(large.status, StatusCode::PAYLOAD_TOO_LARGE);

        let io: ApiError = MediaError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")).into();
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
