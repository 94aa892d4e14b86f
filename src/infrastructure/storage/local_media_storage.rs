use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Folder an upload lands in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    #[default]
    File,
}

impl MediaKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::File => "file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image" => Some(MediaKind::Image),
            "file" => Some(MediaKind::File),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Upload is empty")]
    Empty,

    #[error("Upload exceeds the limit of {0} bytes")]
    TooLarge(usize),

    #[error("Expected an image, got {0}")]
    NotAnImage(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written to media storage
#[derive(Debug, Clone)]
pub struct StoredMedia {
    /// Path relative to the media root, e.g. `image/<uuid>.png`
    pub path: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

/// Stores uploads on the local filesystem under `<root>/<kind>/<uuid>.<ext>`
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    url_prefix: String,
    max_bytes: usize,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Public URL of a stored relative path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path.trim_start_matches('/'))
    }

    pub async fn store(
        &self,
        kind: MediaKind,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredMedia, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge(self.max_bytes));
        }

        let content_type = resolve_content_type(file_name, content_type);
        if kind == MediaKind::Image && !content_type.starts_with("image/") {
            return Err(MediaError::NotAnImage(content_type));
        }

        let name = match extension(file_name, &content_type) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let dir = self.root.join(kind.dir_name());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), bytes).await?;

        let path = format!("{}/{}", kind.dir_name(), name);
        tracing::debug!(path = %path, size = bytes.len(), "Stored upload");

        Ok(StoredMedia {
            url: self.url_for(&path),
            path,
            content_type,
            size: bytes.len(),
        })
    }
}

/// Declared content type, falling back to a guess from the file name
fn resolve_content_type(file_name: Option<&str>, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_ascii_lowercase(),
        _ => file_name
            .map(|name| mime_guess::from_path(name).first_or_octet_stream())
            .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
            .essence_str()
            .to_string(),
    }
}

/// Safe lowercase extension from the original name or the content type
fn extension(file_name: Option<&str>, content_type: &str) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.or_else(|| {
        mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_image_under_kind_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "/media/", 1024);

        let stored = storage
            .store(MediaKind::Image, Some("Logo.PNG"), Some("image/png"), b"png-bytes")
            .await
            .unwrap();

        assert!(stored.path.starts_with("image/"));
        assert!(stored.path.ends_with(".png"));
        assert_eq!(stored.url, format!("/media/{}", stored.path));
        let written = tokio::fs::read(dir.path().join(&stored.path)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn image_kind_rejects_other_content() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "/media", 1024);

        let err = storage
            .store(MediaKind::Image, Some("notes.txt"), None, b"hello")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage(ref ct) if ct == "text/plain"));
    }

    #[tokio::test]
    async fn rejects_oversized_and_empty_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "/media", 4);

        assert!(matches!(
            storage.store(MediaKind::File, Some("a.bin"), None, b"12345").await,
            Err(MediaError::TooLarge(4))
        ));
        assert!(matches!(
            storage.store(MediaKind::File, Some("a.bin"), None, b"").await,
            Err(MediaError::Empty)
        ));
    }

    #[test]
    fn unsafe_extensions_fall_back_to_content_type() {
        assert!(extension(Some("x.p$p"), "image/jpeg").is_some_and(|e| e != "p$p"));
        assert_eq!(extension(Some("report.PDF"), "application/pdf").as_deref(), Some("pdf"));
        assert_eq!(extension(None, "application/x-unknown-thing"), None);
    }

    #[test]
    fn media_kind_parses_form_values() {
        assert_eq!(MediaKind::parse("Image"), Some(MediaKind::Image));
        assert_eq!(MediaKind::parse("file"), Some(MediaKind::File));
        assert_eq!(MediaKind::parse("video"), None);
    }
}
