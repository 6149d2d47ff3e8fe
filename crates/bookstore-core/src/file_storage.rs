//! File storage for uploaded book covers.
//!
//! Business logic talks to [`FileStorage`]; [`LocalFileStorage`] keeps the
//! files on disk and serves them through the `/files` static route.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("./storage/covers"),
//!     "http://localhost:3000/files".to_string(),
//!     5 * 1024 * 1024,
//! );
//!
//! let key = storage.save("covers/3f1c-cover.png", &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::fs;

use crate::errors::AppError;

/// MIME types accepted for cover images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub trait FileStorage: Send + Sync {
    /// Stores `content` under `key` and returns the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Removes the file. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Largest accepted upload in bytes.
    fn max_file_size(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", ALLOWED_IMAGE_TYPES.join(", "))]
    InvalidMimeType { received: String },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("File storage I/O failed")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let status = match &err {
            StorageError::InvalidFileSize { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            StorageError::InvalidMimeType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err)
    }
}

/// Checks a declared content type against [`ALLOWED_IMAGE_TYPES`].
pub fn validate_image_type(content_type: &str) -> Result<(), StorageError> {
    if ALLOWED_IMAGE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(StorageError::InvalidMimeType {
            received: content_type.to_string(),
        })
    }
}

/// Reduces an uploaded file name to characters accepted in a storage key.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    /// Public URL prefix, e.g. `http://localhost:3000/files`
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Rejects keys that could escape the base directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            tracing::debug!(key = %key, size = content.len(), "Stored file");
            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &std::path::Path) -> LocalFileStorage {
        LocalFileStorage::new(
            dir.to_path_buf(),
            "http://localhost:3000/files/".to_string(),
            16,
        )
    }

    #[test]
    fn test_validate_key() {
        assert!(LocalFileStorage::validate_key("covers/abc-123.png").is_ok());
        assert!(LocalFileStorage::validate_key("../../etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("/etc/passwd").is_err());
        assert!(LocalFileStorage::validate_key("\\windows").is_err());
        assert!(LocalFileStorage::validate_key("covers/a b.png").is_err());
        assert!(LocalFileStorage::validate_key("").is_err());
    }

    #[test]
    fn test_get_url_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let url = storage(dir.path()).get_url("covers/a.png").unwrap();
        assert_eq!(url, "http://localhost:3000/files/covers/a.png");
    }

    #[test]
    fn test_validate_image_type() {
        assert!(validate_image_type("image/png").is_ok());
        assert!(validate_image_type("image/jpeg").is_ok());
        assert!(validate_image_type("image/gif").is_ok());
        assert!(matches!(
            validate_image_type("application/pdf"),
            Err(StorageError::InvalidMimeType { .. })
        ));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("cover.png"), "cover.png");
        assert_eq!(sanitize_file_name("../../evil.png"), "evil.png");
        assert_eq!(sanitize_file_name("my cover (1).jpg"), "my_cover__1_.jpg");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn test_storage_error_status() {
        let err: AppError = StorageError::InvalidFileSize { max_bytes: 1 }.into();
        assert_eq!(err.status, StatusCode::PAYLOAD_TOO_LARGE);
        let err: AppError = StorageError::InvalidMimeType {
            received: "text/plain".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let key = storage.save("covers/a.png", b"png-bytes").await.unwrap();
        assert_eq!(key, "covers/a.png");
        assert_eq!(
            std::fs::read(dir.path().join("covers/a.png")).unwrap(),
            b"png-bytes"
        );

        storage.delete(&key).await.unwrap();
        assert!(!dir.path().join("covers/a.png").exists());
        // deleting again is a no-op
        storage.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let result = storage(dir.path()).save("covers/big.png", &[0u8; 17]).await;
        assert!(matches!(
            result,
            Err(StorageError::InvalidFileSize { max_bytes: 16 })
        ));
    }
}
