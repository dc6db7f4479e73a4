//! Pluggable storage for uploaded files using Apache OpenDAL.
//!
//! Two backends implement [`StorageBackend`]:
//! - [`LocalFsBackend`]: files under a local directory, linked through the
//!   `/static` endpoint
//! - [`ObjectStoreBackend`]: an S3-compatible bucket under a fixed key prefix,
//!   linked by presigned or public URL
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      StorageBackend                          │
//! │        upload(StoredObject) -> UploadResult { url }          │
//! │        base_path() -> Option<&Path>                          │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │ LocalFsBackend               │ ObjectStoreBackend            │
//! │ op.write("a/b")              │ op.write("prefix/a/b")        │
//! │ url = endpoint + "/a/b"      │ url = presign_read(key, ttl)  │
//! └──────────────────────────────┴───────────────────────────────┘
//! ```

mod error;
mod local;
mod object_store;
mod path;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use imgdrop_shared::{BackendKind, StorageConfig};

pub use error::{StorageError, StorageResult};
pub use local::LocalFsBackend;
pub use object_store::ObjectStoreBackend;
pub use path::ObjectPath;

/// Bytes to persist and where to put them.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// File content.
    pub content: Bytes,
    /// Location below the backend root.
    pub path: ObjectPath,
    /// Declared MIME type.
    pub content_type: String,
}

impl StoredObject {
    /// Create a stored object.
    #[must_use]
    pub fn new(content: impl Into<Bytes>, path: ObjectPath, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            path,
            content_type: content_type.into(),
        }
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// URL that resolves to the stored bytes.
    pub url: String,
    /// When the URL stops working, for presigned URLs.
    pub expires_at: Option<DateTime<Utc>>,
}

impl UploadResult {
    /// A URL that does not expire.
    #[must_use]
    pub fn permanent(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expires_at: None,
        }
    }
}

/// Persists uploaded bytes and produces an access URL for them.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store the object and return a URL resolving to it.
    ///
    /// Nothing is retried and partial writes are not cleaned up.
    async fn upload(&self, object: StoredObject) -> StorageResult<UploadResult>;

    /// Local directory static requests are resolved against, if any.
    fn base_path(&self) -> Option<&Path>;

    /// Provider name.
    fn name(&self) -> &'static str;
}

/// Build the backend selected in `config`.
///
/// # Errors
///
/// Returns a configuration error if the selected backend is missing
/// required settings or its operator cannot be initialized.
pub fn build_backend(config: &StorageConfig) -> StorageResult<Arc<dyn StorageBackend>> {
    match config.backend {
        BackendKind::Local => {
            let base_dir = config
                .local
                .base_dir
                .as_ref()
                .ok_or_else(|| StorageError::configuration("local base directory is not set"))?;
            let endpoint = config
                .local
                .endpoint
                .as_deref()
                .ok_or_else(|| StorageError::configuration("local endpoint is not set"))?;
            let backend = LocalFsBackend::new(base_dir, endpoint)?;
            Ok(Arc::new(backend))
        }
        BackendKind::S3 => {
            let backend = ObjectStoreBackend::from_config(&config.s3)?;
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_local_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = StorageConfig::default();
        config.local.base_dir = Some(dir.path().to_path_buf());
        config.local.endpoint = Some("http://localhost:8080/static".to_string());

        let backend = build_backend(&config).expect("should build");
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.base_path(), Some(dir.path()));
    }

    #[test]
    fn test_build_local_backend_without_dir() {
        let config = StorageConfig::default();
        let err = build_backend(&config).err().expect("should fail");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_build_local_backend_without_endpoint() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = StorageConfig::default();
        config.local.base_dir = Some(dir.path().to_path_buf());

        let err = build_backend(&config).err().expect("should fail");
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_build_s3_backend() {
        let mut config = StorageConfig {
            backend: BackendKind::S3,
            ..StorageConfig::default()
        };
        config.s3.bucket = Some("images".to_string());

        let backend = build_backend(&config).expect("should build");
        assert_eq!(backend.name(), "s3");
        assert!(backend.base_path().is_none());
    }

    #[test]
    fn test_build_s3_backend_without_bucket() {
        let config = StorageConfig {
            backend: BackendKind::S3,
            ..StorageConfig::default()
        };
        let err = build_backend(&config).err().expect("should fail");
        assert!(matches!(err, StorageError::Configuration(_)));
    }
}
