//! Upload service implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::data_url::DataUrl;
use super::error::UploadError;
use crate::storage::{ObjectPath, StorageBackend, StoredObject};

/// A file accepted and stored by [`UploadService`].
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Generated identifier.
    pub id: Uuid,
    /// URL resolving to the stored bytes.
    pub url: String,
    /// When the URL stops working, for presigned URLs.
    pub url_expires_at: Option<DateTime<Utc>>,
    /// When the upload completed.
    pub uploaded_at: DateTime<Utc>,
    /// Declared MIME type.
    pub content_type: String,
    /// Decoded size in bytes.
    pub size: usize,
}

/// Decodes data URLs and hands them to the active storage backend.
pub struct UploadService {
    backend: Arc<dyn StorageBackend>,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// The backend uploads are delegated to.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Decode `content` and store it as `<uuid>.<subtype>`.
    ///
    /// Every call generates a new identifier, so identical content uploaded
    /// twice becomes two objects.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `content` is not a valid data URL
    /// - the storage backend fails
    pub async fn upload_data_url(&self, content: &str) -> Result<UploadedFile, UploadError> {
        let data_url = DataUrl::parse(content)?;

        let id = Uuid::new_v4();
        let content_type = data_url.content_type();
        let filename = format!("{id}.{}", data_url.subtype());
        let path = ObjectPath::new([filename])?;

        let data = data_url.into_data();
        let size = data.len();
        debug!(
            id = %id,
            content_type = %content_type,
            size,
            backend = self.backend.name(),
            "Storing upload"
        );

        let result = self
            .backend
            .upload(StoredObject::new(data, path, content_type.clone()))
            .await?;

        Ok(UploadedFile {
            id,
            url: result.url,
            url_expires_at: result.expires_at,
            uploaded_at: Utc::now(),
            content_type,
            size,
        })
    }
}
