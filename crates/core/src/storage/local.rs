//! Local filesystem backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use opendal::{Operator, services};
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::path::ObjectPath;
use super::{StorageBackend, StoredObject, UploadResult};

/// Writes files below a local directory and links them through a static
/// serving endpoint.
///
/// Missing intermediate directories are created. Writing to an existing
/// path replaces the file.
#[derive(Debug, Clone)]
pub struct LocalFsBackend {
    operator: Operator,
    base_dir: PathBuf,
    endpoint: String,
}

impl LocalFsBackend {
    /// Create a backend rooted at `base_dir`, returning links below `endpoint`.
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not valid UTF-8 or the operator
    /// cannot be initialized.
    pub fn new(base_dir: impl Into<PathBuf>, endpoint: impl Into<String>) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        let root = base_dir
            .to_str()
            .ok_or_else(|| StorageError::configuration("invalid path"))?;

        let operator = Operator::new(services::Fs::default().root(root))
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self {
            operator,
            base_dir,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL prefix of returned links.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Link for `path` below the endpoint.
    #[must_use]
    pub fn url_for(&self, path: &ObjectPath) -> String {
        format!("{}/{}", self.endpoint, path.to_key())
    }

    /// File location of `path` on disk.
    #[must_use]
    pub fn file_path(&self, path: &ObjectPath) -> PathBuf {
        path.segments()
            .iter()
            .fold(self.base_dir.clone(), |acc, segment| acc.join(segment))
    }
}

#[async_trait]
impl StorageBackend for LocalFsBackend {
    async fn upload(&self, object: StoredObject) -> StorageResult<UploadResult> {
        let key = object.path.to_key();
        debug!(
            file = %self.file_path(&object.path).display(),
            size = object.content.len(),
            "Writing file"
        );

        self.operator.write(&key, object.content).await?;

        Ok(UploadResult::permanent(self.url_for(&object.path)))
    }

    fn base_path(&self) -> Option<&Path> {
        Some(self.base_dir.as_path())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ObjectPath {
        ObjectPath::new([name]).expect("valid path")
    }

    #[test]
    fn test_url_for_trims_endpoint_slash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend =
            LocalFsBackend::new(dir.path(), "http://localhost:8080/static/").expect("backend");

        assert_eq!(backend.endpoint(), "http://localhost:8080/static");
        assert_eq!(
            backend.url_for(&png("abc.png")),
            "http://localhost:8080/static/abc.png"
        );
    }

    #[test]
    fn test_file_path_joins_segments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalFsBackend::new(dir.path(), "http://host/static").expect("backend");
        let path = ObjectPath::new(["2024", "abc.png"]).expect("valid path");

        assert_eq!(
            backend.file_path(&path),
            dir.path().join("2024").join("abc.png")
        );
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalFsBackend::new(dir.path(), "http://host/static").expect("backend");

        let result = backend
            .upload(StoredObject::new(
                b"\x89PNG data".to_vec(),
                png("a.png"),
                "image/png",
            ))
            .await
            .expect("upload should succeed");

        assert_eq!(result.url, "http://host/static/a.png");
        assert!(result.expires_at.is_none());
        let written = std::fs::read(dir.path().join("a.png")).expect("file exists");
        assert_eq!(written, b"\x89PNG data");
    }

    #[tokio::test]
    async fn test_upload_creates_intermediate_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalFsBackend::new(dir.path(), "http://host/static").expect("backend");
        let path = ObjectPath::new(["nested", "deeper", "b.gif"]).expect("valid path");

        let result = backend
            .upload(StoredObject::new(b"GIF89a".to_vec(), path, "image/gif"))
            .await
            .expect("upload should succeed");

        assert_eq!(result.url, "http://host/static/nested/deeper/b.gif");
        assert!(dir.path().join("nested/deeper/b.gif").is_file());
    }

    #[tokio::test]
    async fn test_upload_overwrites_silently() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = LocalFsBackend::new(dir.path(), "http://host/static").expect("backend");

        for content in [b"first".to_vec(), b"second".to_vec()] {
            backend
                .upload(StoredObject::new(content, png("same.png"), "image/png"))
                .await
                .expect("upload should succeed");
        }

        let written = std::fs::read(dir.path().join("same.png")).expect("file exists");
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_upload_fails_when_root_unusable() {
        let parent = tempfile::tempdir().expect("tempdir");
        let root = parent.path().join("image");
        let backend = LocalFsBackend::new(&root, "http://host/static").expect("backend");

        // Replace the root directory with a regular file.
        std::fs::remove_dir_all(&root).expect("remove root");
        std::fs::write(&root, b"not a directory").expect("write file");

        let err = backend
            .upload(StoredObject::new(b"data".to_vec(), png("c.png"), "image/png"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Operation(_) | StorageError::NotFound { .. }));
        assert!(!root.join("c.png").exists());
    }
}
