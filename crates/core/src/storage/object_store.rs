//! S3-compatible object store backend.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use imgdrop_shared::{S3StorageConfig, UrlStrategy};
use opendal::{Operator, services};
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::path::ObjectPath;
use super::{StorageBackend, StoredObject, UploadResult};

/// Uploads into a bucket below a fixed key prefix.
///
/// Access URLs are presigned reads by default. [`UrlStrategy::Public`] returns
/// the canonical object location instead, which only resolves when the bucket
/// is publicly readable.
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    operator: Operator,
    bucket: String,
    key_prefix: String,
    url_strategy: UrlStrategy,
    presign_ttl: Duration,
    public_base: String,
}

impl ObjectStoreBackend {
    /// Default presigned URL lifetime: 5 minutes.
    pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(300);

    /// Create an S3 backend from configuration.
    ///
    /// Credentials fall back to the usual AWS environment sources when no
    /// static keys are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket is missing or the operator cannot be
    /// initialized.
    pub fn from_config(config: &S3StorageConfig) -> StorageResult<Self> {
        let bucket = config
            .bucket
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| StorageError::configuration("bucket is empty"))?;

        let mut builder = services::S3::default()
            .root("/")
            .bucket(bucket)
            .region(&config.region);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            builder = builder.access_key_id(key).secret_access_key(secret);
        }

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        let public_base = match &config.endpoint {
            Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            None => format!("https://{bucket}.s3.{}.amazonaws.com", config.region),
        };

        Ok(Self::with_operator(operator, bucket, &config.key_prefix)
            .with_url_strategy(config.url_strategy)
            .with_presign_ttl(Duration::from_secs(config.presign_ttl_secs))
            .with_public_base(public_base))
    }

    /// Create a backend over an existing operator.
    ///
    /// Defaults to presigned URLs with [`Self::DEFAULT_PRESIGN_TTL`].
    #[must_use]
    pub fn with_operator(
        operator: Operator,
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        let bucket = bucket.into();
        Self {
            operator,
            public_base: format!("https://{bucket}.s3.amazonaws.com"),
            bucket,
            key_prefix: key_prefix.into().trim_matches('/').to_string(),
            url_strategy: UrlStrategy::Presigned,
            presign_ttl: Self::DEFAULT_PRESIGN_TTL,
        }
    }

    /// Set the access URL strategy.
    #[must_use]
    pub fn with_url_strategy(mut self, strategy: UrlStrategy) -> Self {
        self.url_strategy = strategy;
        self
    }

    /// Set presigned URL lifetime.
    #[must_use]
    pub fn with_presign_ttl(mut self, ttl: Duration) -> Self {
        self.presign_ttl = ttl;
        self
    }

    /// Set the base of canonical object URLs.
    #[must_use]
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix, without surrounding slashes.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Full object key for `path`.
    #[must_use]
    pub fn object_key(&self, path: &ObjectPath) -> String {
        path.under(&self.key_prefix)
    }

    /// Canonical location of `key`.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base)
    }

    /// Access URL for an already stored `key` using the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if presigning fails or is unsupported by the operator.
    pub async fn access_url(&self, key: &str) -> StorageResult<UploadResult> {
        match self.url_strategy {
            UrlStrategy::Public => Ok(UploadResult::permanent(self.public_url(key))),
            UrlStrategy::Presigned => {
                let presigned = self.operator.presign_read(key, self.presign_ttl).await?;
                let expires_at = chrono::Duration::from_std(self.presign_ttl)
                    .ok()
                    .and_then(|ttl| Utc::now().checked_add_signed(ttl));

                Ok(UploadResult {
                    url: presigned.uri().to_string(),
                    expires_at,
                })
            }
        }
    }
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    async fn upload(&self, object: StoredObject) -> StorageResult<UploadResult> {
        let key = self.object_key(&object.path);
        debug!(
            bucket = %self.bucket,
            key = %key,
            size = object.content.len(),
            content_type = %object.content_type,
            "Uploading object"
        );

        let capability = self.operator.info().full_capability();
        let mut write = self.operator.write_with(&key, object.content);
        if capability.write_with_content_type {
            write = write.content_type(&object.content_type);
        }
        write.await?;

        self.access_url(&key).await
    }

    fn base_path(&self) -> Option<&Path> {
        None
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
