//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which storage backend serves uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Files under a local directory, served back through `/static`.
    #[default]
    Local,
    /// S3-compatible object store.
    S3,
}

impl BackendKind {
    /// Provider name used in logs and health output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::S3 => "s3",
        }
    }
}

/// How the object store backend hands out access URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStrategy {
    /// Time-limited signed read URL. Works with private buckets.
    #[default]
    Presigned,
    /// Canonical object location. Only resolves for public buckets.
    Public,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Active backend.
    #[serde(default)]
    pub backend: BackendKind,
    /// Local filesystem settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// Object store settings.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl StorageConfig {
    /// Checks that the active backend has everything it needs to start.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBucket`] when the object store is selected
    /// without a bucket, and [`ConfigError::MissingBaseDir`] when the local
    /// backend has no directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            BackendKind::S3 => {
                let missing = self.s3.bucket.as_deref().is_none_or(str::is_empty);
                if missing {
                    return Err(ConfigError::MissingBucket);
                }
            }
            BackendKind::Local => {
                if self.local.base_dir.is_none() {
                    return Err(ConfigError::MissingBaseDir);
                }
            }
        }
        Ok(())
    }
}

/// Local filesystem storage settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalStorageConfig {
    /// Directory files are written to. The server defaults this to
    /// `<executable dir>/image` when unset.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// URL prefix for returned links. Derived from the listen port when
    /// unset, see [`AppConfig::resolve_local_endpoint`].
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// S3-compatible object store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct S3StorageConfig {
    /// Bucket name. Required when the S3 backend is active.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Key prefix every object is stored under.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Static access key. Resolved from the environment when unset.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Static secret key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Access URL strategy.
    #[serde(default)]
    pub url_strategy: UrlStrategy,
    /// Lifetime of presigned URLs in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_secs: u64,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            region: default_region(),
            endpoint: None,
            key_prefix: default_key_prefix(),
            access_key_id: None,
            secret_access_key: None,
            url_strategy: UrlStrategy::default(),
            presign_ttl_secs: default_presign_ttl(),
        }
    }
}

fn default_region() -> String {
    "ap-northeast-1".to_string()
}

fn default_key_prefix() -> String {
    "dev/image".to_string()
}

fn default_presign_ttl() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("IMGDROP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Fills in the local link prefix from the listen port when none was
    /// configured, so returned links point at this server's `/static` route.
    ///
    /// Call after every port override has been applied.
    pub fn resolve_local_endpoint(&mut self) {
        if self.storage.local.endpoint.is_none() {
            self.storage.local.endpoint =
                Some(format!("http://localhost:{}/static", self.server.port));
        }
    }
}
