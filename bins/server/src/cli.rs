//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use imgdrop_shared::{AppConfig, BackendKind};

/// Command-line flags. Anything set here overrides config files and
/// `IMGDROP__*` environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "imgdrop")]
#[command(about = "Image upload server with pluggable storage")]
#[command(version)]
pub struct Cli {
    /// Use AWS S3 as the storage backend.
    #[arg(long)]
    pub s3: bool,

    /// S3 bucket name. Required with `--s3`.
    #[arg(long, env = "AWS_S3_BUCKET")]
    pub bucket: Option<String>,

    /// Directory the local backend writes to.
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply flag overrides onto loaded configuration, then derive the
    /// local link prefix from the final port.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.s3 {
            config.storage.backend = BackendKind::S3;
        }
        if let Some(bucket) = &self.bucket {
            config.storage.s3.bucket = Some(bucket.clone());
        }
        if let Some(base_dir) = &self.base_dir {
            config.storage.local.base_dir = Some(base_dir.clone());
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.resolve_local_endpoint();
    }
}
