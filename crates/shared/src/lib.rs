//! Shared configuration for imgdrop.
//!
//! This crate provides the types every other crate reads at startup:
//! - Server and storage configuration
//! - Configuration errors

pub mod config;
pub mod error;


pub use config::{
    AppConfig, BackendKind, LocalStorageConfig, S3StorageConfig, ServerConfig, StorageConfig,
    UrlStrategy,
};
pub use error::ConfigError;
