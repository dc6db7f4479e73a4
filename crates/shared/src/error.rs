//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config files or environment could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Object store selected without a bucket.
    #[error("bucket is empty; set --bucket or AWS_S3_BUCKET")]
    MissingBucket,

    /// Local backend selected without a base directory.
    #[error("local storage base directory is not set")]
    MissingBaseDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::MissingBucket.to_string(),
            "bucket is empty; set --bucket or AWS_S3_BUCKET"
        );
        assert_eq!(
            ConfigError::MissingBaseDir.to_string(),
            "local storage base directory is not set"
        );
    }
}
