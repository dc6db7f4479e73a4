//! Upload error types.

use thiserror::Error;

use super::data_url::DataUrlError;
use crate::storage::StorageError;

/// Upload operation errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Content is not a usable data URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(#[from] DataUrlError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
