//! Upload coordination.
//!
//! Turns an inbound data URL into a stored object:
//! - Data URL decoding
//! - File extension from the media subtype
//! - Fresh identifier per upload
//! - Delegation to the active storage backend

mod data_url;
mod error;
mod service;

pub use data_url::{DataUrl, DataUrlError};
pub use error::UploadError;
pub use service::{UploadService, UploadedFile};
