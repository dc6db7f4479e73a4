//! Core upload and storage logic for imgdrop.
//!
//! This crate contains the storage abstraction and everything needed to turn
//! an uploaded data URL into a stored object. It has no web dependencies.
//!
//! # Modules
//!
//! - `storage` - Storage backend trait with local filesystem and object store implementations
//! - `upload` - Data URL decoding and upload coordination

pub mod storage;
pub mod upload;
