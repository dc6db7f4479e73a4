//! Validated object paths.

use std::fmt;

use super::error::{StorageError, StorageResult};

/// Ordered, non-empty sequence of path segments below a backend root.
///
/// Every segment is a single plain name: no separators, no `.` or `..`, no
/// control characters. A path built from these can never resolve outside the
/// directory or key prefix it is joined onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    segments: Vec<String>,
}

impl ObjectPath {
    /// Build a path from segments.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidPath`] if the sequence is empty or any
    /// segment is not a plain name.
    pub fn new<I, S>(segments: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(StorageError::invalid_path("path has no segments"));
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// The individual segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Relative key, segments joined with `/`.
    #[must_use]
    pub fn to_key(&self) -> String {
        self.segments.join("/")
    }

    /// Key below `prefix`. Surrounding slashes on the prefix are ignored.
    #[must_use]
    pub fn under(&self, prefix: &str) -> String {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            self.to_key()
        } else {
            format!("{prefix}/{}", self.to_key())
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

fn validate_segment(segment: &str) -> StorageResult<()> {
    if segment.is_empty() {
        return Err(StorageError::invalid_path("empty path segment"));
    }
    if segment == "." || segment == ".." {
        return Err(StorageError::invalid_path(format!(
            "relative segment '{segment}'"
        )));
    }
    if let Some(c) = segment
        .chars()
        .find(|c| *c == '/' || *c == '\\' || c.is_control())
    {
        return Err(StorageError::invalid_path(format!(
            "segment '{}' contains forbidden character {c:?}",
            segment.escape_debug()
        )));
    }
    Ok(())
}
