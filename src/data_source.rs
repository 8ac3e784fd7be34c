//! A lazily-read, cached source document.
//!
//! Grounded on `DataSource` in `core/deserialization/data_source.py`,
//! whose `retrieved_data` is a `cached_property` over either in-memory
//! text or a file path. Rust has no cached-property sugar, so the
//! cache is an explicit `OnceCell`.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{TranslationError, TranslationResult};

enum Origin {
    InMemory(String),
    File(PathBuf),
}

/// A document to be deserialized, read once and cached regardless of
/// how many strategies probe it during format detection.
pub struct DataSource {
    origin: Origin,
    cached: OnceCell<String>,
}

impl DataSource {
    /// Wrap already-loaded text.
    pub fn from_str(data: impl Into<String>) -> Self {
        Self {
            origin: Origin::InMemory(data.into()),
            cached: OnceCell::new(),
        }
    }

    /// Wrap a file path, read lazily on first [`Self::content`] call.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
            cached: OnceCell::new(),
        }
    }

    /// The source's text content, reading from disk at most once.
    pub fn content(&self) -> TranslationResult<&str> {
        if let Some(cached) = self.cached.get() {
            return Ok(cached.as_str());
        }
        let data = match &self.origin {
            Origin::InMemory(s) => s.clone(),
            Origin::File(path) => fs::read_to_string(path).map_err(|err| TranslationError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })?,
        };
        Ok(self.cached.get_or_init(|| data).as_str())
    }

    /// The backing file path, if this source was constructed from one.
    pub fn file_path(&self) -> Option<&Path> {
        match &self.origin {
            Origin::File(path) => Some(path.as_path()),
            Origin::InMemory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_content_returned_verbatim() {
        let source = DataSource::from_str("<xmi/>");
        assert_eq!(source.content().unwrap(), "<xmi/>");
        assert!(source.file_path().is_none());
    }

    #[test]
    fn test_file_not_found_is_io_error() {
        let source = DataSource::from_path("/nonexistent/path/does-not-exist.xmi");
        let err = source.content().unwrap_err();
        assert!(matches!(err, TranslationError::Io { .. }));
    }

    #[test]
    fn test_content_is_cached_across_calls() {
        let source = DataSource::from_str("data");
        assert_eq!(source.content().unwrap(), "data");
        assert_eq!(source.content().unwrap(), "data");
    }
}
