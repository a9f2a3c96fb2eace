// crates/tojson-broker/src/source/file.rs
// ============================================================================
// Module: Tojson File Source
// Description: File-backed source for `yaml-file` documents.
// Purpose: Read document bytes from local files.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! [`FileSource`] resolves `file://` URIs into document bytes. A root
//! directory (normally `GITHUB_WORKSPACE`) can be configured to fail closed
//! on path traversal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tojson_core::DocumentRef;
use url::Url;

use crate::source::Source;
use crate::source::SourceError;
use crate::source::SourcePayload;
use crate::source::enforce_max_bytes;
use crate::source::read_limit;

// ============================================================================
// SECTION: File Source
// ============================================================================

/// File-backed document source.
#[derive(Debug, Clone)]
pub struct FileSource {
    /// Optional root directory for path traversal protection.
    root: Option<PathBuf>,
}

impl FileSource {
    /// Creates a file source confined to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Creates a file source with no root restriction.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            root: None,
        }
    }

    /// Resolves a file URI into a local path.
    fn resolve_path(&self, uri: &str) -> Result<PathBuf, SourceError> {
        let url = Url::parse(uri).map_err(|err| SourceError::InvalidUri(err.to_string()))?;
        if url.scheme() != "file" {
            return Err(SourceError::UnsupportedScheme(url.scheme().to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|()| SourceError::InvalidUri("failed to map file url to path".to_string()))?;

        if let Some(root) = &self.root {
            let root = std::fs::canonicalize(root).map_err(|err| SourceError::Io(err.to_string()))?;
            let resolved = std::fs::canonicalize(&path).map_err(io_error)?;
            if !resolved.starts_with(&root) {
                return Err(SourceError::InvalidUri(
                    "file path escapes configured root".to_string(),
                ));
            }
            return Ok(resolved);
        }
        Ok(path)
    }

    /// Reads at most [`crate::source::MAX_SOURCE_BYTES`] plus one byte.
    fn read_with_limit(path: &Path) -> Result<Vec<u8>, SourceError> {
        let file = std::fs::File::open(path).map_err(io_error)?;
        let mut limited = file.take(read_limit());
        let mut bytes = Vec::new();
        limited.read_to_end(&mut bytes).map_err(|err| SourceError::Io(err.to_string()))?;
        enforce_max_bytes(bytes.len())?;
        Ok(bytes)
    }
}

impl Source for FileSource {
    fn fetch(&self, reference: &DocumentRef) -> Result<SourcePayload, SourceError> {
        let path = self.resolve_path(&reference.uri)?;
        let bytes = Self::read_with_limit(&path)?;
        Ok(SourcePayload {
            bytes,
            content_type: None,
        })
    }
}

/// Maps I/O errors, keeping not-found distinct.
fn io_error(err: std::io::Error) -> SourceError {
    if err.kind() == ErrorKind::NotFound {
        SourceError::NotFound(err.to_string())
    } else {
        SourceError::Io(err.to_string())
    }
}
