// crates/tojson-broker/src/source/mod.rs
// ============================================================================
// Module: Tojson Broker Sources
// Description: Source trait and reference implementations for document loading.
// Purpose: Resolve document references into bounded byte payloads.
// Dependencies: tojson-core, thiserror
// ============================================================================

//! ## Overview
//! Sources fetch the documents named by the `yaml-file` and `yaml-url`
//! inputs. Implementations must fail closed on invalid URIs or fetch errors.
//! Security posture: all source inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tojson_core::DocumentRef;

// ============================================================================
// SECTION: Source Payload
// ============================================================================

/// Document bytes as fetched, before UTF-8 decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePayload {
    /// Document bytes.
    pub bytes: Vec<u8>,
    /// Media type reported by the source, if any.
    pub content_type: Option<String>,
}

/// Hard ceiling on any fetched document. Conversion limits apply later.
pub const MAX_SOURCE_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Source Errors
// ============================================================================

/// Document fetch failures.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source does not serve this URI scheme.
    #[error("unsupported document scheme: {0}")]
    UnsupportedScheme(String),
    /// The URI is malformed or points outside the allowed area.
    #[error("invalid document uri: {0}")]
    InvalidUri(String),
    /// The document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),
    /// Reading the document failed.
    #[error("document read failed: {0}")]
    Io(String),
    /// The HTTP fetch failed or returned a non-success status.
    #[error("document fetch failed: {0}")]
    Http(String),
    /// An `inline:` URI did not hold valid base64.
    #[error("inline document is not valid base64: {0}")]
    Decode(String),
    /// The document is larger than [`MAX_SOURCE_BYTES`].
    #[error("document exceeds {max_bytes} bytes ({actual_bytes} read)")]
    TooLarge {
        /// Ceiling in bytes.
        max_bytes: usize,
        /// Bytes read before giving up.
        actual_bytes: usize,
    },
}

/// Returns an error when a payload exceeds the size cap.
pub(crate) const fn enforce_max_bytes(actual_bytes: usize) -> Result<(), SourceError> {
    if actual_bytes > MAX_SOURCE_BYTES {
        return Err(SourceError::TooLarge {
            max_bytes: MAX_SOURCE_BYTES,
            actual_bytes,
        });
    }
    Ok(())
}

/// Returns the size cap plus one, as a read limit.
pub(crate) fn read_limit() -> u64 {
    u64::try_from(MAX_SOURCE_BYTES).unwrap_or(u64::MAX).saturating_add(1)
}

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// Resolves document references into payload bytes.
pub trait Source: Send + Sync {
    /// Fetches payload bytes for the reference.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the document cannot be resolved.
    fn fetch(&self, reference: &DocumentRef) -> Result<SourcePayload, SourceError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod file;
pub mod http;
pub mod inline;

pub use file::FileSource;
pub use http::HttpSource;
pub use inline::InlineSource;
