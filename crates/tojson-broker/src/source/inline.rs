// crates/tojson-broker/src/source/inline.rs
// ============================================================================
// Module: Tojson Inline Source
// Description: Inline source for documents embedded in URIs.
// Purpose: Decode base64 documents carried by `inline:` URIs.
// Dependencies: base64
// ============================================================================

//! ## Overview
//! [`InlineSource`] resolves URIs that embed document bytes directly.
//! Supported prefixes: `inline+yaml:` and `inline:`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tojson_core::DocumentRef;

use crate::source::Source;
use crate::source::SourceError;
use crate::source::SourcePayload;
use crate::source::enforce_max_bytes;

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// Content type reported for `inline+yaml:` documents.
const YAML_CONTENT_TYPE: &str = "application/yaml";

/// Inline document source using base64-encoded payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineSource;

impl InlineSource {
    /// Creates a new inline source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decodes a base64-encoded payload.
    fn decode_base64(encoded: &str) -> Result<Vec<u8>, SourceError> {
        let bytes =
            STANDARD.decode(encoded.as_bytes()).map_err(|err| SourceError::Decode(err.to_string()))?;
        enforce_max_bytes(bytes.len())?;
        Ok(bytes)
    }
}

impl Source for InlineSource {
    fn fetch(&self, reference: &DocumentRef) -> Result<SourcePayload, SourceError> {
        let uri = reference.uri.as_str();
        if let Some(encoded) = uri.strip_prefix("inline+yaml:") {
            return Ok(SourcePayload {
                bytes: Self::decode_base64(encoded)?,
                content_type: Some(YAML_CONTENT_TYPE.to_string()),
            });
        }
        if let Some(encoded) = uri.strip_prefix("inline:") {
            return Ok(SourcePayload {
                bytes: Self::decode_base64(encoded)?,
                content_type: None,
            });
        }
        Err(SourceError::UnsupportedScheme(uri.split(':').next().unwrap_or_default().to_string()))
    }
}
