// crates/tojson-broker/src/source/http.rs
// ============================================================================
// Module: Tojson HTTP Source
// Description: HTTP-backed source for `yaml-url` documents.
// Purpose: Fetch document bytes via HTTP GET through the transport seam.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`HttpSource`] resolves `http://` and `https://` URIs into document bytes
//! using an injected [`HttpTransport`]. Non-success status codes and
//! redirects fail closed.
//! Security posture: treats remote content as untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tojson_core::DocumentRef;
use url::Url;

use crate::source::Source;
use crate::source::SourceError;
use crate::source::SourcePayload;
use crate::source::enforce_max_bytes;
use crate::transport::ApiRequest;
use crate::transport::HttpTransport;

// ============================================================================
// SECTION: HTTP Source
// ============================================================================

/// HTTP-backed document source.
#[derive(Clone)]
pub struct HttpSource {
    /// Transport used for fetch requests.
    transport: Arc<dyn HttpTransport>,
}

impl HttpSource {
    /// Creates an HTTP source over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
        }
    }
}

impl Source for HttpSource {
    fn fetch(&self, reference: &DocumentRef) -> Result<SourcePayload, SourceError> {
        let url = Url::parse(&reference.uri).map_err(|err| SourceError::InvalidUri(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(SourceError::UnsupportedScheme(scheme.to_string())),
        }
        let request = ApiRequest::get(url.as_str());
        let response =
            self.transport.send(&request).map_err(|err| SourceError::Http(err.to_string()))?;
        if !response.is_success() {
            return Err(SourceError::Http(format!("http status {}", response.status)));
        }
        enforce_max_bytes(response.body.len())?;
        Ok(SourcePayload {
            bytes: response.body,
            content_type: response.content_type,
        })
    }
}
