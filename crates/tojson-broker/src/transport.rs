// crates/tojson-broker/src/transport.rs
// ============================================================================
// Module: Tojson HTTP Transport
// Description: HTTP client seam used by the GitHub sink and HTTP source.
// Purpose: Send bounded HTTP requests through an injectable interface.
// Dependencies: reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpTransport`] is the only path to the network. [`ReqwestTransport`]
//! implements it with a blocking reqwest client; tests substitute a mock.
//! Invariants:
//! - Redirects are never followed; a 3xx response fails closed.
//! - Response bodies are read with a hard byte limit.
//! - `Debug` output of a request never contains the `Authorization` value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = "tojson-action/0.1";
/// Default maximum response body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Requests and Responses
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound HTTP request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: String,
    /// Header name and value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Creates a `GET` request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a `POST` request with a body.
    #[must_use]
    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header value matching `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "***")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// `Content-Type` header, when present.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response with no content type.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Connection or protocol failure.
    #[error("http failure: {0}")]
    Http(String),
    /// Server answered with a redirect.
    #[error("redirected from {from} to {to}")]
    Redirected {
        /// Requested URL.
        from: String,
        /// Redirect location.
        to: String,
    },
    /// Response body exceeded the configured limit.
    #[error("response exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Observed size in bytes.
        actual_bytes: usize,
    },
    /// No response is configured for the request.
    #[error("unexpected request: {method} {url}")]
    Unexpected {
        /// Request method.
        method: HttpMethod,
        /// Request URL.
        url: String,
    },
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Sends HTTP requests.
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the full response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request cannot be completed.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

// ============================================================================
// SECTION: Reqwest Transport
// ============================================================================

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReqwestTransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,
}

impl Default for ReqwestTransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// Blocking reqwest-backed transport.
///
/// The blocking client owns a runtime; create and drop it outside async
/// contexts.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client.
    client: Client,
    /// Response size limit.
    max_response_bytes: usize,
}

impl ReqwestTransport {
    /// Builds a transport from settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] when the client cannot be constructed.
    pub fn new(config: &ReqwestTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| TransportError::Http(err.to_string()))?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url =
            Url::parse(&request.url).map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let mut builder = self.client.request(method, url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send().map_err(|err| TransportError::Http(err.to_string()))?;
        let status = response.status();
        if status.is_redirection() {
            let to = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(TransportError::Redirected {
                from: url.to_string(),
                to,
            });
        }
        let max_bytes = u64::try_from(self.max_response_bytes).unwrap_or(u64::MAX);
        if let Some(length) = response.content_length()
            && length > max_bytes
        {
            return Err(TransportError::TooLarge {
                max_bytes: self.max_response_bytes,
                actual_bytes: usize::try_from(length).unwrap_or(usize::MAX),
            });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let limit = max_bytes.saturating_add(1);
        let mut limited = response.take(limit);
        let mut body = Vec::new();
        limited.read_to_end(&mut body).map_err(|err| TransportError::Http(err.to_string()))?;
        if body.len() > self.max_response_bytes {
            return Err(TransportError::TooLarge {
                max_bytes: self.max_response_bytes,
                actual_bytes: body.len(),
            });
        }
        Ok(ApiResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
