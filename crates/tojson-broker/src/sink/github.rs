// crates/tojson-broker/src/sink/github.rs
// ============================================================================
// Module: Tojson GitHub Sink
// Description: Sink delivering workflow and repository dispatches to GitHub.
// Purpose: Translate dispatch requests into GitHub REST API calls.
// Dependencies: serde_json, tojson-core
// ============================================================================

//! ## Overview
//! [`GithubSink`] posts `workflow_dispatch` and `repository_dispatch`
//! requests through an injected [`HttpTransport`]:
//! - `POST {api}/repos/{owner}/{repo}/actions/workflows/{workflow}/dispatches`
//!   with `{"ref": ..., "inputs": {...}}`
//! - `POST {api}/repos/{owner}/{repo}/dispatches`
//!   with `{"event_type": ..., "client_payload": {...}}`
//!
//! Non-2xx responses fail with [`SinkError::Rejected`].
//! Security posture: the token is sent only in the `Authorization` header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use serde_json::json;
use tojson_core::DispatchReceipt;
use tojson_core::DispatchRequest;
use tojson_core::DispatchTarget;
use tojson_core::PayloadError;
use tojson_core::Timestamp;

use crate::sink::ReceiptFactory;
use crate::sink::Sink;
use crate::sink::SinkError;
use crate::transport::ApiRequest;
use crate::transport::HttpTransport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Media type requested from the API.
const ACCEPT_HEADER: &str = "application/vnd.github+json";
/// Pinned REST API version.
const API_VERSION: &str = "2022-11-28";
/// Maximum characters of a response body quoted in errors.
const MAX_ERROR_BODY_CHARS: usize = 256;

// ============================================================================
// SECTION: GitHub Sink
// ============================================================================

/// GitHub REST API dispatch sink.
pub struct GithubSink {
    /// Transport used for API calls.
    transport: Arc<dyn HttpTransport>,
    /// API base URL without a trailing slash.
    api_url: String,
    /// Receipt factory for sequential dispatch IDs.
    receipts: ReceiptFactory,
}

impl GithubSink {
    /// Creates a sink posting to `api_url`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            api_url,
            receipts: ReceiptFactory::new("github"),
        }
    }

    /// Returns the endpoint and JSON body for `request`.
    fn endpoint(&self, request: &DispatchRequest) -> Result<(String, Value), SinkError> {
        let payload_error = |err: PayloadError| SinkError::DeliveryFailed(err.to_string());
        match &request.target {
            DispatchTarget::Workflow {
                repository,
                workflow,
                git_ref,
            } => {
                let inputs = request.payload.workflow_inputs().map_err(payload_error)?;
                let url = format!(
                    "{}/repos/{}/{}/actions/workflows/{}/dispatches",
                    self.api_url,
                    repository.owner(),
                    repository.name(),
                    workflow
                );
                Ok((
                    url,
                    json!({
                        "ref": git_ref.as_str(),
                        "inputs": inputs,
                    }),
                ))
            }
            DispatchTarget::Repository {
                repository,
                event_type,
            } => {
                let client_payload = request.payload.client_payload().map_err(payload_error)?;
                let url = format!(
                    "{}/repos/{}/{}/dispatches",
                    self.api_url,
                    repository.owner(),
                    repository.name()
                );
                Ok((
                    url,
                    json!({
                        "event_type": event_type.as_str(),
                        "client_payload": client_payload,
                    }),
                ))
            }
        }
    }
}

impl Sink for GithubSink {
    fn deliver(&self, request: &DispatchRequest) -> Result<DispatchReceipt, SinkError> {
        let (url, body) = self.endpoint(request)?;
        let body =
            serde_json::to_vec(&body).map_err(|err| SinkError::DeliveryFailed(err.to_string()))?;
        let api_request = ApiRequest::post(url, body)
            .with_header("Authorization", format!("Bearer {}", request.token.expose()))
            .with_header("Accept", ACCEPT_HEADER)
            .with_header("X-GitHub-Api-Version", API_VERSION)
            .with_header("Content-Type", "application/json");
        let response = self
            .transport
            .send(&api_request)
            .map_err(|err| SinkError::DeliveryFailed(err.to_string()))?;
        if !response.is_success() {
            return Err(SinkError::Rejected {
                status: response.status,
                message: api_error_message(&response.body),
            });
        }
        let mut receipt = self.receipts.next(request);
        receipt.status = Some(response.status);
        receipt.dispatched_at = Timestamp::now();
        Ok(receipt)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the API `message` field, else the truncated body text.
pub(crate) fn api_error_message(body: &[u8]) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body)
        && let Some(Value::String(message)) = object.get("message")
    {
        return message.clone();
    }
    let text = String::from_utf8_lossy(body);
    let mut message: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if text.chars().count() > MAX_ERROR_BODY_CHARS {
        message.push_str("...");
    }
    message
}
