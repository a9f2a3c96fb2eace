// crates/tojson-broker/tests/common/mod.rs
// =============================================================================
// Module: Broker Test Helpers
// Description: Scripted transport and request fixtures for broker tests.
// Purpose: Exercise sinks and sources without a network.
// =============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    reason = "Test helpers are selectively used across suites."
)]

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use tojson_broker::ApiRequest;
use tojson_broker::ApiResponse;
use tojson_broker::HttpTransport;
use tojson_broker::TransportError;
use tojson_core::ApiToken;
use tojson_core::DispatchPayload;
use tojson_core::DispatchRequest;
use tojson_core::DispatchTarget;
use tojson_core::EventType;
use tojson_core::GitRef;
use tojson_core::RepositoryId;
use tojson_core::WorkflowId;

/// Transport returning queued responses and recording every request.
#[derive(Default)]
pub struct ScriptedTransport {
    /// Responses returned in order.
    responses: Mutex<VecDeque<ApiResponse>>,
    /// Requests received in order.
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport answering with `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().ok_or_else(|| TransportError::Unexpected {
            method: request.method,
            url: request.url.clone(),
        })
    }
}

/// Returns a repository-dispatch request for `example/repository`.
pub fn repository_request(value: Value) -> DispatchRequest {
    DispatchRequest {
        target: DispatchTarget::Repository {
            repository: RepositoryId::parse("example/repository").unwrap(),
            event_type: EventType::parse("config-updated").unwrap(),
        },
        token: ApiToken::new("12345"),
        payload: DispatchPayload::new(value).unwrap(),
    }
}

/// Returns a workflow-dispatch request for `deploy.yml` on `refs/heads/main`.
pub fn workflow_request(value: Value) -> DispatchRequest {
    DispatchRequest {
        target: DispatchTarget::Workflow {
            repository: RepositoryId::parse("example/repository").unwrap(),
            workflow: WorkflowId::parse("deploy.yml").unwrap(),
            git_ref: GitRef::parse("refs/heads/main").unwrap(),
        },
        token: ApiToken::new("12345"),
        payload: DispatchPayload::new(value).unwrap(),
    }
}

/// Parses a request body as JSON.
pub fn body_json(request: &ApiRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or_default()).unwrap()
}
