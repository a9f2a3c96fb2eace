// crates/tojson-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Helpers
// Description: Mock HTTP transport with expectation tracking.
// Purpose: Run the action end to end without a network.
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::use_debug,
    reason = "Test helpers are selectively used across suites."
)]

use std::sync::Arc;
use std::sync::Mutex;

use tojson_broker::ApiRequest;
use tojson_broker::ApiResponse;
use tojson_broker::HttpMethod;
use tojson_broker::HttpTransport;
use tojson_broker::TransportError;
use tojson_cli::ActionWiring;
use tojson_config::ActionConfig;
use tojson_core::ActionContext;
use tojson_core::ActionRunner;
use tojson_core::MapEnvironment;
use tojson_core::MapInputProvider;
use tojson_core::MemoryLog;
use tojson_core::MemoryOutputSink;

// ============================================================================
// SECTION: Mock Transport
// ============================================================================

/// Registered expectation: one request answered once.
struct Expectation {
    /// Expected method.
    method: HttpMethod,
    /// Expected absolute URL.
    url: String,
    /// Canned response.
    response: ApiResponse,
}

/// Transport that answers only registered calls, each exactly once.
#[derive(Default)]
pub struct MockTransport {
    /// Expectations not yet consumed.
    pending: Mutex<Vec<Expectation>>,
    /// Requests received in order.
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Creates a transport with no expectations.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a call answered with `response`.
    pub fn expect(&self, method: HttpMethod, url: &str, response: ApiResponse) {
        self.pending.lock().unwrap().push(Expectation {
            method,
            url: url.to_string(),
            response,
        });
    }

    /// Returns `METHOD url` for every expectation not yet consumed.
    pub fn pending_mocks(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|expectation| format!("{} {}", expectation.method, expectation.url))
            .collect()
    }

    /// Returns the recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut pending = self.pending.lock().unwrap();
        let position = pending
            .iter()
            .position(|expectation| expectation.method == request.method && expectation.url == request.url)
            .ok_or_else(|| TransportError::Unexpected {
                method: request.method,
                url: request.url.clone(),
            })?;
        Ok(pending.remove(position).response)
    }
}

/// Fails the test on drop when expectations remain unconsumed.
pub struct MockGuard {
    /// Guarded transport.
    transport: Arc<MockTransport>,
}

impl MockGuard {
    /// Guards `transport`.
    pub const fn new(transport: Arc<MockTransport>) -> Self {
        Self {
            transport,
        }
    }
}

impl Drop for MockGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let pending = self.transport.pending_mocks();
        assert!(pending.is_empty(), "pending mocks: {pending:?}");
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Fresh per-test dependencies for one action run.
pub struct Harness {
    /// Action inputs.
    pub inputs: MapInputProvider,
    /// Process environment used for the GitHub context.
    pub env: MapEnvironment,
    /// Configuration.
    pub config: ActionConfig,
    /// Network mock.
    pub transport: Arc<MockTransport>,
    /// Recorded outputs.
    pub output: Arc<MemoryOutputSink>,
    /// Recorded run events.
    pub log: Arc<MemoryLog>,
}

impl Harness {
    /// Creates a harness with the standard token and repository.
    pub fn new() -> Self {
        Self {
            inputs: MapInputProvider::new().with("token", "12345"),
            env: MapEnvironment::new().with("GITHUB_REPOSITORY", "example/repository"),
            config: ActionConfig::default(),
            transport: MockTransport::new(),
            output: Arc::new(MemoryOutputSink::new()),
            log: Arc::new(MemoryLog::new()),
        }
    }

    /// Sets an action input.
    pub fn input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name, value);
        self
    }

    /// Sets an environment variable.
    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env = self.env.with(name, value);
        self
    }

    /// Wires the runner; the harness keeps handles to the recorders.
    pub fn runner(&self) -> ActionRunner {
        let context = ActionContext::from_environment(&self.env).unwrap();
        let wiring = ActionWiring {
            config: self.config.clone(),
            context,
            inputs: Arc::new(self.inputs.clone()),
            transport: self.transport.clone(),
            output: self.output.clone(),
            log: self.log.clone(),
        };
        wiring.into_runner().unwrap()
    }

    /// Returns a guard asserting every registered mock is consumed.
    pub fn guard(&self) -> MockGuard {
        MockGuard::new(Arc::clone(&self.transport))
    }
}
