// crates/tojson-cli/src/action.rs
// ============================================================================
// Module: Action Wiring and Entry Routine
// Description: Assembles the action runner and runs it on the blocking pool.
// Purpose: Keep process globals out of the runner; inject everything.
// Dependencies: tojson-broker, tojson-config, tojson-core, tokio
// ============================================================================

//! ## Overview
//! [`ActionWiring`] turns configuration, GitHub context, and injected I/O
//! seams into an [`ActionRunner`] backed by a [`CompositeBroker`]. The only
//! network path is the supplied [`HttpTransport`], so tests substitute a mock
//! transport and production passes a reqwest transport.
//!
//! [`run`] is the async entry routine: it executes the blocking runner on
//! Tokio's blocking pool and awaits completion. The runner is moved into the
//! blocking task, so any blocking HTTP client it owns is dropped there.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;
use tojson_broker::BrokerError;
use tojson_broker::CompositeBroker;
use tojson_broker::FileSource;
use tojson_broker::GithubSink;
use tojson_broker::HttpSource;
use tojson_broker::HttpTransport;
use tojson_broker::InlineSource;
use tojson_config::ActionConfig;
use tojson_config::ConfigError;
use tojson_core::ActionContext;
use tojson_core::ActionError;
use tojson_core::ActionRunner;
use tojson_core::InputProvider;
use tojson_core::OutputSink;
use tojson_core::RunLog;
use tojson_core::RunReport;
use tojson_core::RunnerBuildError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while assembling the runner.
#[derive(Debug, Error)]
pub enum WiringError {
    /// Configuration could not be turned into runner settings.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The broker could not be built.
    #[error(transparent)]
    Broker(#[from] BrokerError),
    /// The runner could not be built.
    #[error(transparent)]
    Runner(#[from] RunnerBuildError),
}

/// Errors returned by the async entry routine.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run failed.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// The blocking task panicked or was cancelled.
    #[error("action task failed: {0}")]
    Join(String),
}

// ============================================================================
// SECTION: Wiring
// ============================================================================

/// Dependencies for one action run.
pub struct ActionWiring {
    /// Validated configuration.
    pub config: ActionConfig,
    /// GitHub context.
    pub context: ActionContext,
    /// Action inputs.
    pub inputs: Arc<dyn InputProvider>,
    /// HTTP transport for `yaml-url` fetches and dispatch calls.
    pub transport: Arc<dyn HttpTransport>,
    /// Output writer.
    pub output: Arc<dyn OutputSink>,
    /// Run event sink.
    pub log: Arc<dyn RunLog>,
}

impl ActionWiring {
    /// Returns the API base URL: the configured override, else the context URL.
    #[must_use]
    pub fn api_url(&self) -> String {
        self.config.api.base_url.clone().unwrap_or_else(|| self.context.api_url.clone())
    }

    /// Builds the runner.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError`] when settings, broker, or runner construction fails.
    pub fn into_runner(self) -> Result<ActionRunner, WiringError> {
        let settings = self.config.runner_settings()?;
        let api_url = self.api_url();
        let broker = CompositeBroker::builder()
            .source("inline", InlineSource::new())
            .source("file", FileSource::unrestricted())
            .source("http", HttpSource::new(Arc::clone(&self.transport)))
            .source("https", HttpSource::new(Arc::clone(&self.transport)))
            .sink(GithubSink::new(self.transport, api_url))
            .build()?;
        let broker = Arc::new(broker);
        let runner = ActionRunner::builder()
            .inputs(self.inputs)
            .context(self.context)
            .loader(broker.clone())
            .dispatcher(broker)
            .output(self.output)
            .log(self.log)
            .settings(settings)
            .build()?;
        Ok(runner)
    }
}

// ============================================================================
// SECTION: Entry Routine
// ============================================================================

/// Runs the action once on the blocking pool.
///
/// # Errors
///
/// Returns [`RunError::Action`] when the run fails and [`RunError::Join`]
/// when the blocking task does not complete.
pub async fn run(runner: ActionRunner) -> Result<RunReport, RunError> {
    let report = tokio::task::spawn_blocking(move || runner.run())
        .await
        .map_err(|err| RunError::Join(err.to_string()))??;
    Ok(report)
}
