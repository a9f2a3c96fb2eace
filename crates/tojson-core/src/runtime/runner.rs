// crates/tojson-core/src/runtime/runner.rs
// ============================================================================
// Module: Tojson Action Runner
// Description: Entry routine sequencing masking, conversion, outputs, and dispatch.
// Purpose: Execute one action run against injected interfaces.
// Dependencies: crate::{core, interfaces, runtime}, url
// ============================================================================

//! ## Overview
//! [`ActionRunner::run`] is the action's entry routine:
//! 1. mask the token,
//! 2. resolve and convert the YAML document (when one is supplied),
//! 3. publish the `json` output,
//! 4. dispatch the result to a workflow or repository event (when requested),
//! 5. publish `dispatched` and `dispatch-id`.
//!
//! Security posture: the token is masked before any other output is written
//! and never appears in run events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::core::dispatch::DispatchPayload;
use crate::core::dispatch::DispatchReceipt;
use crate::core::dispatch::DispatchRequest;
use crate::core::dispatch::DispatchTarget;
use crate::core::dispatch::PayloadError;
use crate::core::document::ConvertError;
use crate::core::document::ConvertOptions;
use crate::core::document::JsonFormat;
use crate::core::document::convert_yaml;
use crate::core::document::render_json;
use crate::core::event::LogLevel;
use crate::core::event::RunEvent;
use crate::core::filter::FilterError;
use crate::core::filter::apply_filter;
use crate::core::hashing::HashError;
use crate::core::identifiers::ApiToken;
use crate::core::identifiers::EventType;
use crate::core::identifiers::GitRef;
use crate::core::identifiers::IdentifierError;
use crate::core::identifiers::RepositoryId;
use crate::core::identifiers::WorkflowId;
use crate::interfaces::DispatchError;
use crate::interfaces::Dispatcher;
use crate::interfaces::DocumentLoader;
use crate::interfaces::DocumentRef;
use crate::interfaces::InputError;
use crate::interfaces::InputProvider;
use crate::interfaces::LoadError;
use crate::interfaces::OutputError;
use crate::interfaces::OutputSink;
use crate::interfaces::RunLog;
use crate::runtime::environment::ActionContext;
use crate::runtime::log::NoopLog;

// ============================================================================
// SECTION: Input and Output Names
// ============================================================================

/// Action input names.
pub mod input_names {
    /// API token used for dispatch.
    pub const TOKEN: &str = "token";
    /// Inline YAML text.
    pub const YAML: &str = "yaml";
    /// YAML file path, relative to the workspace.
    pub const YAML_FILE: &str = "yaml-file";
    /// YAML document URL.
    pub const YAML_URL: &str = "yaml-url";
    /// JSONPath filter.
    pub const FILTER: &str = "filter";
    /// JSON output format.
    pub const FORMAT: &str = "format";
    /// Dispatch repository override.
    pub const REPOSITORY: &str = "repository";
    /// Workflow to dispatch.
    pub const WORKFLOW: &str = "workflow";
    /// Repository dispatch event type.
    pub const EVENT_TYPE: &str = "event-type";
    /// Workflow dispatch ref override.
    pub const REF: &str = "ref";
    /// Skip the dispatch call.
    pub const DRY_RUN: &str = "dry-run";
}

/// Action output names.
pub mod output_names {
    /// Converted JSON.
    pub const JSON: &str = "json";
    /// `true` when a dispatch was sent.
    pub const DISPATCHED: &str = "dispatched";
    /// Receipt identifier of the dispatch.
    pub const DISPATCH_ID: &str = "dispatch-id";
}

// ============================================================================
// SECTION: Settings and Report
// ============================================================================

/// Host-supplied runner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Conversion limits.
    pub convert: ConvertOptions,
    /// Forces dry-run regardless of the `dry-run` input.
    pub dry_run: bool,
    /// Repositories dispatch may target; `None` allows any.
    pub allowed_repositories: Option<BTreeSet<RepositoryId>>,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Rendered JSON output, when a document was supplied.
    pub json: Option<String>,
    /// Filtered JSON value, when a document was supplied.
    pub value: Option<Value>,
    /// Target resolved from inputs, when dispatch was requested.
    pub target: Option<DispatchTarget>,
    /// Dispatch receipt, when a dispatch was sent.
    pub receipt: Option<DispatchReceipt>,
    /// Whether dispatch was skipped as a dry run.
    pub dry_run: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that fail a run.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Input resolution failed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// An identifier input is malformed.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    /// The document could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The document could not be converted or rendered.
    #[error(transparent)]
    Convert(#[from] ConvertError),
    /// The filter could not be applied.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// The payload does not fit the dispatch target.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The payload could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
    /// The dispatch failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// An output could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// No repository was supplied or found in the context.
    #[error("repository is required for dispatch: set the `repository` input or GITHUB_REPOSITORY")]
    MissingRepository,
    /// No ref was supplied or found in the context.
    #[error("ref is required for workflow dispatch: set the `ref` input or GITHUB_REF")]
    MissingRef,
    /// The target repository is outside the configured allowlist.
    #[error("repository {0} is not allowed as a dispatch target")]
    RepositoryNotAllowed(RepositoryId),
}

/// Errors raised when building a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunnerBuildError {
    /// A required dependency was not supplied.
    #[error("action runner is missing its {0}")]
    Missing(&'static str),
}

// ============================================================================
// SECTION: Action Runner
// ============================================================================

/// Executes the action against injected dependencies.
pub struct ActionRunner {
    /// Action inputs.
    inputs: Arc<dyn InputProvider>,
    /// GitHub context.
    context: ActionContext,
    /// Document loader for file and URL inputs.
    loader: Arc<dyn DocumentLoader>,
    /// Dispatch backend.
    dispatcher: Arc<dyn Dispatcher>,
    /// Output writer.
    output: Arc<dyn OutputSink>,
    /// Run event sink.
    log: Arc<dyn RunLog>,
    /// Host settings.
    settings: RunnerSettings,
}

impl ActionRunner {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ActionRunnerBuilder {
        ActionRunnerBuilder::default()
    }

    /// Returns the runner's settings.
    #[must_use]
    pub const fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Runs the action once.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when any step fails; outputs written before the
    /// failure are left in place.
    pub fn run(&self) -> Result<RunReport, ActionError> {
        self.log.record(&RunEvent::new("run_started", LogLevel::Debug, "tojson run started"));
        match self.execute() {
            Ok(report) => {
                self.log.record(
                    &RunEvent::new("run_completed", LogLevel::Debug, "tojson run completed")
                        .with_field("dispatched", report.receipt.is_some())
                        .with_field("dry_run", report.dry_run),
                );
                Ok(report)
            }
            Err(err) => {
                self.log.record(&RunEvent::new("run_failed", LogLevel::Debug, err.to_string()));
                Err(err)
            }
        }
    }

    /// Executes the run steps.
    fn execute(&self) -> Result<RunReport, ActionError> {
        let token = ApiToken::new(self.inputs.input(input_names::TOKEN));
        if !token.is_empty() {
            self.output.set_secret(token.expose())?;
        }

        let format = JsonFormat::parse(&self.inputs.input(input_names::FORMAT))?;
        let filter = self.inputs.input(input_names::FILTER);
        let value = match self.resolve_document()? {
            Some(text) => Some(self.convert(&text, &filter)?),
            None => {
                self.log.record(&RunEvent::new(
                    "input_resolved",
                    LogLevel::Debug,
                    "no yaml input supplied; skipping conversion",
                ));
                None
            }
        };
        let json = match &value {
            Some(value) => {
                let rendered = render_json(value, format, &self.settings.convert)?;
                self.output.set_output(output_names::JSON, &rendered)?;
                self.log.record(
                    &RunEvent::new("output_set", LogLevel::Debug, "json output set")
                        .with_field("format", format.as_str())
                        .with_field("bytes", rendered.len()),
                );
                Some(rendered)
            }
            None => None,
        };

        let target = self.resolve_target()?;
        let dry_run = self.settings.dry_run || self.inputs.bool_input(input_names::DRY_RUN)?;
        let receipt = match &target {
            Some(target) => self.dispatch(target, token, value.clone(), dry_run)?,
            None => None,
        };

        let dispatched = if receipt.is_some() { "true" } else { "false" };
        self.output.set_output(output_names::DISPATCHED, dispatched)?;
        if let Some(receipt) = &receipt {
            self.output.set_output(output_names::DISPATCH_ID, &receipt.dispatch_id)?;
        }
        Ok(RunReport {
            json,
            value,
            target,
            receipt,
            dry_run,
        })
    }

    /// Returns the YAML text from `yaml`, `yaml-file`, or `yaml-url`.
    fn resolve_document(&self) -> Result<Option<String>, ActionError> {
        let inline = self.inputs.input(input_names::YAML);
        let file = self.inputs.input(input_names::YAML_FILE);
        let url = self.inputs.input(input_names::YAML_URL);
        let supplied = [&inline, &file, &url].iter().filter(|value| !value.is_empty()).count();
        if supplied > 1 {
            return Err(InputError::Conflict(format!(
                "only one of `{}`, `{}`, or `{}` may be set",
                input_names::YAML,
                input_names::YAML_FILE,
                input_names::YAML_URL
            ))
            .into());
        }
        let (name, reference) = if !inline.is_empty() {
            self.log.record(
                &RunEvent::new("input_resolved", LogLevel::Debug, "using inline yaml")
                    .with_field("source", input_names::YAML),
            );
            return Ok(Some(inline));
        } else if !file.is_empty() {
            (input_names::YAML_FILE, self.file_reference(&file)?)
        } else if !url.is_empty() {
            (input_names::YAML_URL, DocumentRef::new(url))
        } else {
            return Ok(None);
        };
        self.log.record(
            &RunEvent::new("input_resolved", LogLevel::Debug, "loading yaml document")
                .with_field("source", name)
                .with_field("uri", reference.uri.clone()),
        );
        let document = self.loader.load(&reference)?;
        let text = String::from_utf8(document.bytes).map_err(|_| InputError::Invalid {
            name: name.to_string(),
            reason: "document is not valid utf-8".to_string(),
        })?;
        Ok(Some(text))
    }

    /// Builds a `file://` reference, resolving relative paths against the workspace.
    fn file_reference(&self, file: &str) -> Result<DocumentRef, ActionError> {
        let path = Path::new(file);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(workspace) = &self.context.workspace {
            workspace.join(path)
        } else {
            return Err(InputError::Invalid {
                name: input_names::YAML_FILE.to_string(),
                reason: "relative paths require GITHUB_WORKSPACE".to_string(),
            }
            .into());
        };
        let url = Url::from_file_path(&resolved).map_err(|()| InputError::Invalid {
            name: input_names::YAML_FILE.to_string(),
            reason: "path cannot be expressed as a file url".to_string(),
        })?;
        Ok(DocumentRef::new(url.to_string()))
    }

    /// Converts and filters the document.
    fn convert(&self, text: &str, filter: &str) -> Result<Value, ActionError> {
        let converted = convert_yaml(text, &self.settings.convert)?;
        let filtered = apply_filter(&converted, filter)?;
        self.log.record(
            &RunEvent::new("document_converted", LogLevel::Debug, "yaml converted to json")
                .with_field("input_bytes", text.len())
                .with_field("filtered", !filter.is_empty()),
        );
        Ok(filtered)
    }

    /// Resolves the dispatch target from inputs and context.
    fn resolve_target(&self) -> Result<Option<DispatchTarget>, ActionError> {
        let workflow = self.inputs.input(input_names::WORKFLOW);
        let event_type = self.inputs.input(input_names::EVENT_TYPE);
        match (workflow.is_empty(), event_type.is_empty()) {
            (true, true) => Ok(None),
            (false, false) => Err(InputError::Conflict(format!(
                "set either `{}` or `{}`, not both",
                input_names::WORKFLOW,
                input_names::EVENT_TYPE
            ))
            .into()),
            (false, true) => Ok(Some(DispatchTarget::Workflow {
                repository: self.resolve_repository()?,
                workflow: WorkflowId::parse(&workflow)?,
                git_ref: self.resolve_ref()?,
            })),
            (true, false) => Ok(Some(DispatchTarget::Repository {
                repository: self.resolve_repository()?,
                event_type: EventType::parse(&event_type)?,
            })),
        }
    }

    /// Returns the `repository` input or the context repository.
    fn resolve_repository(&self) -> Result<RepositoryId, ActionError> {
        let repository = self.inputs.input(input_names::REPOSITORY);
        if !repository.is_empty() {
            return Ok(RepositoryId::parse(&repository)?);
        }
        self.context.repository.clone().ok_or(ActionError::MissingRepository)
    }

    /// Returns the `ref` input or the context ref.
    fn resolve_ref(&self) -> Result<GitRef, ActionError> {
        let git_ref = self.inputs.input(input_names::REF);
        if !git_ref.is_empty() {
            return Ok(GitRef::parse(&git_ref)?);
        }
        self.context.git_ref.clone().ok_or(ActionError::MissingRef)
    }

    /// Validates and sends the dispatch, or logs it on a dry run.
    fn dispatch(
        &self,
        target: &DispatchTarget,
        token: ApiToken,
        value: Option<Value>,
        dry_run: bool,
    ) -> Result<Option<DispatchReceipt>, ActionError> {
        if let Some(allowed) = &self.settings.allowed_repositories
            && !allowed.contains(target.repository())
        {
            return Err(ActionError::RepositoryNotAllowed(target.repository().clone()));
        }
        let payload = DispatchPayload::new(value.unwrap_or(Value::Null))?;
        payload.validate_for(target)?;
        if dry_run {
            let message = format!("dry run: would dispatch {}", target.label());
            self.log.record(
                &RunEvent::new("dispatch_skipped", LogLevel::Info, message)
                    .with_field("content_hash", payload.content_hash.value.clone()),
            );
            return Ok(None);
        }
        if token.is_empty() {
            return Err(InputError::Required(input_names::TOKEN.to_string()).into());
        }
        let request = DispatchRequest {
            target: target.clone(),
            token,
            payload,
        };
        let receipt = self.dispatcher.dispatch(&request)?;
        self.log.record(
            &RunEvent::new("dispatch_sent", LogLevel::Info, format!("dispatched {}", target.label()))
                .with_field("dispatch_id", receipt.dispatch_id.clone())
                .with_field("content_hash", receipt.content_hash.value.clone()),
        );
        Ok(Some(receipt))
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`ActionRunner`].
#[derive(Default)]
pub struct ActionRunnerBuilder {
    /// Action inputs.
    inputs: Option<Arc<dyn InputProvider>>,
    /// GitHub context.
    context: Option<ActionContext>,
    /// Document loader.
    loader: Option<Arc<dyn DocumentLoader>>,
    /// Dispatch backend.
    dispatcher: Option<Arc<dyn Dispatcher>>,
    /// Output writer.
    output: Option<Arc<dyn OutputSink>>,
    /// Run event sink.
    log: Option<Arc<dyn RunLog>>,
    /// Host settings.
    settings: RunnerSettings,
}

impl ActionRunnerBuilder {
    /// Sets the input provider.
    #[must_use]
    pub fn inputs(mut self, inputs: Arc<dyn InputProvider>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Sets the GitHub context; defaults to an empty context.
    #[must_use]
    pub fn context(mut self, context: ActionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the document loader.
    #[must_use]
    pub fn loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the dispatcher.
    #[must_use]
    pub fn dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Sets the output sink.
    #[must_use]
    pub fn output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = Some(output);
        self
    }

    /// Sets the run log; defaults to [`NoopLog`].
    #[must_use]
    pub fn log(mut self, log: Arc<dyn RunLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Sets the runner settings.
    #[must_use]
    pub fn settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerBuildError::Missing`] when inputs, loader, dispatcher,
    /// or output are not supplied.
    pub fn build(self) -> Result<ActionRunner, RunnerBuildError> {
        Ok(ActionRunner {
            inputs: self.inputs.ok_or(RunnerBuildError::Missing("input provider"))?,
            context: self.context.unwrap_or_default(),
            loader: self.loader.ok_or(RunnerBuildError::Missing("document loader"))?,
            dispatcher: self.dispatcher.ok_or(RunnerBuildError::Missing("dispatcher"))?,
            output: self.output.ok_or(RunnerBuildError::Missing("output sink"))?,
            log: self.log.unwrap_or_else(|| Arc::new(NoopLog)),
            settings: self.settings,
        })
    }
}
