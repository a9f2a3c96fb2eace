// crates/tojson-core/src/lib.rs
// ============================================================================
// Module: Tojson Core Library
// Description: Public API surface for the tojson action core.
// Purpose: Expose domain types, injected interfaces, and the action runner.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Tojson core converts YAML documents to JSON, publishes the result as an
//! action output, and optionally dispatches it to a GitHub workflow or
//! repository event. Every side effect flows through an injected interface
//! so the runner never touches process-global state directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::DispatchError;
pub use interfaces::Dispatcher;
pub use interfaces::DocumentLoader;
pub use interfaces::DocumentRef;
pub use interfaces::Environment;
pub use interfaces::InputError;
pub use interfaces::InputProvider;
pub use interfaces::LoadError;
pub use interfaces::LoadedDocument;
pub use interfaces::OutputError;
pub use interfaces::OutputSink;
pub use interfaces::RunLog;
pub use runtime::ActionContext;
pub use runtime::ActionError;
pub use runtime::ActionRunner;
pub use runtime::ActionRunnerBuilder;
pub use runtime::ContextError;
pub use runtime::EnvInputProvider;
pub use runtime::FileCommandOutput;
pub use runtime::JsonLinesLog;
pub use runtime::MapEnvironment;
pub use runtime::MapInputProvider;
pub use runtime::MemoryLog;
pub use runtime::MemoryOutputSink;
pub use runtime::NoopLog;
pub use runtime::ProcessEnvironment;
pub use runtime::RunReport;
pub use runtime::RunnerBuildError;
pub use runtime::RunnerSettings;
pub use runtime::StdoutCommandOutput;
pub use runtime::WorkflowCommandLog;
