// crates/tojson-core/src/runtime/mod.rs
// ============================================================================
// Module: Tojson Runtime
// Description: Runtime providers, output writers, log sinks, and the action runner.
// Purpose: Execute the action against injected interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime holds process-backed and in-memory implementations of the
//! core interfaces plus [`ActionRunner`], which sequences masking,
//! conversion, output publication, and dispatch.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod environment;
pub mod inputs;
pub mod log;
pub mod output;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use environment::ActionContext;
pub use environment::ContextError;
pub use environment::MapEnvironment;
pub use environment::ProcessEnvironment;
pub use inputs::EnvInputProvider;
pub use inputs::MapInputProvider;
pub use inputs::input_env_name;
pub use log::JsonLinesLog;
pub use log::MemoryLog;
pub use log::NoopLog;
pub use log::WorkflowCommandLog;
pub use output::FileCommandOutput;
pub use output::MemoryOutputSink;
pub use output::StdoutCommandOutput;
pub use runner::ActionError;
pub use runner::ActionRunner;
pub use runner::ActionRunnerBuilder;
pub use runner::RunReport;
pub use runner::RunnerBuildError;
pub use runner::RunnerSettings;
pub use runner::input_names;
pub use runner::output_names;
