// crates/tojson-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tojson Interfaces
// Description: Injected seams for inputs, environment, loading, dispatch, and output.
// Purpose: Define the contract surfaces used by the action runner.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The runner reads inputs, loads documents, dispatches payloads, and writes
//! outputs only through these traits. Hosts wire process-backed
//! implementations at the binary boundary; tests wire in-memory ones.
//! Implementations must fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::dispatch::DispatchReceipt;
use crate::core::dispatch::DispatchRequest;
use crate::core::event::LogLevel;
use crate::core::event::RunEvent;

// ============================================================================
// SECTION: Input Provider
// ============================================================================

/// Input resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A required input is missing or empty.
    #[error("Input required and not supplied: {0}")]
    Required(String),
    /// A boolean input has a value outside the accepted set.
    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {0}\nSupport boolean input \
         list: `true | True | TRUE | false | False | FALSE`"
    )]
    InvalidBoolean(String),
    /// Inputs that cannot be combined were supplied together.
    #[error("conflicting inputs: {0}")]
    Conflict(String),
    /// An input value is malformed.
    #[error("invalid input `{name}`: {reason}")]
    Invalid {
        /// Input name.
        name: String,
        /// Failure reason.
        reason: String,
    },
}

/// Source of named action inputs.
pub trait InputProvider: Send + Sync {
    /// Returns the trimmed input value, or `None` when unset.
    fn get_input(&self, name: &str) -> Option<String>;

    /// Returns the input value, or the empty string when unset.
    fn input(&self, name: &str) -> String {
        self.get_input(name).unwrap_or_default()
    }

    /// Returns a non-empty input value.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Required`] when the input is unset or empty.
    fn required_input(&self, name: &str) -> Result<String, InputError> {
        let value = self.input(name);
        if value.is_empty() {
            return Err(InputError::Required(name.to_string()));
        }
        Ok(value)
    }

    /// Returns a boolean input; unset or empty is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidBoolean`] for values outside
    /// `true|True|TRUE|false|False|FALSE`.
    fn bool_input(&self, name: &str) -> Result<bool, InputError> {
        match self.input(name).as_str() {
            "" | "false" | "False" | "FALSE" => Ok(false),
            "true" | "True" | "TRUE" => Ok(true),
            _ => Err(InputError::InvalidBoolean(name.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the variable value, or `None` when unset or not unicode.
    fn var(&self, name: &str) -> Option<String>;
}

// ============================================================================
// SECTION: Document Loader
// ============================================================================

/// Reference to a document by URI (`file://`, `https://`, `inline:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// Document URI.
    pub uri: String,
}

impl DocumentRef {
    /// Creates a document reference.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
        }
    }
}

/// Loaded document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Raw document bytes.
    pub bytes: Vec<u8>,
    /// Content type, when the source reports one.
    pub content_type: Option<String>,
}

/// Document loading errors.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The loader failed to fetch the document.
    #[error("document load failed: {0}")]
    Failed(String),
}

/// Fetches documents referenced by the `yaml-file` and `yaml-url` inputs.
pub trait DocumentLoader: Send + Sync {
    /// Loads a document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the document cannot be fetched.
    fn load(&self, reference: &DocumentRef) -> Result<LoadedDocument, LoadError>;
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Dispatcher reported an error before or while sending.
    #[error("dispatch error: {0}")]
    DispatchFailed(String),
    /// The API rejected the dispatch.
    #[error("dispatch rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// API error message.
        message: String,
    },
}

/// Delivers dispatch requests.
pub trait Dispatcher: Send + Sync {
    /// Dispatches a request.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when dispatch fails.
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
}

// ============================================================================
// SECTION: Output Sink
// ============================================================================

/// Output writing errors.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Underlying writer failed.
    #[error("output io error: {0}")]
    Io(String),
    /// Output name is empty or malformed.
    #[error("invalid output name `{0}`")]
    InvalidName(String),
    /// The generated delimiter collides with the output content.
    #[error("output `{0}` contains its own delimiter")]
    DelimiterCollision(String),
}

/// Publishes action outputs and registers secrets.
pub trait OutputSink: Send + Sync {
    /// Sets a named output.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the output cannot be written.
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError>;

    /// Registers a secret so the runner masks it in logs.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when the mask command cannot be written.
    fn set_secret(&self, value: &str) -> Result<(), OutputError>;
}

// ============================================================================
// SECTION: Run Log
// ============================================================================

/// Structured log sink for run events.
pub trait RunLog: Send + Sync {
    /// Records an event; sinks drop events below their minimum level.
    fn record(&self, event: &RunEvent);

    /// Returns true when events at `level` would be recorded.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }
}
