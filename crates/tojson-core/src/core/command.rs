// crates/tojson-core/src/core/command.rs
// ============================================================================
// Module: Tojson Workflow Commands
// Description: GitHub Actions workflow command rendering and escaping.
// Purpose: Emit masks, annotations, and legacy outputs on the runner stream.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Workflow commands are single lines of the form
//! `::name key=value,key=value::message`. Messages escape `%`, CR, and LF;
//! property values additionally escape `:` and `,` so a value can never
//! terminate its own command early.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Workflow Command
// ============================================================================

/// A single workflow command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCommand {
    /// Command name (`debug`, `add-mask`, ...).
    name: &'static str,
    /// Command properties in render order.
    properties: Vec<(&'static str, String)>,
    /// Command message.
    message: String,
}

impl WorkflowCommand {
    /// Creates a command with no properties.
    #[must_use]
    pub fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            properties: Vec::new(),
            message: message.into(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.properties.push((key, value.into()));
        self
    }

    /// `::debug::` command.
    #[must_use]
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new("debug", message)
    }

    /// `::notice::` command.
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self::new("notice", message)
    }

    /// `::warning::` command.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new("warning", message)
    }

    /// `::error::` command.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }

    /// `::add-mask::` command registering a secret with the runner.
    #[must_use]
    pub fn add_mask(secret: impl Into<String>) -> Self {
        Self::new("add-mask", secret)
    }

    /// Legacy `::set-output name=...::` command.
    #[must_use]
    pub fn set_output(name: &str, value: impl Into<String>) -> Self {
        Self::new("set-output", value).with_property("name", name)
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for WorkflowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.name)?;
        for (index, (key, value)) in self.properties.iter().enumerate() {
            let separator = if index == 0 { " " } else { "," };
            write!(f, "{separator}{key}={}", escape_property(value))?;
        }
        write!(f, "::{}", escape_data(&self.message))
    }
}

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes a command message.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Escapes a command property value.
#[must_use]
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
