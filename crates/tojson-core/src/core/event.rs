// crates/tojson-core/src/core/event.rs
// ============================================================================
// Module: Tojson Run Events
// Description: Structured log events emitted by the action runner.
// Purpose: Give every log sink one serializable record shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Run events are small structured records with a stable event name, a
//! level, a human message, and optional fields. Sinks decide how to render
//! them (workflow commands, JSON lines, or in-memory capture).
//! Security posture: callers must never place token values in events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::time::unix_millis;

// ============================================================================
// SECTION: Log Level
// ============================================================================

/// Log verbosity level ordered from least to most verbose.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures only.
    Error,
    /// Failures and warnings.
    Warning,
    /// Normal progress messages.
    #[default]
    Info,
    /// Diagnostic detail.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Parses a level name case-insensitively (`warn` is accepted for `warning`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the canonical level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Returns true when an event at `level` passes this minimum level.
    #[must_use]
    pub fn allows(self, level: Self) -> bool {
        level <= self
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Run Event
// ============================================================================

/// Structured run event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunEvent {
    /// Stable event name (for example `dispatch_sent`).
    pub event: &'static str,
    /// Event time in unix milliseconds.
    pub timestamp_ms: u64,
    /// Event level.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Additional structured fields.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<&'static str, Value>,
}

impl RunEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            event,
            timestamp_ms: unix_millis(),
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a structured field.
    #[must_use]
    pub fn with_field(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }
}
