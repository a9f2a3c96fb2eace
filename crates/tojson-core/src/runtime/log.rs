// crates/tojson-core/src/runtime/log.rs
// ============================================================================
// Module: Tojson Run Log Sinks
// Description: Workflow-command, JSON-line, memory, and no-op run log sinks.
// Purpose: Render run events for the GitHub runner or machine consumers.
// Dependencies: serde_json, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Every sink filters events by a minimum [`LogLevel`]. Write failures are
//! swallowed so logging can never fail a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use crate::core::command::WorkflowCommand;
use crate::core::event::LogLevel;
use crate::core::event::RunEvent;
use crate::interfaces::RunLog;

// ============================================================================
// SECTION: Workflow Command Log
// ============================================================================

/// Renders events as workflow commands on the runner's stdout.
pub struct WorkflowCommandLog<W: Write + Send> {
    /// Command stream.
    writer: Mutex<W>,
    /// Minimum level recorded.
    level: LogLevel,
}

impl<W: Write + Send> WorkflowCommandLog<W> {
    /// Creates a sink recording events at `level` or more severe.
    #[must_use]
    pub const fn new(writer: W, level: LogLevel) -> Self {
        Self {
            writer: Mutex::new(writer),
            level,
        }
    }
}

/// Renders an event as a single workflow command line.
fn command_line(event: &RunEvent) -> String {
    let message = if event.fields.is_empty() {
        event.message.clone()
    } else {
        let fields = serde_json::to_string(&event.fields).unwrap_or_default();
        format!("{} {fields}", event.message)
    };
    match event.level {
        LogLevel::Error => WorkflowCommand::error(message).to_string(),
        LogLevel::Warning => WorkflowCommand::warning(message).to_string(),
        LogLevel::Info => message,
        LogLevel::Debug | LogLevel::Trace => WorkflowCommand::debug(message).to_string(),
    }
}

impl<W: Write + Send> RunLog for WorkflowCommandLog<W> {
    fn record(&self, event: &RunEvent) {
        if !self.enabled(event.level) {
            return;
        }
        let line = command_line(event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.level.allows(level)
    }
}

// ============================================================================
// SECTION: JSON Lines Log
// ============================================================================

/// Writes one JSON object per event.
pub struct JsonLinesLog<W: Write + Send> {
    /// Output stream.
    writer: Mutex<W>,
    /// Minimum level recorded.
    level: LogLevel,
}

impl<W: Write + Send> JsonLinesLog<W> {
    /// Creates a sink recording events at `level` or more severe.
    #[must_use]
    pub const fn new(writer: W, level: LogLevel) -> Self {
        Self {
            writer: Mutex::new(writer),
            level,
        }
    }
}

impl<W: Write + Send> RunLog for JsonLinesLog<W> {
    fn record(&self, event: &RunEvent) {
        if !self.enabled(event.level) {
            return;
        }
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut writer) = self.writer.lock()
        {
            let _ = writeln!(writer, "{payload}");
            let _ = writer.flush();
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.level.allows(level)
    }
}

// ============================================================================
// SECTION: Memory Log
// ============================================================================

/// Captures events in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    /// Captured events in order.
    events: Mutex<Vec<RunEvent>>,
}

impl MemoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the captured event names in order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl RunLog for MemoryLog {
    fn record(&self, event: &RunEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: No-op Log
// ============================================================================

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl RunLog for NoopLog {
    fn record(&self, _event: &RunEvent) {}

    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
