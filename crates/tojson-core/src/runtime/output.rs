// crates/tojson-core/src/runtime/output.rs
// ============================================================================
// Module: Tojson Output Writers
// Description: Step output writers for GITHUB_OUTPUT, stdout commands, and memory.
// Purpose: Publish action outputs and secret masks through OutputSink.
// Dependencies: crate::{core, interfaces}, rand
// ============================================================================

//! ## Overview
//! Outputs go to the `GITHUB_OUTPUT` file using the heredoc form
//! `name<<DELIM`, falling back to legacy `::set-output` commands when the file
//! is not available. Secrets are always registered with `::add-mask::` on the
//! command stream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::core::command::WorkflowCommand;
use crate::interfaces::OutputError;
use crate::interfaces::OutputSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of generated heredoc delimiters.
const DELIMITER_PREFIX: &str = "ghadelimiter_";
/// Random bytes per delimiter.
const DELIMITER_ENTROPY_BYTES: usize = 16;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects empty names and names with characters outside `[A-Za-z0-9_-]`.
fn validate_output_name(name: &str) -> Result<(), OutputError> {
    if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
    {
        return Err(OutputError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Writes one command line and flushes.
fn write_command<W: Write>(writer: &Mutex<W>, command: &WorkflowCommand) -> Result<(), OutputError> {
    let mut writer =
        writer.lock().map_err(|_| OutputError::Io("command writer lock poisoned".to_string()))?;
    writeln!(writer, "{command}").map_err(|err| OutputError::Io(err.to_string()))?;
    writer.flush().map_err(|err| OutputError::Io(err.to_string()))
}

// ============================================================================
// SECTION: File Command Output
// ============================================================================

/// Appends outputs to the `GITHUB_OUTPUT` file.
pub struct FileCommandOutput<W: Write + Send> {
    /// Output file path.
    path: PathBuf,
    /// Command stream for secret masks.
    commands: Mutex<W>,
}

impl<W: Write + Send> FileCommandOutput<W> {
    /// Creates a writer for `path`, masking secrets on `commands`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, commands: W) -> Self {
        Self {
            path: path.into(),
            commands: Mutex::new(commands),
        }
    }

}

/// Generates a heredoc delimiter from OS randomness.
///
/// Values are written after the delimiter is chosen, so it must not be
/// derivable from the name, the time, or the process id.
fn random_delimiter() -> String {
    let mut bytes = [0u8; DELIMITER_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{DELIMITER_PREFIX}{hex}")
}

impl<W: Write + Send> OutputSink for FileCommandOutput<W> {
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        validate_output_name(name)?;
        let delimiter = random_delimiter();
        if value.contains(&delimiter) {
            return Err(OutputError::DelimiterCollision(name.to_string()));
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| OutputError::Io(err.to_string()))?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
            .map_err(|err| OutputError::Io(err.to_string()))
    }

    fn set_secret(&self, value: &str) -> Result<(), OutputError> {
        write_command(&self.commands, &WorkflowCommand::add_mask(value))
    }
}

// ============================================================================
// SECTION: Stdout Command Output
// ============================================================================

/// Writes outputs as legacy `::set-output` commands.
pub struct StdoutCommandOutput<W: Write + Send> {
    /// Command stream.
    commands: Mutex<W>,
}

impl<W: Write + Send> StdoutCommandOutput<W> {
    /// Creates a command writer.
    #[must_use]
    pub const fn new(commands: W) -> Self {
        Self {
            commands: Mutex::new(commands),
        }
    }
}

impl<W: Write + Send> OutputSink for StdoutCommandOutput<W> {
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        validate_output_name(name)?;
        write_command(&self.commands, &WorkflowCommand::set_output(name, value))
    }

    fn set_secret(&self, value: &str) -> Result<(), OutputError> {
        write_command(&self.commands, &WorkflowCommand::add_mask(value))
    }
}

// ============================================================================
// SECTION: Memory Output
// ============================================================================

/// Records outputs and secrets in memory.
#[derive(Debug, Default)]
pub struct MemoryOutputSink {
    /// Outputs in write order.
    outputs: Mutex<Vec<(String, String)>>,
    /// Registered secrets in write order.
    secrets: Mutex<Vec<String>>,
}

impl MemoryOutputSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every output written, in order.
    #[must_use]
    pub fn outputs(&self) -> Vec<(String, String)> {
        self.outputs.lock().map(|outputs| outputs.clone()).unwrap_or_default()
    }

    /// Returns the last value written for `name`.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs().into_iter().rev().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Returns every secret registered, in order.
    #[must_use]
    pub fn secrets(&self) -> Vec<String> {
        self.secrets.lock().map(|secrets| secrets.clone()).unwrap_or_default()
    }
}

impl OutputSink for MemoryOutputSink {
    fn set_output(&self, name: &str, value: &str) -> Result<(), OutputError> {
        validate_output_name(name)?;
        let mut outputs =
            self.outputs.lock().map_err(|_| OutputError::Io("output lock poisoned".to_string()))?;
        outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_secret(&self, value: &str) -> Result<(), OutputError> {
        let mut secrets =
            self.secrets.lock().map_err(|_| OutputError::Io("secret lock poisoned".to_string()))?;
        secrets.push(value.to_string());
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::*;

    #[test]
    fn stdout_output_masks_and_sets_outputs() {
        let output = StdoutCommandOutput::new(Vec::new());
        output.set_secret("12345").unwrap();
        output.set_output("json", "{\"a\":\"x,y\"}").unwrap();
        let text = String::from_utf8(output.commands.into_inner().unwrap()).unwrap();
        assert_eq!(text, "::add-mask::12345\n::set-output name=json::{\"a\":\"x,y\"}\n");
    }

    #[test]
    fn file_output_masks_on_the_command_stream() {
        let dir = tempfile::tempdir().unwrap();
        let output = FileCommandOutput::new(dir.path().join("out"), Vec::new());
        output.set_secret("12345").unwrap();
        let text = String::from_utf8(output.commands.into_inner().unwrap()).unwrap();
        assert_eq!(text, "::add-mask::12345\n");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn delimiters_are_random_per_call() {
        let first = random_delimiter();
        let second = random_delimiter();
        assert!(first.starts_with(DELIMITER_PREFIX));
        assert_eq!(first.len(), DELIMITER_PREFIX.len() + DELIMITER_ENTROPY_BYTES * 2);
        assert!(first[DELIMITER_PREFIX.len()..].chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
