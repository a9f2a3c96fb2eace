// crates/tojson-core/src/core/dispatch.rs
// ============================================================================
// Module: Tojson Dispatch Model
// Description: Dispatch targets, payloads, requests, and receipts.
// Purpose: Describe a GitHub workflow or repository dispatch independent of transport.
// Dependencies: serde, serde_json, crate::core::{hashing, identifiers, time}
// ============================================================================

//! ## Overview
//! A dispatch sends the converted document to GitHub either as
//! `workflow_dispatch` inputs or as a `repository_dispatch` client payload.
//! Payloads carry a canonical content hash so receipts can be correlated with
//! the published `json` output.
//!
//! # Invariants
//! - Workflow inputs are always strings; non-string values are rendered as
//!   compact JSON.
//! - A workflow dispatch carries at most [`MAX_WORKFLOW_INPUTS`] inputs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::ApiToken;
use crate::core::identifiers::EventType;
use crate::core::identifiers::GitRef;
use crate::core::identifiers::RepositoryId;
use crate::core::identifiers::WorkflowId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of inputs GitHub accepts for a workflow dispatch.
pub const MAX_WORKFLOW_INPUTS: usize = 25;

// ============================================================================
// SECTION: Dispatch Target
// ============================================================================

/// Destination of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchTarget {
    /// `workflow_dispatch` for a single workflow on a ref.
    Workflow {
        /// Target repository.
        repository: RepositoryId,
        /// Workflow file name or id.
        workflow: WorkflowId,
        /// Ref the workflow runs on.
        git_ref: GitRef,
    },
    /// `repository_dispatch` event.
    Repository {
        /// Target repository.
        repository: RepositoryId,
        /// Event type delivered to workflows.
        event_type: EventType,
    },
}

impl DispatchTarget {
    /// Returns the target repository.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryId {
        match self {
            Self::Workflow {
                repository, ..
            }
            | Self::Repository {
                repository, ..
            } => repository,
        }
    }

    /// Returns a short human-readable label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Workflow {
                repository,
                workflow,
                git_ref,
            } => format!("workflow {workflow} in {repository} at {git_ref}"),
            Self::Repository {
                repository,
                event_type,
            } => format!("event {event_type} in {repository}"),
        }
    }
}

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Payload shape errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload is neither an object nor `null`.
    #[error("dispatch payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// Too many workflow inputs.
    #[error("workflow dispatch accepts at most {max} inputs, got {actual}")]
    TooManyInputs {
        /// Maximum accepted inputs.
        max: usize,
        /// Inputs supplied.
        actual: usize,
    },
    /// A workflow input value could not be rendered.
    #[error("failed to render workflow input `{key}`: {reason}")]
    Render {
        /// Input key.
        key: String,
        /// Failure reason.
        reason: String,
    },
}

/// JSON payload with its canonical content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPayload {
    /// Payload value (the filtered document, or `null`).
    pub value: Value,
    /// Canonical JSON hash of `value`.
    pub content_hash: HashDigest,
}

impl DispatchPayload {
    /// Wraps a value and computes its canonical hash.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn new(value: Value) -> Result<Self, HashError> {
        let content_hash = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &value)?;
        Ok(Self {
            value,
            content_hash,
        })
    }

    /// Returns the payload as workflow inputs.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the payload is not an object, has too
    /// many entries, or a value cannot be rendered.
    pub fn workflow_inputs(&self) -> Result<Map<String, Value>, PayloadError> {
        let object = self.object()?;
        if object.len() > MAX_WORKFLOW_INPUTS {
            return Err(PayloadError::TooManyInputs {
                max: MAX_WORKFLOW_INPUTS,
                actual: object.len(),
            });
        }
        let mut inputs = Map::with_capacity(object.len());
        for (key, value) in object {
            let rendered = match value {
                Value::String(text) => text,
                other => serde_json::to_string(&other).map_err(|err| PayloadError::Render {
                    key: key.clone(),
                    reason: err.to_string(),
                })?,
            };
            inputs.insert(key, Value::String(rendered));
        }
        Ok(inputs)
    }

    /// Returns the payload as a repository dispatch client payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::NotAnObject`] when the payload is not an object.
    pub fn client_payload(&self) -> Result<Map<String, Value>, PayloadError> {
        self.object()
    }

    /// Checks that the payload fits the target's shape.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the payload cannot be sent to `target`.
    pub fn validate_for(&self, target: &DispatchTarget) -> Result<(), PayloadError> {
        match target {
            DispatchTarget::Workflow {
                ..
            } => self.workflow_inputs().map(|_| ()),
            DispatchTarget::Repository {
                ..
            } => self.client_payload().map(|_| ()),
        }
    }

    /// Returns the payload object, treating `null` as empty.
    fn object(&self) -> Result<Map<String, Value>, PayloadError> {
        match &self.value {
            Value::Null => Ok(Map::new()),
            Value::Object(object) => Ok(object.clone()),
            other => Err(PayloadError::NotAnObject(json_kind(other))),
        }
    }
}

/// Returns the JSON type name of a value.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Request and Receipt
// ============================================================================

/// Fully resolved dispatch request.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Dispatch destination.
    pub target: DispatchTarget,
    /// Token used for authentication.
    pub token: ApiToken,
    /// Payload to deliver.
    pub payload: DispatchPayload,
}

/// Proof of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Identifier in `<dispatcher>-<seq>` form.
    pub dispatch_id: String,
    /// Dispatch destination.
    pub target: DispatchTarget,
    /// Canonical hash of the delivered payload.
    pub content_hash: HashDigest,
    /// HTTP status returned by the API, when the sink is networked.
    pub status: Option<u16>,
    /// Dispatcher name.
    pub dispatcher: String,
    /// Dispatch time.
    pub dispatched_at: Timestamp,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use serde_json::json;

    use super::*;

    #[test]
    fn workflow_inputs_render_non_strings_as_json() {
        let payload = DispatchPayload::new(json!({
            "name": "demo",
            "replicas": 3,
            "enabled": true,
            "tags": ["a", "b"],
            "owner": null,
        }))
        .unwrap();
        let inputs = payload.workflow_inputs().unwrap();
        assert_eq!(
            Value::Object(inputs),
            json!({
                "name": "demo",
                "replicas": "3",
                "enabled": "true",
                "tags": "[\"a\",\"b\"]",
                "owner": "null",
            })
        );
    }

    #[test]
    fn null_payload_has_no_inputs() {
        let payload = DispatchPayload::new(Value::Null).unwrap();
        assert!(payload.workflow_inputs().unwrap().is_empty());
        assert!(payload.client_payload().unwrap().is_empty());
    }

    #[test]
    fn array_payload_is_rejected() {
        let payload = DispatchPayload::new(json!([1, 2])).unwrap();
        assert!(matches!(payload.workflow_inputs(), Err(PayloadError::NotAnObject("array"))));
    }
}
