// crates/tojson-core/src/core/identifiers.rs
// ============================================================================
// Module: Tojson Identifiers
// Description: Validated identifiers for repositories, workflows, refs, and events.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Identifiers are validated once at construction so dispatch code can build
//! API paths without re-checking them. Tokens are wrapped in [`ApiToken`],
//! which never renders its value through `Debug` or `Display`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a repository owner or name segment.
pub const MAX_REPOSITORY_SEGMENT_LENGTH: usize = 100;
/// Maximum length of a workflow identifier.
pub const MAX_WORKFLOW_ID_LENGTH: usize = 255;
/// Maximum length of a git ref.
pub const MAX_GIT_REF_LENGTH: usize = 255;
/// Maximum length of a repository dispatch event type.
pub const MAX_EVENT_TYPE_LENGTH: usize = 100;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{value}`: {reason}")]
pub struct IdentifierError {
    /// Identifier kind label.
    pub kind: &'static str,
    /// Rejected input value.
    pub value: String,
    /// Validation failure reason.
    pub reason: &'static str,
}

impl IdentifierError {
    /// Builds an identifier error.
    fn new(kind: &'static str, value: &str, reason: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            reason,
        }
    }
}

// ============================================================================
// SECTION: Repository Identifier
// ============================================================================

/// GitHub repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    owner: String,
    /// Repository name.
    name: String,
}

impl RepositoryId {
    /// Parses an `owner/name` repository identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is not a well-formed
    /// `owner/name` pair.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let Some((owner, name)) = value.split_once('/') else {
            return Err(IdentifierError::new("repository", value, "expected `owner/name`"));
        };
        if name.contains('/') {
            return Err(IdentifierError::new("repository", value, "expected exactly one `/`"));
        }
        validate_repository_segment(owner)
            .and_then(|()| validate_repository_segment(name))
            .map_err(|reason| IdentifierError::new("repository", value, reason))?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Returns the repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RepositoryId> for String {
    fn from(value: RepositoryId) -> Self {
        value.to_string()
    }
}

/// Returns true for `.` and `..`, which URL parsing collapses out of API paths.
fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Validates one segment of a repository identifier.
fn validate_repository_segment(segment: &str) -> Result<(), &'static str> {
    if segment.is_empty() {
        return Err("owner and name must be non-empty");
    }
    if segment.len() > MAX_REPOSITORY_SEGMENT_LENGTH {
        return Err("segment exceeds 100 characters");
    }
    if is_dot_segment(segment) {
        return Err("segment must not be `.` or `..`");
    }
    if !segment.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')) {
        return Err("segment contains unsupported characters");
    }
    Ok(())
}

// ============================================================================
// SECTION: Workflow Identifier
// ============================================================================

/// Workflow file name (for example `ci.yml`) or numeric workflow id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Parses a workflow identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is empty, too long, or
    /// contains characters that cannot appear in an API path segment.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::new("workflow", value, "must be non-empty"));
        }
        if value.len() > MAX_WORKFLOW_ID_LENGTH {
            return Err(IdentifierError::new("workflow", value, "exceeds 255 characters"));
        }
        if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')) {
            return Err(IdentifierError::new("workflow", value, "contains unsupported characters"));
        }
        if is_dot_segment(value) {
            return Err(IdentifierError::new("workflow", value, "must not be `.` or `..`"));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WorkflowId> for String {
    fn from(value: WorkflowId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Git Ref
// ============================================================================

/// Git ref used for workflow dispatch (`main` or `refs/heads/main`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GitRef(String);

impl GitRef {
    /// Parses a git ref.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the ref is empty, too long, or
    /// contains whitespace or control characters.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::new("ref", value, "must be non-empty"));
        }
        if value.len() > MAX_GIT_REF_LENGTH {
            return Err(IdentifierError::new("ref", value, "exceeds 255 characters"));
        }
        if value.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
            return Err(IdentifierError::new("ref", value, "contains whitespace"));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the ref as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for GitRef {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GitRef> for String {
    fn from(value: GitRef) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Event Type
// ============================================================================

/// Repository dispatch event type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType(String);

impl EventType {
    /// Parses a repository dispatch event type.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the value is empty or longer than
    /// [`MAX_EVENT_TYPE_LENGTH`] characters.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        if value.is_empty() {
            return Err(IdentifierError::new("event type", value, "must be non-empty"));
        }
        if value.chars().count() > MAX_EVENT_TYPE_LENGTH {
            return Err(IdentifierError::new("event type", value, "exceeds 100 characters"));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the event type as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for EventType {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: API Token
// ============================================================================

/// Secret API token used for authenticated dispatch.
///
/// # Invariants
/// - `Debug` and `Display` never render the token value.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token for transport headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when no token was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
