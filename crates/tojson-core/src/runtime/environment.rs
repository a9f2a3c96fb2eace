// crates/tojson-core/src/runtime/environment.rs
// ============================================================================
// Module: Tojson Action Context
// Description: Environment implementations and the resolved GitHub context.
// Purpose: Collect GITHUB_* variables once at the boundary into a typed context.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`ProcessEnvironment`] is the only type in the workspace that reads the
//! process environment. Everything downstream receives an [`ActionContext`]
//! or an injected [`Environment`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::identifiers::GitRef;
use crate::core::identifiers::IdentifierError;
use crate::core::identifiers::RepositoryId;
use crate::interfaces::Environment;

// ============================================================================
// SECTION: Variable Names
// ============================================================================

/// Repository running the workflow (`owner/name`).
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";
/// Ref that triggered the workflow.
pub const REF_ENV: &str = "GITHUB_REF";
/// REST API base URL.
pub const API_URL_ENV: &str = "GITHUB_API_URL";
/// Path of the step output file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";
/// Workspace directory of the checked-out repository.
pub const WORKSPACE_ENV: &str = "GITHUB_WORKSPACE";
/// Set to `1` when step debug logging is enabled.
pub const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";
/// Public GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ============================================================================
// SECTION: Environments
// ============================================================================

/// Environment backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    /// Variables keyed by name.
    vars: BTreeMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the environment with a variable set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Action Context
// ============================================================================

/// Context resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A GitHub variable holds an invalid value.
    #[error("invalid {variable}: {source}")]
    Invalid {
        /// Variable name.
        variable: &'static str,
        /// Validation error.
        #[source]
        source: IdentifierError,
    },
}

/// GitHub runner context resolved from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Repository running the workflow.
    pub repository: Option<RepositoryId>,
    /// Ref that triggered the workflow.
    pub git_ref: Option<GitRef>,
    /// REST API base URL without a trailing slash.
    pub api_url: String,
    /// Step output file path.
    pub output_path: Option<PathBuf>,
    /// Workspace directory.
    pub workspace: Option<PathBuf>,
    /// Whether step debug logging is enabled.
    pub debug: bool,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            repository: None,
            git_ref: None,
            api_url: DEFAULT_API_URL.to_string(),
            output_path: None,
            workspace: None,
            debug: false,
        }
    }
}

impl ActionContext {
    /// Resolves the context from an environment. Empty variables count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when `GITHUB_REPOSITORY` or `GITHUB_REF` is
    /// set but malformed.
    pub fn from_environment(env: &dyn Environment) -> Result<Self, ContextError> {
        let repository = non_empty(env, REPOSITORY_ENV)
            .map(|value| RepositoryId::parse(&value))
            .transpose()
            .map_err(|source| ContextError::Invalid {
                variable: REPOSITORY_ENV,
                source,
            })?;
        let git_ref = non_empty(env, REF_ENV)
            .map(|value| GitRef::parse(&value))
            .transpose()
            .map_err(|source| ContextError::Invalid {
                variable: REF_ENV,
                source,
            })?;
        let api_url = non_empty(env, API_URL_ENV)
            .map_or_else(|| DEFAULT_API_URL.to_string(), |value| value.trim_end_matches('/').to_string());
        Ok(Self {
            repository,
            git_ref,
            api_url,
            output_path: non_empty(env, OUTPUT_ENV).map(PathBuf::from),
            workspace: non_empty(env, WORKSPACE_ENV).map(PathBuf::from),
            debug: env.var(RUNNER_DEBUG_ENV).is_some_and(|value| value == "1"),
        })
    }
}

/// Returns a variable value when it is set and not blank.
fn non_empty(env: &dyn Environment, name: &str) -> Option<String> {
    env.var(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
