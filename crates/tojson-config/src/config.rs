// crates/tojson-config/src/config.rs
// ============================================================================
// Module: Tojson Configuration
// Description: Configuration loading and validation for the tojson action.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tojson-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every field has a default, so running without a config file is valid; an
//! explicitly requested file that is missing or invalid fails closed.
//! Environment lookups go through an injected [`Environment`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tojson_core::ConvertOptions;
use tojson_core::Environment;
use tojson_core::LogLevel;
use tojson_core::RepositoryId;
use tojson_core::RunnerSettings;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "tojson.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TOJSON_CONFIG";
/// Environment variable used to override the log level.
pub const LOG_LEVEL_ENV_VAR: &str = "TOJSON_LOG_LEVEL";
/// Environment variable set to `1` when runner debug logging is enabled.
pub const RUNNER_DEBUG_ENV_VAR: &str = "RUNNER_DEBUG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum HTTP timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum HTTP timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;
/// Maximum value of any byte limit.
pub(crate) const MAX_BYTE_LIMIT: usize = 64 * 1024 * 1024;
/// Maximum document nesting depth; deeper input is refused by the YAML parser.
pub(crate) const MAX_DEPTH_LIMIT: usize = tojson_core::core::document::PARSER_RECURSION_LIMIT;
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Maximum base URL length.
pub(crate) const MAX_BASE_URL_LENGTH: usize = 2048;
/// Maximum number of allowlisted repositories.
pub(crate) const MAX_ALLOWED_REPOSITORIES: usize = 256;
/// Default HTTP timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default HTTP user agent.
pub(crate) const DEFAULT_USER_AGENT: &str = "tojson-action/0.1";
/// Default maximum HTTP response size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Tojson action configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// GitHub API client configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Conversion limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Dispatch policy configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// GitHub API client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// API base URL; overrides `GITHUB_API_URL` when set.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Conversion limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum YAML input size in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    /// Maximum rendered JSON size in bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    /// Maximum document nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_output_bytes: default_max_output_bytes(),
            max_depth: default_max_depth(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Workflow commands on stdout.
    #[default]
    Workflow,
    /// JSON lines on stderr.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Minimum level recorded.
    #[serde(default)]
    pub level: LogLevel,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Dispatch policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Forces dry-run for every dispatch.
    #[serde(default)]
    pub dry_run: bool,
    /// Repositories dispatch may target; empty allows any.
    #[serde(default)]
    pub allowed_repositories: Vec<String>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl ActionConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// Resolution order: `path`, then `TOJSON_CONFIG`, then `./tojson.toml`
    /// when present, else built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit file cannot be read, or any
    /// resolved file fails parsing or validation.
    pub fn load(path: Option<&Path>, env: &dyn Environment) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path, env)? else {
            return Ok(Self::default());
        };
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.limits.validate()?;
        self.dispatch.validate()?;
        Ok(())
    }

    /// Applies log level overrides.
    ///
    /// Precedence, highest first: `cli_level`, `TOJSON_LOG_LEVEL`,
    /// `RUNNER_DEBUG=1` (raises the level to at least debug), file value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `TOJSON_LOG_LEVEL` is set to an
    /// unknown level.
    pub fn apply_log_overrides(
        &mut self,
        cli_level: Option<LogLevel>,
        env: &dyn Environment,
    ) -> Result<(), ConfigError> {
        if let Some(level) = cli_level {
            self.log.level = level;
            return Ok(());
        }
        if let Some(value) = env.var(LOG_LEVEL_ENV_VAR).filter(|value| !value.trim().is_empty()) {
            self.log.level = LogLevel::parse(&value).ok_or_else(|| {
                ConfigError::Invalid(format!("{LOG_LEVEL_ENV_VAR} has unknown level `{value}`"))
            })?;
            return Ok(());
        }
        if env.var(RUNNER_DEBUG_ENV_VAR).is_some_and(|value| value == "1")
            && self.log.level < LogLevel::Debug
        {
            self.log.level = LogLevel::Debug;
        }
        Ok(())
    }

    /// Returns conversion limits.
    #[must_use]
    pub const fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            max_input_bytes: self.limits.max_input_bytes,
            max_output_bytes: self.limits.max_output_bytes,
            max_depth: self.limits.max_depth,
        }
    }

    /// Returns runner settings derived from limits and dispatch policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an allowlist entry is malformed.
    pub fn runner_settings(&self) -> Result<RunnerSettings, ConfigError> {
        Ok(RunnerSettings {
            convert: self.convert_options(),
            dry_run: self.dispatch.dry_run,
            allowed_repositories: self.dispatch.allowlist()?,
        })
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl ApiConfig {
    /// Validates API client settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            if base_url.len() > MAX_BASE_URL_LENGTH {
                return Err(ConfigError::Invalid("api.base_url exceeds max length".to_string()));
            }
            if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
                return Err(ConfigError::Invalid("api.base_url must use http or https".to_string()));
            }
        }
        if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() || user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "api.user_agent must be 1 to {MAX_USER_AGENT_LENGTH} bytes"
            )));
        }
        validate_byte_limit("api.max_response_bytes", self.max_response_bytes)
    }
}

impl LimitsConfig {
    /// Validates conversion limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_byte_limit("limits.max_input_bytes", self.max_input_bytes)?;
        validate_byte_limit("limits.max_output_bytes", self.max_output_bytes)?;
        if !(1 ..= MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(ConfigError::Invalid(format!(
                "limits.max_depth must be between 1 and {MAX_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }
}

impl DispatchConfig {
    /// Validates dispatch policy.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_repositories.len() > MAX_ALLOWED_REPOSITORIES {
            return Err(ConfigError::Invalid(
                "too many dispatch.allowed_repositories entries".to_string(),
            ));
        }
        self.allowlist().map(|_| ())
    }

    /// Parses the repository allowlist; an empty list allows any repository.
    fn allowlist(&self) -> Result<Option<BTreeSet<RepositoryId>>, ConfigError> {
        if self.allowed_repositories.is_empty() {
            return Ok(None);
        }
        self.allowed_repositories
            .iter()
            .map(|entry| {
                RepositoryId::parse(entry).map_err(|err| {
                    ConfigError::Invalid(format!("dispatch.allowed_repositories: {err}"))
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some)
    }
}

/// Validates a byte limit against `1..=MAX_BYTE_LIMIT`.
fn validate_byte_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if !(1 ..= MAX_BYTE_LIMIT).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_BYTE_LIMIT}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default HTTP timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Default maximum response size.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default maximum input size.
const fn default_max_input_bytes() -> usize {
    tojson_core::core::document::DEFAULT_MAX_INPUT_BYTES
}

/// Default maximum output size.
const fn default_max_output_bytes() -> usize {
    tojson_core::core::document::DEFAULT_MAX_OUTPUT_BYTES
}

/// Default maximum nesting depth.
const fn default_max_depth() -> usize {
    tojson_core::core::document::DEFAULT_MAX_DEPTH
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default file.
fn resolve_path(path: Option<&Path>, env: &dyn Environment) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env.var(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
