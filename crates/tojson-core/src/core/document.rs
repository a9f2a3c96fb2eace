// crates/tojson-core/src/core/document.rs
// ============================================================================
// Module: Tojson Document Conversion
// Description: YAML to JSON conversion and JSON rendering.
// Purpose: Turn untrusted YAML text into bounded JSON values and output strings.
// Dependencies: serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! Conversion parses every document in a YAML stream, applies merge keys, and
//! maps the YAML data model onto JSON. Keys that JSON cannot express as
//! strings are rejected rather than silently dropped.
//!
//! Security posture: inputs are size- and depth-limited before and during
//! conversion, and rendered output is size-limited before it is published.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use serde_yaml::Value as YamlValue;
use thiserror::Error;

use crate::core::hashing::canonical_json_bytes;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum YAML input size in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Default maximum rendered JSON size in bytes.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;
/// Default maximum nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;
/// Nesting depth at which the YAML parser itself gives up.
pub const PARSER_RECURSION_LIMIT: usize = 128;

/// Size and depth limits applied during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Maximum YAML input size in bytes.
    pub max_input_bytes: usize,
    /// Maximum rendered JSON size in bytes.
    pub max_output_bytes: usize,
    /// Maximum container nesting depth.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// SECTION: Output Format
// ============================================================================

/// JSON rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonFormat {
    /// Single-line output.
    #[default]
    Compact,
    /// Two-space indented output.
    Pretty,
    /// RFC 8785 canonical output with sorted keys.
    Canonical,
}

impl JsonFormat {
    /// Parses a format name; the empty string selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownFormat`] for unrecognized names.
    pub fn parse(value: &str) -> Result<Self, ConvertError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "canonical" => Ok(Self::Canonical),
            _ => Err(ConvertError::UnknownFormat(value.to_string())),
        }
    }

    /// Returns the canonical format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Canonical => "canonical",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Conversion and rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// YAML input exceeds the configured size limit.
    #[error("yaml input exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual bytes supplied.
        actual_bytes: usize,
    },
    /// Rendered JSON exceeds the configured size limit.
    #[error("json output exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    OutputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual bytes rendered.
        actual_bytes: usize,
    },
    /// YAML failed to parse.
    #[error("yaml parse error: {0}")]
    Parse(String),
    /// A mapping key has no JSON string form.
    #[error("unsupported {0} mapping key")]
    UnsupportedKey(&'static str),
    /// Nesting exceeds the configured depth limit.
    #[error("document nesting exceeds depth limit of {0}")]
    TooDeep(usize),
    /// JSON rendering failed.
    #[error("json render error: {0}")]
    Render(String),
    /// Unknown output format name.
    #[error("unknown json format `{0}` (expected compact, pretty, or canonical)")]
    UnknownFormat(String),
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts a YAML stream to a JSON value.
///
/// Zero documents (or whitespace-only input) yield `null`, a single document
/// yields its value, and several documents yield an array in stream order.
///
/// # Errors
///
/// Returns [`ConvertError`] when the input is too large, fails to parse,
/// nests too deeply, or uses a key with no JSON string form.
pub fn convert_yaml(text: &str, options: &ConvertOptions) -> Result<Value, ConvertError> {
    if text.len() > options.max_input_bytes {
        return Err(ConvertError::TooLarge {
            max_bytes: options.max_input_bytes,
            actual_bytes: text.len(),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let mut value = YamlValue::deserialize(document)
            .map_err(|err| parse_error(&err, options.max_depth))?;
        value.apply_merge().map_err(|err| ConvertError::Parse(err.to_string()))?;
        documents.push(yaml_to_json(value, 0, options.max_depth)?);
    }
    if documents.len() > 1 {
        return Ok(Value::Array(documents));
    }
    Ok(documents.pop().unwrap_or(Value::Null))
}

/// Classifies a parser error, reporting recursion exhaustion as a depth error.
fn parse_error(err: &serde_yaml::Error, max_depth: usize) -> ConvertError {
    let message = err.to_string();
    if message.starts_with("recursion limit exceeded") {
        return ConvertError::TooDeep(max_depth.min(PARSER_RECURSION_LIMIT));
    }
    ConvertError::Parse(message)
}

/// Maps one YAML value onto JSON, tracking nesting depth.
fn yaml_to_json(value: YamlValue, depth: usize, max_depth: usize) -> Result<Value, ConvertError> {
    if depth > max_depth {
        return Err(ConvertError::TooDeep(max_depth));
    }
    match value {
        YamlValue::Null => Ok(Value::Null),
        YamlValue::Bool(flag) => Ok(Value::Bool(flag)),
        YamlValue::Number(number) => Ok(convert_number(&number)),
        YamlValue::String(text) => Ok(Value::String(text)),
        YamlValue::Sequence(items) => items
            .into_iter()
            .map(|item| yaml_to_json(item, depth + 1, max_depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                object.insert(mapping_key(key)?, yaml_to_json(item, depth + 1, max_depth)?);
            }
            Ok(Value::Object(object))
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, depth, max_depth),
    }
}

/// Converts a YAML number, mapping non-finite floats to `null`.
fn convert_number(number: &serde_yaml::Number) -> Value {
    if let Some(value) = number.as_i64() {
        return Value::Number(Number::from(value));
    }
    if let Some(value) = number.as_u64() {
        return Value::Number(Number::from(value));
    }
    number.as_f64().and_then(Number::from_f64).map_or(Value::Null, Value::Number)
}

/// Returns the JSON object key for a YAML mapping key.
fn mapping_key(key: YamlValue) -> Result<String, ConvertError> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Bool(flag) => Ok(flag.to_string()),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Tagged(tagged) => mapping_key(tagged.value),
        YamlValue::Sequence(_) => Err(ConvertError::UnsupportedKey("sequence")),
        YamlValue::Mapping(_) => Err(ConvertError::UnsupportedKey("mapping")),
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a JSON value in the requested format.
///
/// # Errors
///
/// Returns [`ConvertError::OutputTooLarge`] when the rendered text exceeds
/// `options.max_output_bytes`, or [`ConvertError::Render`] when
/// serialization fails.
pub fn render_json(
    value: &Value,
    format: JsonFormat,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let rendered = match format {
        JsonFormat::Compact => {
            serde_json::to_string(value).map_err(|err| ConvertError::Render(err.to_string()))?
        }
        JsonFormat::Pretty => serde_json::to_string_pretty(value)
            .map_err(|err| ConvertError::Render(err.to_string()))?,
        JsonFormat::Canonical => {
            let bytes =
                canonical_json_bytes(value).map_err(|err| ConvertError::Render(err.to_string()))?;
            String::from_utf8(bytes).map_err(|err| ConvertError::Render(err.to_string()))?
        }
    };
    if rendered.len() > options.max_output_bytes {
        return Err(ConvertError::OutputTooLarge {
            max_bytes: options.max_output_bytes,
            actual_bytes: rendered.len(),
        });
    }
    Ok(rendered)
}
