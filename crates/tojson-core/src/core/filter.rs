// crates/tojson-core/src/core/filter.rs
// ============================================================================
// Module: Tojson JSONPath Filter
// Description: JSONPath selection over converted documents.
// Purpose: Narrow a converted document to the part a workflow needs.
// Dependencies: jsonpath_lib, serde_json
// ============================================================================

//! ## Overview
//! Filters use JSONPath. An empty filter (or `$` / `.`) returns the document
//! unchanged. A selection with no matches yields `null`, a single match is
//! returned as-is, and multiple matches are returned as an array.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Filter evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The JSONPath expression failed to parse.
    #[error("invalid jsonpath filter: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Filtering
// ============================================================================

/// Applies a JSONPath filter to a value.
///
/// # Errors
///
/// Returns [`FilterError::Invalid`] when the expression is not valid JSONPath.
pub fn apply_filter(value: &Value, filter: &str) -> Result<Value, FilterError> {
    let filter = filter.trim();
    if is_identity(filter) {
        return Ok(value.clone());
    }
    let matches = jsonpath_lib::select(value, filter)
        .map_err(|_| FilterError::Invalid(filter.to_string()))?;
    Ok(match matches.as_slice() {
        [] => Value::Null,
        [single] => (*single).clone(),
        many => Value::Array(many.iter().map(|item| (*item).clone()).collect()),
    })
}

/// Returns true for filters that select the whole document.
fn is_identity(filter: &str) -> bool {
    matches!(filter, "" | "$" | ".")
}
