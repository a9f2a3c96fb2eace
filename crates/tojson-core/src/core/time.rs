// crates/tojson-core/src/core/time.rs
// ============================================================================
// Module: Tojson Time Model
// Description: Timestamp representations for receipts and run events.
// Purpose: Keep receipts serializable and deterministic under test.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Receipts carry either wall-clock unix milliseconds (network sinks) or a
//! logical counter (log and callback sinks), so tests can assert exact values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Timestamp attached to dispatch receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(u64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self::UnixMillis(unix_millis())
    }

    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }
}

/// Returns the current unix time in milliseconds, saturating on overflow.
#[must_use]
pub fn unix_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}
