// crates/tojson-broker/src/sink/mod.rs
// ============================================================================
// Module: Tojson Broker Sinks
// Description: Sink trait and the GitHub dispatch sink.
// Purpose: Deliver dispatch requests to concrete targets.
// Dependencies: tojson-core, thiserror, std
// ============================================================================

//! ## Overview
//! Sinks deliver [`tojson_core::DispatchRequest`] values and return
//! [`tojson_core::DispatchReceipt`] values for the run report.
//! Invariants:
//! - Receipts are returned only after successful delivery.
//! - Tokens never appear in receipts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use thiserror::Error;
use tojson_core::DispatchReceipt;
use tojson_core::DispatchRequest;
use tojson_core::Timestamp;

// ============================================================================
// SECTION: Sink Errors
// ============================================================================

/// Dispatch delivery failures.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The request never reached the API, or could not be built.
    #[error("dispatch not delivered: {0}")]
    DeliveryFailed(String),
    /// The API answered with a non-success status.
    #[error("dispatch rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// API error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Delivers dispatch requests.
pub trait Sink: Send + Sync {
    /// Delivers the request.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when delivery fails.
    fn deliver(&self, request: &DispatchRequest) -> Result<DispatchReceipt, SinkError>;
}

// ============================================================================
// SECTION: Receipt Helpers
// ============================================================================

/// Numbers receipts `<dispatcher>-1`, `<dispatcher>-2`, ... for one sink.
#[derive(Debug)]
pub(crate) struct ReceiptFactory {
    /// Prefix of every dispatch id.
    dispatcher: String,
    /// Receipts issued so far.
    counter: AtomicU64,
}

impl ReceiptFactory {
    /// Starts numbering at 1 for `dispatcher`.
    pub(crate) fn new(dispatcher: impl Into<String>) -> Self {
        Self {
            dispatcher: dispatcher.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Returns the next receipt for `request`, stamped with a logical time.
    pub(crate) fn next(&self, request: &DispatchRequest) -> DispatchReceipt {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        DispatchReceipt {
            dispatch_id: format!("{}-{seq}", self.dispatcher),
            target: request.target.clone(),
            content_hash: request.payload.content_hash.clone(),
            status: None,
            dispatcher: self.dispatcher.clone(),
            dispatched_at: Timestamp::Logical(seq),
        }
    }
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod github;

pub use github::GithubSink;
