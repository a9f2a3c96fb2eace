// crates/tojson-core/src/core/mod.rs
// ============================================================================
// Module: Tojson Core Types
// Description: Canonical domain types for conversion and dispatch.
// Purpose: Provide stable, serializable types shared by every tojson crate.
// Dependencies: serde, serde_json, serde_yaml, jsonpath_lib
// ============================================================================

//! ## Overview
//! Core types cover identifiers, content hashing, YAML to JSON conversion,
//! JSONPath filtering, dispatch records, workflow commands, and run events.
//! These types are the source of truth for the broker, config, and CLI crates.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod command;
pub mod dispatch;
pub mod document;
pub mod event;
pub mod filter;
pub mod hashing;
pub mod identifiers;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::WorkflowCommand;
pub use command::escape_data;
pub use command::escape_property;
pub use dispatch::DispatchPayload;
pub use dispatch::DispatchReceipt;
pub use dispatch::DispatchRequest;
pub use dispatch::DispatchTarget;
pub use dispatch::MAX_WORKFLOW_INPUTS;
pub use dispatch::PayloadError;
pub use document::ConvertError;
pub use document::ConvertOptions;
pub use document::JsonFormat;
pub use document::convert_yaml;
pub use document::render_json;
pub use event::LogLevel;
pub use event::RunEvent;
pub use filter::FilterError;
pub use filter::apply_filter;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use hashing::hash_canonical_json;
pub use identifiers::ApiToken;
pub use identifiers::EventType;
pub use identifiers::GitRef;
pub use identifiers::IdentifierError;
pub use identifiers::RepositoryId;
pub use identifiers::WorkflowId;
pub use time::Timestamp;
