// crates/tojson-config/src/lib.rs
// ============================================================================
// Module: Tojson Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for tojson.toml semantics.
// Dependencies: tojson-core, serde, toml
// ============================================================================

//! ## Overview
//! `tojson-config` defines the configuration model for the tojson action. It
//! provides strict, fail-closed validation and a canonical example file.
//!
//! Security posture: config inputs are untrusted and size-limited.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
