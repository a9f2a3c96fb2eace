// crates/tojson-cli/src/lib.rs
// ============================================================================
// Module: Tojson CLI Library
// Description: Shared helpers for the tojson command-line interface.
// Purpose: Provide action wiring, the async entry routine, and i18n.
// Dependencies: tojson-broker, tojson-config, tojson-core, tokio
// ============================================================================

//! ## Overview
//! This library houses the pieces of the `tojson` binary that tests drive
//! directly: the message catalog, [`ActionWiring`] which assembles an
//! [`tojson_core::ActionRunner`] from injected dependencies, and the async
//! [`run`] entry routine.
//!
//! Security posture: CLI inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod action;
/// Internationalization helpers and message catalog.
pub mod i18n;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use action::ActionWiring;
pub use action::RunError;
pub use action::WiringError;
pub use action::run;
