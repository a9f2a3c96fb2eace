// crates/tojson-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: tojson-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the tojson CLI i18n catalog behavior:
//! - Translation falls back to keys on misses.
//! - Explicit locales select their own catalog.
//! - The [`t!`](tojson_cli::t) macro formats placeholders correctly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use tojson_cli::i18n::Locale;
use tojson_cli::i18n::MessageArg;
use tojson_cli::i18n::translate;
use tojson_cli::i18n::translate_for;
use tojson_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("path", "input.yml"), MessageArg::new("limit", "10")];
    let result = translate_for(Locale::En, "input.read_too_large", args);
    assert_eq!(result, "Refusing to read input.yml because it exceeds the 10 byte input limit.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the Catalan catalog is selected explicitly.
#[test]
fn translate_for_uses_requested_locale() {
    let result = translate_for(Locale::Ca, "config.validate.ok", Vec::new());
    assert_eq!(result, "La configuració s'ha validat correctament.");
}

/// Confirms the macro formats display values.
#[test]
fn t_macro_formats_arguments() {
    let result = t!("main.version", version = "1.2.3");
    assert_eq!(result, "tojson 1.2.3");
}

/// Confirms locale parsing tolerates region tags and case.
#[test]
fn locale_parse_accepts_region_tags() {
    assert_eq!(Locale::parse("CA-es"), Some(Locale::Ca));
    assert_eq!(Locale::parse("en_US"), Some(Locale::En));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse("  "), None);
}
