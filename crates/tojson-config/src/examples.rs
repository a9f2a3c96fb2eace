// crates/tojson-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the `config example` command.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `tojson.toml`. The example parses and validates with
//! the same rules as user files.

/// Returns a canonical example `tojson.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[api]
# base_url = "https://ghe.example.com/api/v3"
timeout_ms = 30000
user_agent = "tojson-action/0.1"
max_response_bytes = 1048576

[limits]
max_input_bytes = 1048576
max_output_bytes = 1048576
max_depth = 128

[log]
level = "info"
format = "workflow"

[dispatch]
dry_run = false
allowed_repositories = ["example/repository"]
"#,
    )
}
