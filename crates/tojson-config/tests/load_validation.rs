//! Config load validation tests for tojson-config.
// crates/tojson-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, resolution).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

mod common;

use std::io::Write;
use std::path::Path;

use common::TestResult;
use common::assert_invalid;
use tempfile::NamedTempFile;
use tojson_config::ActionConfig;
use tojson_config::CONFIG_ENV_VAR;
use tojson_core::MapEnvironment;

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(
        ActionConfig::load(Some(path), &MapEnvironment::new()),
        "config path exceeds max length",
    )
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(
        ActionConfig::load(Some(path), &MapEnvironment::new()),
        "config path component too long",
    )
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(
        ActionConfig::load(Some(file.path()), &MapEnvironment::new()),
        "config file exceeds size limit",
    )
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(
        ActionConfig::load(Some(file.path()), &MapEnvironment::new()),
        "config file must be utf-8",
    )
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(ActionConfig::load(Some(&path), &MapEnvironment::new()), "config io error")
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[limits]\nmax_bytes = 10\n").map_err(|err| err.to_string())?;
    assert_invalid(
        ActionConfig::load(Some(file.path()), &MapEnvironment::new()),
        "config parse error",
    )
}

#[test]
fn load_uses_environment_path() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[limits]\nmax_depth = 16\n").map_err(|err| err.to_string())?;
    let path = file.path().to_string_lossy().to_string();
    let env = MapEnvironment::new().with(CONFIG_ENV_VAR, path);
    let config = ActionConfig::load(None, &env).map_err(|err| err.to_string())?;
    if config.limits.max_depth != 16 {
        return Err(format!("expected depth 16, got {}", config.limits.max_depth));
    }
    Ok(())
}

#[test]
fn explicit_path_wins_over_environment() -> TestResult {
    let mut explicit = NamedTempFile::new().map_err(|err| err.to_string())?;
    explicit.write_all(b"[limits]\nmax_depth = 8\n").map_err(|err| err.to_string())?;
    let env = MapEnvironment::new().with(CONFIG_ENV_VAR, "/nonexistent/tojson.toml");
    let config = ActionConfig::load(Some(explicit.path()), &env).map_err(|err| err.to_string())?;
    if config.limits.max_depth != 8 {
        return Err(format!("expected depth 8, got {}", config.limits.max_depth));
    }
    Ok(())
}

#[test]
fn load_without_any_file_uses_defaults() -> TestResult {
    let config = ActionConfig::load(None, &MapEnvironment::new()).map_err(|err| err.to_string())?;
    if config != ActionConfig::default() {
        return Err("expected default config".to_string());
    }
    Ok(())
}
