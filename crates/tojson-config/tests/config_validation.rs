//! Config validation tests for tojson-config.
// crates/tojson-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Defaults, limit ranges, allowlists, and log overrides.
// Purpose: Ensure invalid values fail closed and overrides apply in order.
// =============================================================================

mod common;

use common::TestResult;
use common::assert_invalid;
use common::minimal_config;
use tojson_config::ActionConfig;
use tojson_config::LOG_LEVEL_ENV_VAR;
use tojson_config::LogFormat;
use tojson_config::config_toml_example;
use tojson_core::LogLevel;
use tojson_core::MapEnvironment;
use tojson_core::RepositoryId;

#[test]
fn empty_config_applies_defaults() -> TestResult {
    let config = minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let options = config.convert_options();
    if options.max_input_bytes != 1024 * 1024 || options.max_depth != 128 {
        return Err("unexpected default limits".to_string());
    }
    if config.api.timeout_ms != 30_000 || config.api.user_agent != "tojson-action/0.1" {
        return Err("unexpected api defaults".to_string());
    }
    if config.log.level != LogLevel::Info || config.log.format != LogFormat::Workflow {
        return Err("unexpected log defaults".to_string());
    }
    Ok(())
}

#[test]
fn example_config_is_valid() -> TestResult {
    let config =
        ActionConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    let settings = config.runner_settings().map_err(|err| err.to_string())?;
    let expected = RepositoryId::parse("example/repository").map_err(|err| err.to_string())?;
    match settings.allowed_repositories {
        Some(allowed) if allowed.contains(&expected) && allowed.len() == 1 => Ok(()),
        _ => Err("unexpected allowlist".to_string()),
    }
}

#[test]
fn empty_allowlist_allows_any_repository() -> TestResult {
    let config = ActionConfig::from_toml_str("[dispatch]\ndry_run = true\n")
        .map_err(|err| err.to_string())?;
    let settings = config.runner_settings().map_err(|err| err.to_string())?;
    if settings.allowed_repositories.is_some() || !settings.dry_run {
        return Err("expected open allowlist with dry_run".to_string());
    }
    Ok(())
}

#[test]
fn malformed_allowlist_entry_is_rejected() -> TestResult {
    assert_invalid(
        ActionConfig::from_toml_str("[dispatch]\nallowed_repositories = [\"not-a-repo\"]\n"),
        "dispatch.allowed_repositories",
    )
}

#[test]
fn timeout_out_of_range_is_rejected() -> TestResult {
    assert_invalid(ActionConfig::from_toml_str("[api]\ntimeout_ms = 10\n"), "api.timeout_ms")?;
    assert_invalid(
        ActionConfig::from_toml_str("[api]\ntimeout_ms = 600001\n"),
        "api.timeout_ms",
    )
}

#[test]
fn base_url_must_be_http() -> TestResult {
    assert_invalid(
        ActionConfig::from_toml_str("[api]\nbase_url = \"ftp://example.com\"\n"),
        "api.base_url must use http or https",
    )
}

#[test]
fn blank_user_agent_is_rejected() -> TestResult {
    assert_invalid(ActionConfig::from_toml_str("[api]\nuser_agent = \"  \"\n"), "api.user_agent")
}

#[test]
fn zero_and_oversized_limits_are_rejected() -> TestResult {
    assert_invalid(
        ActionConfig::from_toml_str("[limits]\nmax_input_bytes = 0\n"),
        "limits.max_input_bytes",
    )?;
    assert_invalid(
        ActionConfig::from_toml_str("[limits]\nmax_output_bytes = 67108865\n"),
        "limits.max_output_bytes",
    )?;
    assert_invalid(ActionConfig::from_toml_str("[limits]\nmax_depth = 0\n"), "limits.max_depth")?;
    assert_invalid(ActionConfig::from_toml_str("[limits]\nmax_depth = 129\n"), "limits.max_depth")?;
    assert_invalid(
        ActionConfig::from_toml_str("[api]\nmax_response_bytes = 0\n"),
        "api.max_response_bytes",
    )
}

#[test]
fn unknown_log_format_fails_parsing() -> TestResult {
    assert_invalid(ActionConfig::from_toml_str("[log]\nformat = \"xml\"\n"), "config parse error")
}

#[test]
fn cli_log_level_overrides_everything() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    let env = MapEnvironment::new().with(LOG_LEVEL_ENV_VAR, "trace").with("RUNNER_DEBUG", "1");
    config.apply_log_overrides(Some(LogLevel::Warning), &env).map_err(|err| err.to_string())?;
    if config.log.level != LogLevel::Warning {
        return Err(format!("expected warning, got {}", config.log.level));
    }
    Ok(())
}

#[test]
fn env_log_level_overrides_runner_debug() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    let env = MapEnvironment::new().with(LOG_LEVEL_ENV_VAR, "error").with("RUNNER_DEBUG", "1");
    config.apply_log_overrides(None, &env).map_err(|err| err.to_string())?;
    if config.log.level != LogLevel::Error {
        return Err(format!("expected error, got {}", config.log.level));
    }
    Ok(())
}

#[test]
fn runner_debug_raises_level_to_debug() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    config.apply_log_overrides(None, &MapEnvironment::new().with("RUNNER_DEBUG", "1"))
        .map_err(|err| err.to_string())?;
    if config.log.level != LogLevel::Debug {
        return Err(format!("expected debug, got {}", config.log.level));
    }
    config.log.level = LogLevel::Trace;
    config.apply_log_overrides(None, &MapEnvironment::new().with("RUNNER_DEBUG", "1"))
        .map_err(|err| err.to_string())?;
    if config.log.level != LogLevel::Trace {
        return Err("runner debug must not lower trace".to_string());
    }
    Ok(())
}

#[test]
fn unknown_env_log_level_is_rejected() -> TestResult {
    let mut config = minimal_config().map_err(|err| err.to_string())?;
    let env = MapEnvironment::new().with(LOG_LEVEL_ENV_VAR, "loud");
    assert_invalid(config.apply_log_overrides(None, &env), "TOJSON_LOG_LEVEL")
}
