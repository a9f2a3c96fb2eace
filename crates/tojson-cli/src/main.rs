// crates/tojson-cli/src/main.rs
// ============================================================================
// Module: Tojson CLI Entry Point
// Description: Command dispatcher for GitHub Action mode and local conversion.
// Purpose: Provide a safe, localized CLI around the tojson action runner.
// Dependencies: clap, tojson-broker, tojson-config, tojson-core, thiserror, tokio.
// ============================================================================

//! ## Overview
//! `tojson run` (the default) executes the GitHub Action: inputs come from
//! `INPUT_*` variables, outputs go to `GITHUB_OUTPUT`, and failures are
//! reported as `::error::` workflow commands with exit code 1.
//! `tojson convert` converts a local YAML file to JSON on stdout, and
//! `tojson config` validates or prints configuration.
//!
//! This is the only place that touches process globals: the environment is
//! read through [`ProcessEnvironment`] and handed to everything else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;
use tojson_broker::ReqwestTransport;
use tojson_broker::ReqwestTransportConfig;
use tojson_cli::ActionWiring;
use tojson_cli::i18n::Locale;
use tojson_cli::i18n::set_locale;
use tojson_cli::t;
use tojson_config::ActionConfig;
use tojson_config::LogFormat;
use tojson_config::config_toml_example;
use tojson_core::ActionContext;
use tojson_core::ActionRunner;
use tojson_core::EnvInputProvider;
use tojson_core::Environment;
use tojson_core::FileCommandOutput;
use tojson_core::JsonFormat;
use tojson_core::JsonLinesLog;
use tojson_core::LogLevel;
use tojson_core::OutputSink;
use tojson_core::ProcessEnvironment;
use tojson_core::RunLog;
use tojson_core::StdoutCommandOutput;
use tojson_core::WorkflowCommand;
use tojson_core::WorkflowCommandLog;
use tojson_core::apply_filter;
use tojson_core::convert_yaml;
use tojson_core::render_json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the output language.
const LANG_ENV: &str = "TOJSON_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Tojson command-line interface.
#[derive(Parser, Debug)]
#[command(name = "tojson", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Config file path (overrides `TOJSON_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Minimum log level (overrides `TOJSON_LOG_LEVEL` and the config file).
    #[arg(long = "log-level", value_enum, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevelArg>,
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `TOJSON_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand; `run` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as a GitHub Action.
    Run,
    /// Convert a local YAML document to JSON on stdout.
    Convert(ConvertCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `tojson convert`.
#[derive(Args, Debug)]
struct ConvertCommand {
    /// YAML file path, or `-` for stdin.
    #[arg(value_name = "PATH")]
    input: String,
    /// JSONPath filter applied after conversion.
    #[arg(long, value_name = "FILTER")]
    filter: Option<String>,
    /// Output format: compact, pretty, or canonical.
    #[arg(long, value_name = "FORMAT", default_value = "compact")]
    format: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config file.
    Validate,
    /// Print the canonical example config.
    Example,
}

/// Log level values accepted by `--log-level`.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevelArg {
    /// Failures only.
    Error,
    /// Failures and warnings.
    Warning,
    /// Normal progress.
    Info,
    /// Diagnostic detail.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warning => Self::Warning,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

/// Language values accepted by `--lang`.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match dispatch().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn dispatch() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env: Arc<dyn Environment> = Arc::new(ProcessEnvironment);
    let locale = resolve_locale(cli.lang, env.var(LANG_ENV).as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let log_level = cli.log_level.map(LogLevel::from);
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => Ok(command_run(cli.config, log_level, env).await),
        Commands::Convert(command) => command_convert(&command, cli.config.as_deref(), env.as_ref()),
        Commands::Config {
            command,
        } => command_config(&command, cli.config.as_deref(), env.as_ref()),
    }
}

/// Resolves the locale from the CLI flag, else the environment.
fn resolve_locale(cli: Option<LangArg>, env_value: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = cli {
        return Ok(lang.into());
    }
    match env_value {
        None => Ok(Locale::En),
        Some(value) if value.trim().is_empty() => Ok(Locale::En),
        Some(value) => Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        }),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Runs the action; every failure becomes an `::error::` command and exit 1.
async fn command_run(
    config_path: Option<PathBuf>,
    log_level: Option<LogLevel>,
    env: Arc<dyn Environment>,
) -> ExitCode {
    let runner = match prepare_runner(config_path, log_level, env).await {
        Ok(runner) => runner,
        Err(err) => return emit_workflow_error(&err.to_string()),
    };
    match tojson_cli::run(runner).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => emit_workflow_error(&t!("run.failed", error = err)),
    }
}

/// Loads config and context, then builds the runner on the blocking pool.
async fn prepare_runner(
    config_path: Option<PathBuf>,
    log_level: Option<LogLevel>,
    env: Arc<dyn Environment>,
) -> CliResult<ActionRunner> {
    let mut config = ActionConfig::load(config_path.as_deref(), env.as_ref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    config
        .apply_log_overrides(log_level, env.as_ref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let context = ActionContext::from_environment(env.as_ref())
        .map_err(|err| CliError::new(t!("context.invalid", error = err)))?;
    tokio::task::spawn_blocking(move || build_runner(config, context, env))
        .await
        .map_err(|err| CliError::new(t!("run.task_failed", error = err)))?
}

/// Builds process-backed dependencies and wires the runner.
fn build_runner(
    config: ActionConfig,
    context: ActionContext,
    env: Arc<dyn Environment>,
) -> CliResult<ActionRunner> {
    let transport_config = ReqwestTransportConfig {
        timeout: Duration::from_millis(config.api.timeout_ms),
        user_agent: config.api.user_agent.clone(),
        max_response_bytes: config.api.max_response_bytes,
    };
    let transport = ReqwestTransport::new(&transport_config)
        .map_err(|err| CliError::new(t!("run.wiring_failed", error = err)))?;
    let output: Arc<dyn OutputSink> = match &context.output_path {
        Some(path) => Arc::new(FileCommandOutput::new(path.clone(), std::io::stdout())),
        None => Arc::new(StdoutCommandOutput::new(std::io::stdout())),
    };
    let log: Arc<dyn RunLog> = match config.log.format {
        LogFormat::Workflow => Arc::new(WorkflowCommandLog::new(std::io::stdout(), config.log.level)),
        LogFormat::Json => Arc::new(JsonLinesLog::new(std::io::stderr(), config.log.level)),
    };
    let wiring = ActionWiring {
        config,
        context,
        inputs: Arc::new(EnvInputProvider::new(env)),
        transport: Arc::new(transport),
        output,
        log,
    };
    wiring.into_runner().map_err(|err| CliError::new(t!("run.wiring_failed", error = err)))
}

// ============================================================================
// SECTION: Convert Command
// ============================================================================

/// Converts a local document and prints the JSON.
fn command_convert(
    command: &ConvertCommand,
    config_path: Option<&Path>,
    env: &dyn Environment,
) -> CliResult<ExitCode> {
    let config = ActionConfig::load(config_path, env)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let options = config.convert_options();
    let text = read_input(&command.input, options.max_input_bytes)?;
    let format = JsonFormat::parse(&command.format)
        .map_err(|err| CliError::new(t!("convert.failed", error = err)))?;
    let converted =
        convert_yaml(&text, &options).map_err(|err| CliError::new(t!("convert.failed", error = err)))?;
    let filtered = apply_filter(&converted, command.filter.as_deref().unwrap_or_default())
        .map_err(|err| CliError::new(t!("convert.failed", error = err)))?;
    let rendered = render_json(&filtered, format, &options)
        .map_err(|err| CliError::new(t!("convert.failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Reads a file or stdin (`-`) as UTF-8 with a byte limit.
fn read_input(input: &str, max_bytes: usize) -> CliResult<String> {
    let read_failed = |err: &dyn std::fmt::Display| {
        CliError::new(t!("input.read_failed", path = input, error = err))
    };
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    if input == "-" {
        std::io::stdin().lock().take(limit).read_to_end(&mut bytes).map_err(|err| read_failed(&err))?;
    } else {
        let file = std::fs::File::open(input).map_err(|err| read_failed(&err))?;
        file.take(limit).read_to_end(&mut bytes).map_err(|err| read_failed(&err))?;
    }
    if bytes.len() > max_bytes {
        return Err(CliError::new(t!("input.read_too_large", path = input, limit = max_bytes)));
    }
    String::from_utf8(bytes).map_err(|err| read_failed(&err))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(
    command: &ConfigCommand,
    config_path: Option<&Path>,
    env: &dyn Environment,
) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            ActionConfig::load(config_path, env)
                .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

/// Emits an `::error::` workflow command and returns a failure exit code.
fn emit_workflow_error(message: &str) -> ExitCode {
    if write_stdout_line(&WorkflowCommand::error(message).to_string()).is_err() {
        return emit_error(message);
    }
    ExitCode::FAILURE
}
