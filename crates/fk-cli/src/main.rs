mod clipboard;
mod config;
mod error;
mod logging;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fk_core::{
    DerivationMode, DerivationRequest, DeriveOptions, FieldInput, SUPPORTED_LENGTHS,
    assess_strength, derive, included_values, is_supported_length,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::clipboard::ClipboardClearArgs;
use crate::config::{AppConfig, config_get, config_set, load_config, save_config};
use crate::error::{CliError, CliExitCode, map_derive_error, map_io_error};
use crate::logging::{LogLevel, audit_event, init_logging, log_event};

const JSON_SCHEMA_VERSION: u8 = 1;

#[derive(Debug)]
struct CommandOutput {
    message: String,
    payload: Value,
}

#[derive(Debug, Parser)]
#[command(name = "fk")]
#[command(about = "Deterministic password derivation from field values", version)]
struct Cli {
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Derive a password from ordered field values
    Derive(DeriveArgs),
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    #[command(hide = true)]
    Internal {
        #[command(subcommand)]
        command: InternalCommand,
    },
}

#[derive(Debug, Subcommand)]
enum InternalCommand {
    #[command(hide = true)]
    ClipboardClear(ClipboardClearArgs),
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    Get { key: String },
    Set { key: String, value: String },
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Direct,
    Structured,
}

impl ModeArg {
    const fn into_core(self) -> DerivationMode {
        match self {
            Self::Direct => DerivationMode::Direct,
            Self::Structured => DerivationMode::Structured,
        }
    }
}

#[derive(Debug, Args)]
struct DeriveArgs {
    /// Field values in order; the order changes the password
    values: Vec<String>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long)]
    length: Option<usize>,
    /// JSON array of {"label", "value", "included"} objects
    #[arg(long, conflicts_with_all = ["values", "stdin"])]
    fields: Option<PathBuf>,
    /// Read one value per line from stdin
    #[arg(long, conflicts_with = "values")]
    stdin: bool,
    #[arg(long)]
    reverse_interior: bool,
    /// Append a zxcvbn strength estimate
    #[arg(long)]
    assess: bool,
    /// Copy to the clipboard instead of printing
    #[arg(long)]
    copy: bool,
}

#[derive(Debug, Serialize)]
struct JsonEnvelope {
    schema_version: u8,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    code: u8,
    kind: String,
    message: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(output) => {
            if cli.json {
                print_envelope(&JsonEnvelope {
                    schema_version: JSON_SCHEMA_VERSION,
                    ok: true,
                    result: Some(output.payload),
                    error: None,
                });
            } else {
                println!("{}", output.message);
            }
            ExitCode::from(CliExitCode::Success as u8)
        }
        Err(error) => {
            if cli.json {
                print_envelope(&JsonEnvelope {
                    schema_version: JSON_SCHEMA_VERSION,
                    ok: false,
                    result: None,
                    error: Some(JsonError {
                        code: error.code as u8,
                        kind: error.kind.to_owned(),
                        message: error.message.clone(),
                    }),
                });
            } else {
                eprintln!("{}", error.message);
            }
            ExitCode::from(error.code as u8)
        }
    }
}

fn print_envelope(envelope: &JsonEnvelope) {
    match serde_json::to_string(envelope) {
        Ok(line) => println!("{line}"),
        Err(error) => eprintln!("failed to serialize JSON output: {error}"),
    }
}

fn execute(cli: &Cli) -> Result<CommandOutput, CliError> {
    let (mut config, config_path) = load_config(cli.config.clone())?;
    init_logging(&config.logging);

    match &cli.command {
        Command::Derive(args) => handle_derive(cli, &config, args),
        Command::Config { command } => handle_config(command, &mut config, &config_path),
        Command::Internal { command } => match command {
            InternalCommand::ClipboardClear(args) => clipboard::handle_clear(args),
        },
    }
}

fn handle_derive(
    cli: &Cli,
    config: &AppConfig,
    args: &DeriveArgs,
) -> Result<CommandOutput, CliError> {
    let mode = args
        .mode
        .map_or(config.generator.default_mode, ModeArg::into_core);
    let target_length = args.length.unwrap_or(config.generator.default_length);
    if !is_supported_length(target_length) {
        return Err(CliError::usage(format!(
            "length must be one of {SUPPORTED_LENGTHS:?}, got {target_length}"
        )));
    }

    let fields = collect_fields(args)?;
    let values = included_values(&fields).map_err(|error| {
        log_event(
            LogLevel::Info,
            "derive_rejected",
            "derive",
            json!({ "field_count": fields.len(), "reason": error.to_string() }),
        );
        map_derive_error(error)
    })?;

    let options = DeriveOptions {
        reverse_interior: args.reverse_interior || config.generator.reverse_interior,
        min_word_len: config.generator.min_word_length,
        ..DeriveOptions::default()
    };
    let request =
        DerivationRequest::new(values.iter().copied(), mode, target_length).with_options(options);
    let derivation = derive(&request).map_err(map_derive_error)?;
    let password = derivation.password.as_str();

    for warning in &derivation.warnings {
        log_event(
            LogLevel::Warn,
            "degenerate_complexity",
            "derive",
            json!({ "warning": warning }),
        );
        if !cli.json {
            eprintln!("warning: {warning}");
        }
    }
    log_event(
        LogLevel::Info,
        "derive_completed",
        "derive",
        json!({
            "mode": mode.as_str(),
            "target_length": target_length,
            "field_count": values.len(),
            "warnings": derivation.warnings.len(),
        }),
    );

    let strength = args.assess.then(|| assess_strength(password, &values));
    let cleared_after = if args.copy {
        Some(clipboard::copy_with_timeout(
            password,
            config.security.clipboard_timeout_seconds,
        )?)
    } else {
        None
    };

    let mut message = match cleared_after {
        Some(Some(seconds)) => format!("Copied to clipboard (clears in {seconds}s)"),
        Some(None) => "Copied to clipboard".to_owned(),
        None => password.to_owned(),
    };
    if let Some(assessment) = &strength {
        message.push('\n');
        message.push_str(&assessment.summary());
    }

    let mut payload = json!({
        "mode": mode.as_str(),
        "length": target_length,
        "field_count": values.len(),
        "warnings": derivation.warnings,
    });
    if cleared_after.is_none() {
        payload["value"] = json!(password);
    }
    if let Some(assessment) = strength {
        payload["strength"] = json!(assessment);
    }
    if let Some(clear_after_seconds) = cleared_after {
        payload["clipboard"] = json!({
            "copied": true,
            "clear_after_seconds": clear_after_seconds,
        });
    }

    Ok(CommandOutput { message, payload })
}

fn collect_fields(args: &DeriveArgs) -> Result<Vec<FieldInput>, CliError> {
    if let Some(path) = &args.fields {
        return read_fields_file(path);
    }

    if args.stdin {
        let mut fields = Vec::new();
        for (index, line) in io::stdin().lock().lines().enumerate() {
            let line = line.map_err(map_io_error)?;
            fields.push(FieldInput::new(format!("Field {}", index + 1), line));
        }
        return Ok(fields);
    }

    if args.values.is_empty() {
        return Err(CliError::usage(
            "no field values given: pass VALUES, --fields FILE or --stdin",
        ));
    }

    Ok(args
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| FieldInput::new(format!("Field {}", index + 1), value.as_str()))
        .collect())
}

fn read_fields_file(path: &Path) -> Result<Vec<FieldInput>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(map_io_error)?;
    serde_json::from_str::<Vec<FieldInput>>(&raw).map_err(|error| CliError {
        code: CliExitCode::CorruptOrParse,
        kind: "fields_parse_failed",
        message: format!("failed to parse {}: {error}", path.display()),
    })
}

fn handle_config(
    command: &ConfigCommand,
    config: &mut AppConfig,
    config_path: &Path,
) -> Result<CommandOutput, CliError> {
    match command {
        ConfigCommand::Get { key } => {
            let value = config_get(config, key)
                .ok_or_else(|| CliError::usage(format!("unknown config key `{key}`")))?;
            Ok(CommandOutput {
                message: value.clone(),
                payload: json!({
                    "key": key,
                    "value": value
                }),
            })
        }
        ConfigCommand::Set { key, value } => {
            config_set(config, key, value)?;
            save_config(config, config_path)?;
            let applied = config_get(config, key).unwrap_or_default();
            audit_event(
                "config_changed",
                json!({
                    "key": key,
                    "setting": applied
                }),
            );
            Ok(CommandOutput {
                message: format!("Updated {key}"),
                payload: json!({
                    "key": key,
                    "value": applied
                }),
            })
        }
        ConfigCommand::List => Ok(CommandOutput {
            message: toml::to_string_pretty(config)
                .unwrap_or_else(|_| "failed to serialize config".to_owned()),
            payload: serde_json::to_value(config).map_err(|_| {
                CliError::general("config_serialize_failed", "failed to serialize config")
            })?,
        }),
    }
}
