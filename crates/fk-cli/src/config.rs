use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use fk_core::{APP_NAME, DEFAULT_LENGTH, DerivationMode, SUPPORTED_LENGTHS, is_supported_length};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliExitCode, map_io_error};

pub const KEYS: [&str; 6] = [
    "generator.default_mode",
    "generator.default_length",
    "generator.reverse_interior",
    "generator.min_word_length",
    "security.clipboard_timeout_seconds",
    "logging.level",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub default_mode: DerivationMode,
    pub default_length: usize,
    pub reverse_interior: bool,
    pub min_word_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_mode: DerivationMode::Structured,
            default_length: DEFAULT_LENGTH,
            reverse_interior: false,
            min_word_length: fk_core::tokenizer::DEFAULT_MIN_WORD_LEN,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecurityConfig {
    pub clipboard_timeout_seconds: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            clipboard_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

pub fn load_config(config_override: Option<PathBuf>) -> Result<(AppConfig, PathBuf), CliError> {
    let config_path = match config_override {
        Some(path) => path,
        None => {
            let project_dirs = ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
                CliError::general("config_path_unavailable", "unable to resolve config path")
            })?;
            project_dirs.config_dir().join("config.toml")
        }
    };

    if !config_path.exists() {
        return Ok((AppConfig::default(), config_path));
    }

    let raw = std::fs::read_to_string(&config_path).map_err(map_io_error)?;
    let config = toml::from_str::<AppConfig>(&raw).map_err(|error| CliError {
        code: CliExitCode::CorruptOrParse,
        kind: "config_parse_failed",
        message: format!("failed to parse {}: {error}", config_path.display()),
    })?;
    validate_loaded(&config).map_err(|error| CliError {
        code: CliExitCode::CorruptOrParse,
        kind: "config_invalid",
        message: format!("{}: {}", config_path.display(), error.message),
    })?;
    Ok((config, config_path))
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(map_io_error)?;
    }
    let data = toml::to_string_pretty(config).map_err(|error| {
        CliError::general(
            "config_serialize_failed",
            format!("failed to serialize config: {error}"),
        )
    })?;
    std::fs::write(path, data).map_err(map_io_error)
}

/// Re-applies every setter to a freshly parsed file so hand edits obey the
/// same bounds as `config set`.
fn validate_loaded(config: &AppConfig) -> Result<(), CliError> {
    let mut scratch = AppConfig::default();
    for key in KEYS {
        if let Some(value) = config_get(config, key) {
            config_set(&mut scratch, key, &value)?;
        }
    }
    Ok(())
}

pub fn config_get(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "generator.default_mode" => Some(config.generator.default_mode.as_str().to_owned()),
        "generator.default_length" => Some(config.generator.default_length.to_string()),
        "generator.reverse_interior" => Some(config.generator.reverse_interior.to_string()),
        "generator.min_word_length" => Some(config.generator.min_word_length.to_string()),
        "security.clipboard_timeout_seconds" => {
            Some(config.security.clipboard_timeout_seconds.to_string())
        }
        "logging.level" => Some(config.logging.level.clone()),
        _ => None,
    }
}

pub fn config_set(config: &mut AppConfig, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "generator.default_mode" => {
            config.generator.default_mode = value
                .parse::<DerivationMode>()
                .map_err(|_| CliError::usage("generator.default_mode must be direct or structured"))?;
        }
        "generator.default_length" => {
            let parsed = parse_usize(key, value)?;
            if !is_supported_length(parsed) {
                return Err(CliError::usage(format!(
                    "generator.default_length must be one of {SUPPORTED_LENGTHS:?}"
                )));
            }
            config.generator.default_length = parsed;
        }
        "generator.reverse_interior" => {
            config.generator.reverse_interior = parse_bool(key, value)?;
        }
        "generator.min_word_length" => {
            let parsed = parse_usize(key, value)?;
            validate_usize_range(key, parsed, 1..=8)?;
            config.generator.min_word_length = parsed;
        }
        "security.clipboard_timeout_seconds" => {
            let parsed = parse_u32(key, value)?;
            validate_u32_allow_zero(key, parsed, 10..=90)?;
            config.security.clipboard_timeout_seconds = parsed;
        }
        "logging.level" => match value.trim() {
            "error" | "warn" | "info" | "debug" => config.logging.level = value.trim().to_owned(),
            _ => {
                return Err(CliError::usage(
                    "logging.level must be error|warn|info|debug",
                ));
            }
        },
        _ => return Err(CliError::usage(format!("unknown config key `{key}`"))),
    }

    Ok(())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, CliError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| CliError::usage(format!("invalid u32 value for {key}")))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, CliError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| CliError::usage(format!("invalid usize value for {key}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CliError> {
    value
        .trim()
        .parse::<bool>()
        .map_err(|_| CliError::usage(format!("invalid bool value for {key}")))
}

fn validate_u32_allow_zero(
    key: &str,
    value: u32,
    allowed: RangeInclusive<u32>,
) -> Result<(), CliError> {
    if value == 0 || allowed.contains(&value) {
        Ok(())
    } else {
        Err(CliError::usage(format!(
            "{key} out of bounds: {value} (expected 0 or {}..={})",
            allowed.start(),
            allowed.end()
        )))
    }
}

fn validate_usize_range(
    key: &str,
    value: usize,
    allowed: RangeInclusive<usize>,
) -> Result<(), CliError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CliError::usage(format!(
            "{key} out of bounds: {value} (expected {}..={})",
            allowed.start(),
            allowed.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips_through_get() {
        let config = AppConfig::default();
        for key in KEYS {
            assert!(config_get(&config, key).is_some(), "{key}");
        }
        assert_eq!(config_get(&config, "generator.nope"), None);
        assert_eq!(
            config_get(&config, "generator.default_mode").as_deref(),
            Some("structured")
        );
    }

    #[test]
    fn config_set_rejects_out_of_bounds_values() {
        let mut config = AppConfig::default();

        assert!(config_set(&mut config, "security.clipboard_timeout_seconds", "0").is_ok());
        assert!(config_set(&mut config, "security.clipboard_timeout_seconds", "9").is_err());
        assert!(config_set(&mut config, "security.clipboard_timeout_seconds", "91").is_err());
        assert!(config_set(&mut config, "generator.default_length", "7").is_err());
        assert!(config_set(&mut config, "generator.default_length", "10").is_err());
        assert!(config_set(&mut config, "generator.min_word_length", "0").is_err());
        assert!(config_set(&mut config, "generator.min_word_length", "9").is_err());
        assert!(config_set(&mut config, "generator.default_mode", "random").is_err());
        assert!(config_set(&mut config, "logging.level", "trace").is_err());
        assert!(config_set(&mut config, "unknown.key", "1").is_err());
        assert_eq!(config.security.clipboard_timeout_seconds, 0);
    }

    #[test]
    fn config_set_applies_valid_values() {
        let mut config = AppConfig::default();
        config_set(&mut config, "generator.default_mode", "direct").expect("mode");
        config_set(&mut config, "generator.default_length", "20").expect("length");
        config_set(&mut config, "generator.reverse_interior", "true").expect("bool");
        config_set(&mut config, "logging.level", " debug ").expect("level");
        assert_eq!(config.generator.default_mode, DerivationMode::Direct);
        assert_eq!(config.generator.default_length, 20);
        assert!(config.generator.reverse_interior);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: AppConfig =
            toml::from_str("[generator]\ndefault_mode = \"direct\"\n").expect("parses");
        assert_eq!(config.generator.default_mode, DerivationMode::Direct);
        assert_eq!(config.generator.default_length, DEFAULT_LENGTH);
        assert_eq!(config.security, SecurityConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config_set(&mut config, "generator.default_length", "12").expect("length");
        save_config(&config, &path).expect("saves");

        let (loaded, loaded_path) = load_config(Some(path.clone())).expect("loads");
        assert_eq!(loaded, config);
        assert_eq!(loaded_path, path);
    }

    #[test]
    fn hand_edited_out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generator]\ndefault_length = 10\n").expect("writes");
        let error = load_config(Some(path)).expect_err("rejects");
        assert_eq!(error.code, CliExitCode::CorruptOrParse);

        let garbage = dir.path().join("garbage.toml");
        std::fs::write(&garbage, "generator = 3 = 4").expect("writes");
        let error = load_config(Some(garbage)).expect_err("rejects");
        assert_eq!(error.kind, "config_parse_failed");
    }
}
