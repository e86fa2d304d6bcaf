//! Append-only JSON-lines log under the user's state directory.
//!
//! Field values and derived passwords never reach this file: callers log
//! counts and modes, and [`scrub_log_value`] redacts sensitive keys anyway.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use directories::ProjectDirs;
use fk_core::APP_NAME;
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::config::LoggingConfig;

const LOG_ROTATE_BYTES: u64 = 10 * 1024 * 1024;
const LOG_LEVEL_ENV: &str = "FK_LOG";

static LOG_CONTEXT: OnceLock<LogContext> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone)]
struct LogContext {
    level: LogLevel,
    correlation_id: String,
    log_path: PathBuf,
}

/// Best effort: without a state directory the process simply runs unlogged.
pub fn init_logging(config: &LoggingConfig) {
    if LOG_CONTEXT.get().is_some() {
        return;
    }

    let Some(project_dirs) = ProjectDirs::from("", "", APP_NAME) else {
        return;
    };
    let Some(state_dir) = project_dirs.state_dir() else {
        return;
    };
    let log_path = state_dir.join(format!("{APP_NAME}.log"));
    if let Some(parent) = log_path.parent()
        && std::fs::create_dir_all(parent).is_err()
    {
        return;
    }

    let level_raw = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| config.level.clone());
    let level = LogLevel::parse(&level_raw).unwrap_or(LogLevel::Info);
    let context = LogContext {
        level,
        correlation_id: Uuid::new_v4().to_string(),
        log_path,
    };
    let _ = rotate_log_if_needed(&context.log_path);
    let _ = LOG_CONTEXT.set(context);
}

pub fn audit_event(event: &str, fields: Value) {
    log_event(LogLevel::Info, event, "audit", fields);
}

pub fn log_event(level: LogLevel, event: &str, module: &str, fields: Value) {
    let mut object = serde_json::Map::new();
    object.insert("event".to_owned(), json!(event));
    match fields {
        Value::Object(extra) => object.extend(extra),
        Value::Null => {}
        other => {
            object.insert("fields".to_owned(), other);
        }
    }
    log_json_line(level, event, module, Value::Object(object));
}

fn log_json_line(level: LogLevel, msg: &str, module: &str, fields: Value) {
    let Some(context) = LOG_CONTEXT.get() else {
        return;
    };
    if level > context.level {
        return;
    }

    let line = match serde_json::to_string(&build_record(
        level,
        msg,
        module,
        &context.correlation_id,
        fields,
    )) {
        Ok(value) => value,
        Err(_) => return,
    };

    let _ = rotate_log_if_needed(&context.log_path);
    let mut file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&context.log_path)
    {
        Ok(value) => value,
        Err(_) => return,
    };
    let _ = writeln!(file, "{line}");
}

fn build_record(
    level: LogLevel,
    msg: &str,
    module: &str,
    correlation_id: &str,
    fields: Value,
) -> Value {
    let ts = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string());

    let mut object = serde_json::Map::new();
    object.insert("ts".to_owned(), json!(ts));
    object.insert("level".to_owned(), json!(level.as_str()));
    object.insert("msg".to_owned(), json!(msg));
    object.insert("correlation_id".to_owned(), json!(correlation_id));
    object.insert("module".to_owned(), json!(module));

    match scrub_log_value(fields) {
        Value::Object(extra) => {
            for (key, value) in extra {
                object.insert(key, value);
            }
        }
        other => {
            object.insert("fields".to_owned(), other);
        }
    }

    Value::Object(object)
}

fn rotate_log_if_needed(path: &Path) -> Result<(), std::io::Error> {
    let metadata = match std::fs::metadata(path) {
        Ok(value) => value,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    };
    if metadata.len() < LOG_ROTATE_BYTES {
        return Ok(());
    }

    let rotated = path.with_extension("log.1");
    if rotated.exists() {
        let _ = std::fs::remove_file(&rotated);
    }
    std::fs::rename(path, rotated)?;
    Ok(())
}

pub fn scrub_log_value(value: Value) -> Value {
    match value {
        Value::Object(values) => {
            let mut output = serde_json::Map::new();
            for (key, value) in values {
                if is_sensitive_log_key(&key) {
                    output.insert(key, json!("[REDACTED]"));
                } else {
                    output.insert(key, scrub_log_value(value));
                }
            }
            Value::Object(output)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(scrub_log_value).collect()),
        other => other,
    }
}

fn is_sensitive_log_key(key: &str) -> bool {
    matches!(
        key,
        "value" | "values" | "password" | "seed" | "fields" | "token" | "expected_hash"
    ) || key.to_ascii_lowercase().contains("secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrub_log_value_redacts_sensitive_fields() {
        let secret = "example.com|alice";
        let scrubbed = scrub_log_value(json!({
            "seed": secret,
            "nested": {
                "password": secret,
                "values": [secret],
                "mode": "structured"
            },
            "array": [
                { "token": secret },
                { "client_secret": secret }
            ]
        }));

        let encoded = serde_json::to_string(&scrubbed).expect("scrubbed JSON should encode");
        assert!(!encoded.contains(secret));
        assert!(encoded.contains("[REDACTED]"));
        assert!(encoded.contains("structured"));
    }

    #[test]
    fn record_carries_the_envelope_fields() {
        let record = build_record(
            LogLevel::Warn,
            "degenerate_complexity",
            "derive",
            "cid",
            json!({ "target_length": 3, "value": "hunter2" }),
        );
        assert_eq!(record["level"], "warn");
        assert_eq!(record["msg"], "degenerate_complexity");
        assert_eq!(record["module"], "derive");
        assert_eq!(record["correlation_id"], "cid");
        assert_eq!(record["target_length"], 3);
        assert_eq!(record["value"], "[REDACTED]");
        assert!(record["ts"].as_str().is_some_and(|ts| ts.contains('T')));
    }

    #[test]
    fn levels_parse_and_order() {
        assert_eq!(LogLevel::parse(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("trace"), None);
        assert!(LogLevel::Debug > LogLevel::Info);
        assert!(LogLevel::Error < LogLevel::Warn);
    }

    #[test]
    fn rotation_moves_oversized_logs_aside() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fk.log");
        rotate_log_if_needed(&path).expect("missing file is fine");

        let file = std::fs::File::create(&path).expect("creates");
        file.set_len(LOG_ROTATE_BYTES).expect("grows");
        drop(file);
        rotate_log_if_needed(&path).expect("rotates");
        assert!(!path.exists());
        assert!(dir.path().join("fk.log.1").exists());
    }
}
