use std::process::{Command as ProcessCommand, Stdio};
use std::time::Duration;

use arboard::Clipboard;
use clap::Args;
use data_encoding::BASE64URL_NOPAD;
use getrandom::fill;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::CommandOutput;
use crate::error::{CliError, map_io_error};
use crate::logging::audit_event;

#[derive(Debug, Args)]
pub struct ClipboardClearArgs {
    #[arg(long)]
    expected_hash: String,
    #[arg(long)]
    token: String,
    #[arg(long)]
    timeout_seconds: u32,
}

/// Copies `value` and, unless `timeout_seconds` is 0, spawns a detached
/// `internal clipboard-clear` that wipes it later if it is still there.
pub fn copy_with_timeout(value: &str, timeout_seconds: u32) -> Result<Option<u32>, CliError> {
    let mut clipboard = Clipboard::new().map_err(map_clipboard_error)?;
    set_text_secure(&mut clipboard, value)?;

    if timeout_seconds == 0 {
        audit_event("clipboard_copied", json!({ "clear_after_seconds": null }));
        return Ok(None);
    }

    let mut token = [0u8; 16];
    fill(&mut token).map_err(|_| {
        CliError::general("random_failed", "failed to generate clipboard token")
    })?;
    let expected_hash = expected_hash(&token, value.as_bytes());

    spawn_clear(timeout_seconds, &token, &expected_hash)?;
    audit_event(
        "clipboard_copied",
        json!({ "clear_after_seconds": timeout_seconds }),
    );
    Ok(Some(timeout_seconds))
}

pub fn handle_clear(args: &ClipboardClearArgs) -> Result<CommandOutput, CliError> {
    if args.timeout_seconds == 0 {
        return Ok(CommandOutput {
            message: "Clipboard clear skipped (timeout disabled)".to_owned(),
            payload: json!({
                "cleared": false,
                "timeout_seconds": 0
            }),
        });
    }

    let expected = BASE64URL_NOPAD
        .decode(args.expected_hash.as_bytes())
        .map_err(|_| CliError::usage("invalid expected hash encoding"))?;
    let token = BASE64URL_NOPAD
        .decode(args.token.as_bytes())
        .map_err(|_| CliError::usage("invalid token encoding"))?;

    std::thread::sleep(Duration::from_secs(u64::from(args.timeout_seconds)));

    let Ok(mut clipboard) = Clipboard::new() else {
        return Ok(not_cleared("Clipboard unavailable", "clipboard_unavailable"));
    };
    let Ok(current) = clipboard.get_text() else {
        return Ok(not_cleared(
            "Clipboard content unavailable",
            "clipboard_read_failed",
        ));
    };

    if expected == expected_hash(&token, current.as_bytes()) {
        let _ = clipboard.clear();
        audit_event("clipboard_cleared", json!({}));
        Ok(CommandOutput {
            message: "Clipboard cleared".to_owned(),
            payload: json!({
                "cleared": true
            }),
        })
    } else {
        Ok(not_cleared(
            "Clipboard changed; not clearing",
            "clipboard_changed",
        ))
    }
}

fn not_cleared(message: &str, reason: &'static str) -> CommandOutput {
    audit_event("clipboard_clear_skipped", json!({ "reason": reason }));
    CommandOutput {
        message: message.to_owned(),
        payload: json!({
            "cleared": false,
            "reason": reason
        }),
    }
}

fn expected_hash(token: &[u8], value: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token);
    hasher.update(value);
    hasher.finalize().to_vec()
}

#[cfg(target_os = "macos")]
fn set_text_secure(clipboard: &mut Clipboard, value: &str) -> Result<(), CliError> {
    use arboard::SetExtApple;

    clipboard
        .set()
        .exclude_from_history()
        .text(value.to_owned())
        .map_err(map_clipboard_error)
}

#[cfg(windows)]
fn set_text_secure(clipboard: &mut Clipboard, value: &str) -> Result<(), CliError> {
    use arboard::SetExtWindows;

    clipboard
        .set()
        .exclude_from_monitoring()
        .text(value.to_owned())
        .map_err(map_clipboard_error)
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_text_secure(clipboard: &mut Clipboard, value: &str) -> Result<(), CliError> {
    use arboard::SetExtLinux;

    clipboard
        .set()
        .exclude_from_history()
        .text(value.to_owned())
        .map_err(map_clipboard_error)
}

#[cfg(not(any(
    target_os = "macos",
    windows,
    all(
        unix,
        not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
    )
)))]
fn set_text_secure(clipboard: &mut Clipboard, value: &str) -> Result<(), CliError> {
    clipboard
        .set_text(value.to_owned())
        .map_err(map_clipboard_error)
}

fn spawn_clear(timeout_seconds: u32, token: &[u8], expected_hash: &[u8]) -> Result<(), CliError> {
    let exe = std::env::current_exe().map_err(map_io_error)?;
    let token_encoded = BASE64URL_NOPAD.encode(token);
    let expected_encoded = BASE64URL_NOPAD.encode(expected_hash);

    let mut command = ProcessCommand::new(exe);
    command
        .arg("internal")
        .arg("clipboard-clear")
        .arg("--timeout-seconds")
        .arg(timeout_seconds.to_string())
        .arg("--token")
        .arg(token_encoded)
        .arg("--expected-hash")
        .arg(expected_encoded)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    command.spawn().map_err(map_io_error)?;
    Ok(())
}

fn map_clipboard_error(error: arboard::Error) -> CliError {
    CliError::general("clipboard_error", error.to_string())
}
