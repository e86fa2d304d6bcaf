use fk_core::{DeriveError, EmptyInputReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    General = 1,
    Usage = 2,
    EmptyInput = 3,
    CorruptOrParse = 6,
    PermissionDenied = 8,
}

#[derive(Debug)]
pub struct CliError {
    pub code: CliExitCode,
    pub kind: &'static str,
    pub message: String,
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            code: CliExitCode::Usage,
            kind: "invalid_usage",
            message: message.into(),
        }
    }

    pub fn general(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            code: CliExitCode::General,
            kind,
            message: message.into(),
        }
    }
}

pub fn map_io_error(error: std::io::Error) -> CliError {
    let code = if error.kind() == std::io::ErrorKind::PermissionDenied {
        CliExitCode::PermissionDenied
    } else {
        CliExitCode::General
    };
    CliError {
        code,
        kind: "io_error",
        message: error.to_string(),
    }
}

pub fn map_derive_error(error: DeriveError) -> CliError {
    match error {
        DeriveError::EmptyInput(reason) => CliError {
            code: CliExitCode::EmptyInput,
            kind: match reason {
                EmptyInputReason::NoValues => "empty_input",
                EmptyInputReason::NoneIncluded => "no_included_fields",
            },
            message: reason.to_string(),
        },
        DeriveError::TooManyFields { .. } => CliError {
            code: CliExitCode::Usage,
            kind: "too_many_fields",
            message: error.to_string(),
        },
    }
}
