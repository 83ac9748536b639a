//! Error types and exit codes for mnemo
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (bad identifiers, unknown project, corrupt config)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - invalid identifiers, unknown project (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during mnemo operations
#[derive(Error, Debug)]
pub enum MnemoError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or text)")]
    UnknownFormat(String),

    #[error("{0}")]
    Usage(String),

    // Data/validation errors (exit code 3)
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid {field}: {value:?}")]
    InvalidName { field: &'static str, value: String },

    #[error("project not found: {project}")]
    ProjectNotFound { project: String },

    #[error("invalid config in {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("inconsistent rules document: {reason}")]
    RulesParse { reason: String },

    // Generic failures (exit code 1)
    #[error("section '{section}' of project '{project}' is locked by another writer")]
    Busy { project: String, section: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl MnemoError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            MnemoError::UnknownFormat(_) | MnemoError::Usage(_) => ExitCode::Usage,

            MnemoError::EmptyField { .. }
            | MnemoError::InvalidName { .. }
            | MnemoError::ProjectNotFound { .. }
            | MnemoError::InvalidConfig { .. }
            | MnemoError::RulesParse { .. } => ExitCode::Data,

            MnemoError::Busy { .. }
            | MnemoError::Io(_)
            | MnemoError::Json(_)
            | MnemoError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            MnemoError::UnknownFormat(_) => "unknown_format",
            MnemoError::Usage(_) => "usage_error",
            MnemoError::EmptyField { .. } | MnemoError::InvalidName { .. } => "validation_error",
            MnemoError::ProjectNotFound { .. } => "not_found",
            MnemoError::InvalidConfig { .. } => "config_error",
            MnemoError::RulesParse { .. } => "parse_error",
            MnemoError::Busy { .. } => "busy",
            MnemoError::Io(_) => "io_error",
            MnemoError::Json(_) => "json_error",
            MnemoError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for mnemo operations
pub type Result<T> = std::result::Result<T, MnemoError>;
