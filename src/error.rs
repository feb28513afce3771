//! Error types for todoapp
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, bad config)
//! - 3: Authentication failed or no active session
//! - 4: Operation failed (storage I/O, serialization, locking)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_FAILED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Rejections from the mocked login/signup flow.
///
/// These are the only failures the stores surface as user-visible messages.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please fill in all fields correctly")]
    InvalidFields,
}

/// Main error type for todoapp operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task id '{input}' is ambiguous: {}", matches.join(", "))]
    AmbiguousTask { input: String, matches: Vec<String> },

    // Authentication (exit code 3)
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Not signed in")]
    NotAuthenticated,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Stored value is not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTask { .. } => exit_codes::USER_ERROR,

            Error::Auth(_) | Error::NotAuthenticated => exit_codes::AUTH_FAILED,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::InvalidUtf8(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, when the variant carries any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::AmbiguousTask { input, matches } => Some(serde_json::json!({
                "input": input,
                "matches": matches,
            })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::LockFailed(path) | Error::InvalidUtf8(path) => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        }
    }
}

/// Result type alias for todoapp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
