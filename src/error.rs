//! Error types for bugtrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad command, unknown bug, bad config)
//! - 3: Blocked by workflow (action not legal in the bug's current state)
//! - 4: Operation failed (I/O, encoding, lock contention)

use std::path::PathBuf;
use thiserror::Error;

use crate::bug::BugId;
use crate::command::Action;
use crate::state::BugState;

/// Exit codes for the bt CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const WORKFLOW_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for bugtrack operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid command: {0}")]
    Validation(String),

    #[error("Bug not found: {0}")]
    BugNotFound(BugId),

    #[error("Duplicate bug id: {0}")]
    DuplicateBugId(BugId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Workflow blocks (exit code 3)
    #[error("Unsupported transition: {action} is not allowed while {state}")]
    UnsupportedTransition { state: BugState, action: Action },

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

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_)
            | Error::BugNotFound(_)
            | Error::DuplicateBugId(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            // Workflow blocks
            Error::UnsupportedTransition { .. } => exit_codes::WORKFLOW_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::UnsupportedTransition { state, action } => Some(serde_json::json!({
                "state": state.as_str(),
                "action": action.as_str(),
                "allowed": state
                    .legal_actions()
                    .iter()
                    .map(|action| action.as_str())
                    .collect::<Vec<_>>(),
            })),
            Error::BugNotFound(id) | Error::DuplicateBugId(id) => {
                Some(serde_json::json!({ "id": id }))
            }
            Error::Validation(message)
            | Error::InvalidConfig(message)
            | Error::InvalidArgument(message) => {
                Some(serde_json::json!({ "message": message }))
            }
            Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.to_string_lossy() }))
            }
            _ => None,
        }
    }
}

/// Result type alias for bugtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
