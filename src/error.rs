//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupeindex application.
///
/// - 0: Success
/// - 1: General error (any failure while scanning, reading or writing)
/// - 2: Key not found (lookup completed, no records under the key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The command completed normally.
    Success = 0,
    /// General error: The run was aborted.
    GeneralError = 1,
    /// Key not found: A lookup found no records under the requested key.
    KeyNotFound = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DI000",
            Self::GeneralError => "DI001",
            Self::KeyNotFound => "DI002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DI001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
