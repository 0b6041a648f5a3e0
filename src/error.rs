//! Exit codes and structured error reporting.

use serde::Serialize;

/// Exit codes for pdfdupe.
///
/// - 0: Success (plan executed without failures)
/// - 1: General error (bad folder, unexpected failure)
/// - 2: Nothing to do (no candidates, no duplicates, or nothing to delete)
/// - 3: Partial success (some files failed to hash or delete)
/// - 4: Cancelled at the confirmation prompt (or a dry run)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// The plan ran and every deletion succeeded.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The run ended in an empty-result state.
    NothingToDo = 2,
    /// The run completed with per-file failures.
    PartialSuccess = 3,
    /// The plan was shown but not executed.
    Cancelled = 4,
    /// Interrupted by Ctrl+C.
    Interrupted = 130,
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
            Self::Success => "PD000",
            Self::GeneralError => "PD001",
            Self::NothingToDo => "PD002",
            Self::PartialSuccess => "PD003",
            Self::Cancelled => "PD004",
            Self::Interrupted => "PD130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Choose the exit code for an error that escaped `run_app`.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<crate::duplicates::FinderError>() {
        Some(crate::duplicates::FinderError::Interrupted) => ExitCode::Interrupted,
        _ => ExitCode::GeneralError,
    }
}
