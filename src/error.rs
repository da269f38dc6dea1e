//! Error types for the statelock CLI.
//!
//! Uses thiserror for derive macros and provides operator-facing messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for statelock operations.
///
/// Each variant maps to its own exit code. `Cancelled` is an operator decision
/// rather than a failure, but it still ends the run without unlocking.
#[derive(Error, Debug)]
pub enum StateLockError {
    /// Missing or empty lock ID, or otherwise unusable arguments.
    #[error("{0}")]
    Usage(String),

    /// The state backend could not be loaded.
    #[error("Failed to load backend: {0}")]
    Backend(String),

    /// Reading or writing persisted state failed.
    #[error("State error: {0}")]
    State(String),

    /// The backend exposes no locking capability.
    #[error(
        "The state backend in use does not support locking, and therefore cannot be unlocked: {0}"
    )]
    Unsupported(String),

    /// The backend stores state in a single local file.
    #[error("Local state cannot be unlocked by another process: {0}")]
    LocalOnly(String),

    /// The operator did not confirm the unlock.
    #[error("force-unlock cancelled.")]
    Cancelled,

    /// The confirmation answer could not be read.
    #[error("Error asking for confirmation: {0}")]
    Prompt(String),

    /// The backend release call failed.
    #[error("Failed to unlock state: {0}")]
    Unlock(String),

    /// A lock could not be taken, read, or is held by someone else.
    #[error("Lock error: {0}")]
    Lock(String),
}

impl StateLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StateLockError::Usage(_) => exit_codes::USER_ERROR,
            StateLockError::Backend(_) => exit_codes::BACKEND_FAILURE,
            StateLockError::State(_) => exit_codes::BACKEND_FAILURE,
            StateLockError::Unsupported(_) => exit_codes::UNSUPPORTED_BACKEND,
            StateLockError::LocalOnly(_) => exit_codes::LOCAL_ONLY,
            StateLockError::Cancelled => exit_codes::CANCELLED,
            StateLockError::Prompt(_) => exit_codes::PROMPT_FAILURE,
            StateLockError::Unlock(_) => exit_codes::LOCK_FAILURE,
            StateLockError::Lock(_) => exit_codes::LOCK_FAILURE,
        }
    }

    /// Whether this outcome was chosen by the operator rather than caused by a fault.
    pub fn is_operator_cancel(&self) -> bool {
        matches!(self, StateLockError::Cancelled)
    }
}

/// Result type alias for statelock operations.
pub type Result<T> = std::result::Result<T, StateLockError>;
