//! Exit code constants for the statelock CLI.
//!
//! Every way a force-unlock can end has its own code so scripts wrapping the
//! tool can tell an operator cancellation apart from a hard failure:
//! - 0: Lock released
//! - 1: Usage error (missing/empty lock ID, bad arguments)
//! - 2: Backend could not be resolved or configured
//! - 3: Backend does not support locking
//! - 4: Local state refused (single-process storage)
//! - 5: Operator declined the confirmation
//! - 6: Confirmation input could not be read
//! - 7: Backend release call failed

/// Lock released.
pub const SUCCESS: i32 = 0;

/// Usage error: missing or empty lock ID, malformed arguments.
pub const USER_ERROR: i32 = 1;

/// Backend resolution failure: bad config, missing directory, unknown backend.
pub const BACKEND_FAILURE: i32 = 2;

/// The resolved backend has no locking capability.
pub const UNSUPPORTED_BACKEND: i32 = 3;

/// The resolved backend is local single-process storage.
pub const LOCAL_ONLY: i32 = 4;

/// The operator answered the confirmation prompt with anything but `yes`.
pub const CANCELLED: i32 = 5;

/// Reading the confirmation answer failed (closed stream, I/O error).
pub const PROMPT_FAILURE: i32 = 6;

/// Lock or unlock call against the backend failed.
pub const LOCK_FAILURE: i32 = 7;
