//! The release call itself.

use crate::error::{Result, StateLockError};
use crate::locks::LockId;
use crate::state::StateHandle;
use tracing::{debug, warn};

/// Release the lock named by `lock_id` through `handle`'s locker.
///
/// Calls the backend exactly once and never retries. The ID is forwarded
/// verbatim; whether it has to match the current holder is for the backend to
/// decide, so a success here does not prove the right lock was removed.
pub fn unlock(handle: &dyn StateHandle, lock_id: &LockId) -> Result<()> {
    let locker = handle
        .locker()
        .ok_or_else(|| StateLockError::Unsupported(handle.describe()))?;

    debug!(lock_id = %lock_id, "releasing lock");
    locker.unlock(lock_id).map_err(|e| {
        warn!(lock_id = %lock_id, error = %e, "backend refused to release lock");
        match e {
            StateLockError::Lock(message) | StateLockError::State(message) => {
                StateLockError::Unlock(message)
            }
            other => StateLockError::Unlock(other.to_string()),
        }
    })
}
