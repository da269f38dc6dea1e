//! State handles and their optional locking capability.
//!
//! A backend hands out a [`StateHandle`]: read/write access to persisted
//! state, plus a [`Locker`] when the backend can lock. Handles may wrap other
//! handles (see [`BackupState`]); [`classify`] looks through every wrapping
//! layer to decide whether a lock can be meaningfully force-released.

mod backup;
mod capability;
mod local;
mod shared;
mod snapshot;


pub use backup::BackupState;
pub use capability::{Capability, classify, innermost};
pub use local::LocalState;
pub use shared::SharedState;
pub use snapshot::SnapshotState;

use crate::error::Result;
use crate::locks::{LockId, LockInfo};
use std::fmt;

/// Where a handle keeps its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// A single file only processes on this machine can reach.
    Local,
    /// Storage several machines can reach concurrently.
    Shared,
    /// No storage of its own; forwards to [`StateHandle::inner`].
    Wrapper,
}

/// Lock and release operations on a backend's state.
pub trait Locker {
    /// Take the lock, recording `info`. Returns the ID needed to release it.
    fn lock(&self, info: &LockInfo) -> Result<LockId>;

    /// The lock currently held, if any.
    fn lock_info(&self) -> Result<Option<LockInfo>>;

    /// Release the lock named by `id`.
    ///
    /// Whether `id` must match the current holder is up to the backend.
    fn unlock(&self, id: &LockId) -> Result<()>;
}

/// Access to one backend's persisted state.
pub trait StateHandle: fmt::Debug {
    /// Short operator-facing description, e.g. `local state at ./state.json`.
    fn describe(&self) -> String;

    fn storage(&self) -> StorageKind;

    /// The handle this one wraps, for decorators.
    fn inner(&self) -> Option<&dyn StateHandle> {
        None
    }

    /// Current state contents, `None` when nothing has been written yet.
    fn read(&self) -> Result<Option<String>>;

    fn write(&self, contents: &str) -> Result<()>;

    /// Locking capability, if the backend supports it.
    fn locker(&self) -> Option<&dyn Locker>;
}
