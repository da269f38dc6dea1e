//! Lock capability classification.

use super::{StateHandle, StorageKind};
use std::fmt;

/// What a force-unlock may do with a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The handle has no locking capability at all.
    NotLockable,
    /// Locks exist, but only over single-process local storage.
    LocalOnly,
    /// Locks guard storage other machines share.
    Shared,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::NotLockable => "not_lockable",
            Capability::LocalOnly => "local_only",
            Capability::Shared => "shared",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow `inner()` until reaching a handle that wraps nothing.
pub fn innermost(handle: &dyn StateHandle) -> &dyn StateHandle {
    let mut current = handle;
    while let Some(inner) = current.inner() {
        current = inner;
    }
    current
}

/// Classify a handle's lock capability.
///
/// Locking is decided on the outer handle, since that is the one the unlock
/// call goes through. Locality is decided on the innermost store: a local
/// file stays local no matter how many decorators wrap it.
pub fn classify(handle: &dyn StateHandle) -> Capability {
    if handle.locker().is_none() {
        return Capability::NotLockable;
    }

    match innermost(handle).storage() {
        StorageKind::Local => Capability::LocalOnly,
        StorageKind::Shared | StorageKind::Wrapper => Capability::Shared,
    }
}
