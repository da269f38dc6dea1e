//! State in a directory shared between machines.

use super::{Locker, StateHandle, StorageKind};
use crate::error::Result;
use crate::fs::{atomic_write, read_optional};
use crate::locks::{self, LockId, LockInfo};
use std::path::{Path, PathBuf};

/// Named state in a shared directory, typically a network mount.
///
/// Layout: `{dir}/{name}.state` holds the state and `{dir}/{name}.lock` the
/// lock. Unlocking requires the exact ID recorded in the lock file.
#[derive(Debug, Clone)]
pub struct SharedState {
    dir: PathBuf,
    name: String,
}

impl SharedState {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(format!("{}.state", self.name))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", self.name))
    }
}

impl StateHandle for SharedState {
    fn describe(&self) -> String {
        format!(
            "shared state \"{}\" in {}",
            self.name,
            self.dir.display()
        )
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Shared
    }

    fn read(&self) -> Result<Option<String>> {
        read_optional(self.state_path())
    }

    fn write(&self, contents: &str) -> Result<()> {
        atomic_write(self.state_path(), contents.as_bytes())
    }

    fn locker(&self) -> Option<&dyn Locker> {
        Some(self)
    }
}

impl Locker for SharedState {
    fn lock(&self, info: &LockInfo) -> Result<LockId> {
        let info = info
            .clone()
            .with_path(self.state_path().display().to_string());
        locks::acquire_lock_file(&self.lock_path(), &info)
    }

    fn lock_info(&self) -> Result<Option<LockInfo>> {
        locks::read_lock_file(&self.lock_path())
    }

    fn unlock(&self, id: &LockId) -> Result<()> {
        locks::release_lock_file(&self.lock_path(), id)
    }
}
