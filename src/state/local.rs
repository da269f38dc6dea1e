//! Single-file local state.

use super::{Locker, StateHandle, StorageKind};
use crate::error::Result;
use crate::fs::{atomic_write, read_optional};
use crate::locks::{self, LockId, LockInfo};
use std::path::{Path, PathBuf};

/// State kept in one file on this machine.
///
/// The lock is a hidden sibling file (`.{name}.lock.info`). It keeps local
/// processes from interleaving writes, but it is not a distributed lock.
#[derive(Debug, Clone)]
pub struct LocalState {
    path: PathBuf,
}

impl LocalState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "state".to_string());
        self.path.with_file_name(format!(".{}.lock.info", name))
    }
}

impl StateHandle for LocalState {
    fn describe(&self) -> String {
        format!("local state at {}", self.path.display())
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Local
    }

    fn read(&self) -> Result<Option<String>> {
        read_optional(&self.path)
    }

    fn write(&self, contents: &str) -> Result<()> {
        atomic_write(&self.path, contents.as_bytes())
    }

    fn locker(&self) -> Option<&dyn Locker> {
        Some(self)
    }
}

impl Locker for LocalState {
    fn lock(&self, info: &LockInfo) -> Result<LockId> {
        let info = info.clone().with_path(self.path.display().to_string());
        locks::acquire_lock_file(&self.lock_path(), &info)
    }

    fn lock_info(&self) -> Result<Option<LockInfo>> {
        locks::read_lock_file(&self.lock_path())
    }

    fn unlock(&self, id: &LockId) -> Result<()> {
        locks::release_lock_file(&self.lock_path(), id)
    }
}
