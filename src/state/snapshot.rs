//! Read-only state snapshots.

use super::{Locker, StateHandle, StorageKind};
use crate::error::{Result, StateLockError};
use crate::fs::read_optional;
use std::path::PathBuf;

/// A state file published for reading only, e.g. an exported copy served
/// from shared storage. It has nothing to lock.
#[derive(Debug, Clone)]
pub struct SnapshotState {
    path: PathBuf,
}

impl SnapshotState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateHandle for SnapshotState {
    fn describe(&self) -> String {
        format!("read-only snapshot at {}", self.path.display())
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Shared
    }

    fn read(&self) -> Result<Option<String>> {
        read_optional(&self.path)
    }

    fn write(&self, _contents: &str) -> Result<()> {
        Err(StateLockError::State(format!(
            "snapshot state at '{}' is read-only",
            self.path.display()
        )))
    }

    fn locker(&self) -> Option<&dyn Locker> {
        None
    }
}
