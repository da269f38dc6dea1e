//! Backup-on-write decorator.

use super::{Locker, StateHandle, StorageKind};
use crate::error::Result;
use crate::fs::atomic_write;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wraps another handle and copies its current state to a backup file
/// before the first write through this handle.
#[derive(Debug)]
pub struct BackupState {
    real: Box<dyn StateHandle>,
    backup_path: PathBuf,
    backed_up: Cell<bool>,
}

impl BackupState {
    pub fn new(real: Box<dyn StateHandle>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            real,
            backup_path: backup_path.into(),
            backed_up: Cell::new(false),
        }
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}

impl StateHandle for BackupState {
    fn describe(&self) -> String {
        format!(
            "{} (backup at {})",
            self.real.describe(),
            self.backup_path.display()
        )
    }

    fn storage(&self) -> StorageKind {
        StorageKind::Wrapper
    }

    fn inner(&self) -> Option<&dyn StateHandle> {
        Some(self.real.as_ref())
    }

    fn read(&self) -> Result<Option<String>> {
        self.real.read()
    }

    fn write(&self, contents: &str) -> Result<()> {
        if !self.backed_up.get() {
            if let Some(current) = self.real.read()? {
                atomic_write(&self.backup_path, current.as_bytes())?;
                debug!(backup = %self.backup_path.display(), "state backed up");
            }
            self.backed_up.set(true);
        }
        self.real.write(contents)
    }

    fn locker(&self) -> Option<&dyn Locker> {
        self.real.locker()
    }
}
