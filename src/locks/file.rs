//! Lock file acquisition, inspection, and release.

use super::id::LockId;
use super::info::LockInfo;
use crate::error::{Result, StateLockError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Take a lock by creating `lock_path` exclusively and writing `info` into it.
///
/// # Returns
///
/// * `Ok(LockId)` - The ID recorded in the new lock file
/// * `Err(StateLockError::Lock)` - The lock is already held, or the file could not be written
pub fn acquire_lock_file(lock_path: &Path, info: &LockInfo) -> Result<LockId> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            StateLockError::Lock(format!(
                "failed to create lock directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                // Surface the current holder so the operator knows which ID to force-unlock
                let existing = match LockInfo::from_file(lock_path) {
                    Ok(held) => format!(
                        "\nLock Info:\n  ID:        {}\n  Path:      {}\n  Operation: {}\n  Who:       {}\n  Created:   {}",
                        held.id,
                        held.path,
                        held.operation,
                        held.who,
                        held.created.format("%Y-%m-%d %H:%M:%S UTC")
                    ),
                    Err(_) => format!("\nLock: {}", lock_path.display()),
                };
                StateLockError::Lock(format!("state is locked by another process{}", existing))
            } else {
                StateLockError::Lock(format!(
                    "failed to acquire lock '{}': {}",
                    lock_path.display(),
                    e
                ))
            }
        })?;

    let json = info.to_json()?;
    file.write_all(json.as_bytes()).map_err(|e| {
        let _ = fs::remove_file(lock_path);
        StateLockError::Lock(format!("failed to write lock info: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(lock_path);
        StateLockError::Lock(format!("failed to sync lock file: {}", e))
    })?;

    debug!(lock = %lock_path.display(), id = %info.id, "lock file created");
    Ok(info.id.clone())
}

/// Read the lock currently recorded at `lock_path`, if any.
pub fn read_lock_file(lock_path: &Path) -> Result<Option<LockInfo>> {
    if !lock_path.exists() {
        return Ok(None);
    }
    LockInfo::from_file(lock_path).map(Some)
}

/// Release the lock at `lock_path` if it was issued under `id`.
///
/// The ID must match the one stored in the file. A lock file whose contents
/// cannot be parsed names no holder (its creator died before writing the
/// metadata), so it is removed whatever `id` is given.
///
/// # Returns
///
/// * `Ok(())` - Lock file removed
/// * `Err(StateLockError::Lock)` - No lock held, ID mismatch, or removal failed
pub fn release_lock_file(lock_path: &Path, id: &LockId) -> Result<()> {
    let content = match fs::read_to_string(lock_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StateLockError::Lock(format!(
                "no lock held at '{}'",
                lock_path.display()
            )));
        }
        Err(e) => {
            return Err(StateLockError::Lock(format!(
                "failed to read lock file '{}': {}",
                lock_path.display(),
                e
            )));
        }
    };

    let held: LockInfo = match serde_json::from_str(&content) {
        Ok(held) => held,
        Err(e) => {
            warn!(
                lock = %lock_path.display(),
                error = %e,
                "lock file has no readable holder; removing it"
            );
            return remove_lock_file(lock_path, id);
        }
    };

    if &held.id != id {
        return Err(StateLockError::Lock(format!(
            "lock ID {:?} does not match existing lock {:?} held by {}",
            id.as_str(),
            held.id.as_str(),
            held.who
        )));
    }

    remove_lock_file(lock_path, id)
}

fn remove_lock_file(lock_path: &Path, id: &LockId) -> Result<()> {
    fs::remove_file(lock_path).map_err(|e| {
        StateLockError::Lock(format!(
            "failed to remove lock file '{}': {}",
            lock_path.display(),
            e
        ))
    })?;

    debug!(lock = %lock_path.display(), id = %id, "lock file removed");
    Ok(())
}
