//! Lock metadata structures and utilities.

use super::id::LockId;
use crate::error::{Result, StateLockError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lock metadata stored in lock files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Identifier the holder must present to release the lock.
    pub id: LockId,

    /// The operation being performed while the lock is held.
    pub operation: String,

    /// Holder of the lock (e.g., `user@HOST`).
    pub who: String,

    /// Process ID of the lock holder (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was created (RFC3339).
    pub created: DateTime<Utc>,

    /// State location the lock protects.
    #[serde(default)]
    pub path: String,

    /// Free-form note left by the holder.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
}

impl LockInfo {
    /// Create new lock metadata for `operation` with a fresh ID.
    pub fn new(operation: &str) -> Self {
        let created = Utc::now();
        let pid = std::process::id();
        Self {
            id: LockId(generate_id(created, pid)),
            operation: operation.to_string(),
            who: owner_string(),
            pid: Some(pid),
            created,
            path: String::new(),
            info: String::new(),
        }
    }

    /// Record the state location this lock protects.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Parse lock metadata from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            StateLockError::Lock(format!(
                "failed to read lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            StateLockError::Lock(format!(
                "failed to parse lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Serialize lock metadata to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StateLockError::Lock(format!("failed to serialize lock info: {}", e)))
    }

    /// Calculate the age of the lock.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Check if the lock is stale based on the given threshold in minutes.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > stale_minutes as i64
    }
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (who: {}, age: {}, operation: {})",
            self.id,
            self.who,
            self.age_string(),
            self.operation
        )
    }
}

fn generate_id(created: DateTime<Utc>, pid: u32) -> String {
    format!("{}-{:x}", created.format("%Y%m%dT%H%M%S%.6f"), pid)
}

/// Get the `user@HOST` string for lock metadata.
pub(crate) fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
