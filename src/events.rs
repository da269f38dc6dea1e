//! Audit log for force-unlock attempts.
//!
//! Every force-unlock that reaches the confirmation step is recorded, whether
//! it unlocked, was cancelled, or failed. Events are stored in NDJSON format
//! (one JSON object per line) in `{dir}/.statelock/events/events.ndjson`.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The action performed (`force_unlock`)
//! - `actor`: The operator (e.g., `user@HOST`)
//! - `lock_id`: Lock ID the operator supplied
//! - `details`: Freeform object with action-specific details
//!
//! Appending is best effort from the caller's point of view: a failed append
//! is reported as a warning and never changes the outcome of the unlock.

use crate::context::StateContext;
use crate::error::{Result, StateLockError};
use crate::locks::LockId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Manual lock release attempted
    ForceUnlock,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::ForceUnlock => write!(f, "force_unlock"),
        }
    }
}

/// How a recorded attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Unlocked,
    Cancelled,
    PromptFailed,
    Failed,
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The operator who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Lock ID the action targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_id: Option<LockId>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: crate::locks::owner_string(),
            lock_id: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the lock ID for this event.
    pub fn with_lock_id(mut self, lock_id: &LockId) -> Self {
        self.lock_id = Some(lock_id.clone());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StateLockError::State(format!("failed to serialize event: {}", e)))
    }
}

/// Append an event to the events log, creating the file if needed.
pub fn append_event(ctx: &StateContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    if !events_dir.exists() {
        fs::create_dir_all(&events_dir).map_err(|e| {
            StateLockError::State(format!(
                "failed to create events directory '{}': {}",
                events_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            StateLockError::State(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        StateLockError::State(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        StateLockError::State(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read every event in the log, oldest first. A missing log reads as empty.
pub fn read_events(ctx: &StateContext) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    if !events_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&events_file).map_err(|e| {
        StateLockError::State(format!(
            "failed to read events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .map_err(|e| StateLockError::State(format!("failed to parse event: {}", e)))
        })
        .collect()
}
