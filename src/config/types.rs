//! Configuration types and defaults for statelock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which state backend a configuration directory uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Single state file on this machine (default).
    #[default]
    Local,
    /// Named state in a directory shared between machines.
    Shared,
    /// Read-only published state, without locking.
    Snapshot,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Shared => "shared",
            BackendKind::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File name of the config file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "statelock.yaml";

/// Default local state file name.
pub const DEFAULT_STATE_FILE: &str = "state.json";

/// Suffix appended to a state path to form its default backup path.
pub const BACKUP_SUFFIX: &str = ".backup";

pub(crate) fn default_state_name() -> String {
    "default".to_string()
}

pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}

pub(crate) fn default_true() -> bool {
    true
}
