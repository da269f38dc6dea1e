//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one state directory.
///
/// This struct represents the contents of `statelock.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend holding the state.
    pub backend: BackendConfig,

    /// Minutes after which a held lock is reported as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            lock_stale_minutes: default_lock_stale_minutes(),
        }
    }
}

/// Backend section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend kind.
    pub kind: BackendKind,

    /// Location of the state, relative paths resolve against the config directory.
    ///
    /// - `local`: the state file (default `state.json`)
    /// - `shared`: the shared directory (required)
    /// - `snapshot`: the published state file (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// State name inside a shared directory.
    #[serde(default = "default_state_name")]
    pub name: String,

    /// Keep a backup copy of the previous state before writing.
    #[serde(default = "default_true")]
    pub backup: bool,

    /// Override for the backup file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            path: None,
            name: default_state_name(),
            backup: default_true(),
            backup_path: None,
        }
    }
}
