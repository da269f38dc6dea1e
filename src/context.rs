//! Configuration directory resolution for statelock.
//!
//! Every invocation works against one configuration directory: the optional
//! `DIR` argument, or the current working directory. The directory holds the
//! `statelock.yaml` config, and statelock's own bookkeeping lives under
//! `{dir}/.statelock/`.

use crate::config::types::CONFIG_FILE_NAME;
use crate::error::{Result, StateLockError};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the bookkeeping directory inside the configuration directory.
pub const STATE_DIR_NAME: &str = ".statelock";

/// Resolved paths for one invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct StateContext {
    /// The configuration directory.
    pub config_dir: PathBuf,

    /// Bookkeeping directory (default: `{config_dir}/.statelock/`).
    pub state_dir: PathBuf,
}

impl StateContext {
    /// Resolve the context from `dir`, or from the current working directory when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(StateContext)` - Successfully resolved context
    /// * `Err(StateLockError::Backend)` - Directory missing or not a directory (exit code 2)
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            StateLockError::Backend(format!("failed to get current working directory: {}", e))
        })?;

        match dir {
            Some(dir) if dir.is_absolute() => Self::resolve_from(dir),
            Some(dir) => Self::resolve_from(cwd.join(dir)),
            None => Self::resolve_from(cwd),
        }
    }

    /// Resolve the context from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.exists() {
            return Err(StateLockError::Backend(format!(
                "configuration directory does not exist: {}",
                dir.display()
            )));
        }

        if !dir.is_dir() {
            return Err(StateLockError::Backend(format!(
                "configuration path is not a directory: {}",
                dir.display()
            )));
        }

        let config_dir = dir.to_path_buf();
        let state_dir = config_dir.join(STATE_DIR_NAME);

        Ok(Self {
            config_dir,
            state_dir,
        })
    }

    /// Resolve a configured path against the configuration directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.state_dir.join("events")
    }

    /// Get the path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }
}
