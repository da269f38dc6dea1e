//! Config loading and validation.

use super::model::Config;
use super::types::BackendKind;
use crate::error::{Result, StateLockError};
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(StateLockError::Backend)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            StateLockError::Backend(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(config = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| StateLockError::Backend(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            StateLockError::Backend(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_stale_minutes` must be positive
    /// - `shared` and `snapshot` backends need a `path`
    /// - `backend.name` must be non-empty and contain no path separators
    pub fn validate(&self) -> Result<()> {
        if self.lock_stale_minutes == 0 {
            return Err(StateLockError::Backend(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        let backend = &self.backend;
        if matches!(backend.kind, BackendKind::Shared | BackendKind::Snapshot)
            && backend.path.is_none()
        {
            return Err(StateLockError::Backend(format!(
                "config validation failed: the {} backend requires backend.path",
                backend.kind
            )));
        }

        if backend.name.is_empty() {
            return Err(StateLockError::Backend(
                "config validation failed: backend.name must be non-empty".to_string(),
            ));
        }

        if backend.name.contains(['/', '\\']) || backend.name == ".." {
            return Err(StateLockError::Backend(format!(
                "config validation failed: backend.name must not contain path separators (found '{}')",
                backend.name
            )));
        }

        Ok(())
    }
}
