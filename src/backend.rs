//! Backend resolution: config directory in, state handle out.

use crate::config::types::{BACKUP_SUFFIX, DEFAULT_STATE_FILE};
use crate::config::{BackendKind, Config};
use crate::context::StateContext;
use crate::error::{Result, StateLockError};
use crate::state::{BackupState, LocalState, SharedState, SnapshotState, StateHandle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Produces the state handle for a configuration directory.
pub trait BackendResolver {
    /// Build the handle described by `config`. Called once per invocation, never retried.
    fn resolve(&self, ctx: &StateContext, config: &Config) -> Result<Box<dyn StateHandle>>;
}

/// Resolver driven by the `backend` section of `statelock.yaml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigResolver;

impl BackendResolver for ConfigResolver {
    fn resolve(&self, ctx: &StateContext, config: &Config) -> Result<Box<dyn StateHandle>> {
        let backend = &config.backend;
        debug!(kind = %backend.kind, "resolving backend");

        let handle: Box<dyn StateHandle> = match backend.kind {
            BackendKind::Local => {
                let path = ctx.resolve_path(
                    backend
                        .path
                        .as_deref()
                        .unwrap_or(Path::new(DEFAULT_STATE_FILE)),
                );
                let local: Box<dyn StateHandle> = Box::new(LocalState::new(&path));
                if backend.backup {
                    let backup = backup_path(ctx, backend.backup_path.as_deref(), &path);
                    Box::new(BackupState::new(local, backup))
                } else {
                    local
                }
            }
            BackendKind::Shared => {
                let dir = ctx.resolve_path(required_path(backend.kind, backend.path.as_deref())?);
                if !dir.is_dir() {
                    return Err(StateLockError::Backend(format!(
                        "shared state directory is not reachable: {}",
                        dir.display()
                    )));
                }
                let shared: Box<dyn StateHandle> =
                    Box::new(SharedState::new(dir, backend.name.clone()));
                if backend.backup {
                    // Backups of shared state stay on this machine
                    let fallback = ctx.config_dir.join(format!("{}.state", backend.name));
                    let backup = backup_path(ctx, backend.backup_path.as_deref(), &fallback);
                    Box::new(BackupState::new(shared, backup))
                } else {
                    shared
                }
            }
            BackendKind::Snapshot => {
                let path = ctx.resolve_path(required_path(backend.kind, backend.path.as_deref())?);
                Box::new(SnapshotState::new(path))
            }
        };

        Ok(handle)
    }
}

fn required_path(kind: BackendKind, path: Option<&Path>) -> Result<&Path> {
    path.ok_or_else(|| {
        StateLockError::Backend(format!("the {} backend requires backend.path", kind))
    })
}

fn backup_path(ctx: &StateContext, configured: Option<&Path>, state_path: &Path) -> PathBuf {
    match configured {
        Some(path) => ctx.resolve_path(path),
        None => {
            let mut name = state_path.as_os_str().to_os_string();
            name.push(BACKUP_SUFFIX);
            PathBuf::from(name)
        }
    }
}
