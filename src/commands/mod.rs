//! Command implementations for statelock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

pub mod force_unlock;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::ForceUnlock(args) => force_unlock::cmd_force_unlock(args),
    }
}
