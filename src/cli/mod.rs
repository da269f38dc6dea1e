//! CLI argument parsing for statelock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Statelock: manual recovery for stuck state locks.
///
/// Commands that modify shared state take a lock first. When the lock holder
/// dies without releasing it, `force-unlock` releases it by hand.
#[derive(Parser, Debug)]
#[command(name = "statelock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for statelock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manually release a stuck state lock.
    ///
    /// Removes the lock identified by LOCK_ID from the configured backend.
    /// This does not modify the state itself. Local state is never unlocked
    /// this way, even with --force.
    ForceUnlock(ForceUnlockArgs),
}

/// Arguments for the `force-unlock` command.
#[derive(Args, Debug, Clone)]
pub struct ForceUnlockArgs {
    /// Lock ID reported in the "state is locked" error.
    ///
    /// Optional at the parser level so a missing ID is reported by
    /// statelock with its own usage message.
    #[arg(value_name = "LOCK_ID")]
    pub lock_id: Option<String>,

    /// Configuration directory (default: current directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Don't ask for input for unlock confirmation.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command-line arguments, without exiting on error.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Cli::try_parse()
    }
}
