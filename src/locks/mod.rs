//! Lock identifiers, lock metadata, and the lock-file primitive backends share.
//!
//! # Lock Files
//!
//! A held lock is a file created with **create_new** semantics (exclusive
//! create), so only one process can take it at a time. Releasing the lock
//! deletes the file, after checking that the caller names the same lock ID
//! that is recorded inside it.
//!
//! # Lock Metadata
//!
//! Each lock file contains pretty-printed JSON:
//! - `id`: Opaque lock identifier handed to the holder
//! - `operation`: What the holder was doing (plan/apply/etc.)
//! - `who`: `user@HOST` of the holder
//! - `pid`: The holder's process ID (optional)
//! - `created`: RFC3339 timestamp
//! - `path`: State location the lock protects
//! - `info`: Free-form note (optional)

mod file;
mod id;
mod info;


pub use file::{acquire_lock_file, read_lock_file, release_lock_file};
pub use id::LockId;
pub use info::LockInfo;
pub(crate) use info::owner_string;
