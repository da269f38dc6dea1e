//! Opaque lock identifier.

use crate::error::{Result, StateLockError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier naming one lock instance.
///
/// The format is owned by whichever backend issued it; statelock only
/// guarantees the string is non-empty and passes it through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(pub(super) String);

impl LockId {
    /// Build a lock ID, rejecting empty input with a usage error.
    ///
    /// Whitespace is not trimmed: `" abc"` is a different ID from `"abc"`.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(StateLockError::Usage(
                "force-unlock requires a non-empty lock ID argument".to_string(),
            ));
        }
        Ok(Self(raw))
    }

    /// Build a lock ID from an optional command-line argument.
    pub fn from_arg(arg: Option<&str>) -> Result<Self> {
        match arg {
            Some(raw) => Self::new(raw),
            None => Err(StateLockError::Usage(
                "force-unlock requires a lock ID argument".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
