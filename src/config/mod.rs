//! Configuration model for statelock.
//!
//! This module defines the Config struct that represents `statelock.yaml` in
//! the configuration directory. Parsing is forward-compatible (unknown fields
//! are ignored), optional fields have defaults, and values are validated
//! after parsing.

mod model;
mod operations;
pub mod types;


pub use model::{BackendConfig, Config};
pub use types::BackendKind;
