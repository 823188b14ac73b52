//! Parsing and validation of `strata.toml` configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`StrataConfig`], including the [`MemberSettings`] consumed by member caches.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
