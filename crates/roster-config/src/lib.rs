//! # Roster Config
//!
//! Typed service configuration: a YAML schema checked with `validator`,
//! loaded from disk (or defaults) and then overridden from the environment.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{CacheConfig, Config, LoggingSettings, ServerConfig, UpstreamConfig};
