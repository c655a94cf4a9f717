//! Configuration for dualscreen
//!
//! Settings come from a TOML file; command-line flags override them.

pub mod settings;

pub use settings::{ConfigError, LoggingSettings, PlacementSettings, Settings, WatchSettings};
