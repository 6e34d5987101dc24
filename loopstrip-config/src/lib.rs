//! Configuration loading for loopstrip carousels.
//!
//! Resolves a [`CarouselConfig`] from environment variables, a config file
//! (TOML or JSON) or compiled defaults, applies single-field overrides and
//! validates the result before a host mounts a carousel with it.

/// Source resolution, overrides and validation.
pub mod loader;

pub use loader::{
    CONFIG_JSON_VAR, CONFIG_PATH_VAR, ConfigFormat, ConfigLoad, ConfigLoader,
    ConfigSource,
};
pub use loopstrip_core::{AdvanceMode, CarouselConfig, ConfigError};
