//! Configuration module
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (AUTOLOT_*)
//! 3. Working-directory config (./autolot.toml)
//! 4. User config (<config_dir>/autolot/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{apply_env, with_env_overrides, ConfigError, ConfigWarning};
pub use types::{
    Config, LogConfig, OutputConfig, OutputFormat, StoreBackend, StoreConfig, ValidationConfig,
};
