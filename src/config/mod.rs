//! Configuration module for rackfit
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (RACKFIT_*)
//! 3. Project config (./rackfit.toml) or an explicit `--config` file
//! 4. User config (~/.config/rackfit/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load_hierarchy, load_with_warnings, locate, user_config_path, with_env_overrides,
    ConfigError, ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{
    CacheConfig, EngineConfig, LogFormat, LoggingConfig, UnknownLanes, ValidationConfig,
};
