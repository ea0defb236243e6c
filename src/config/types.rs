//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::CacheLimits;

use super::loader::{self, ConfigError, ConfigWarning};

/// Cache limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_memory_bytes: usize,
    pub eviction_fraction: f64,
    /// TTL for cached specs; 0 keeps them for the process lifetime
    pub spec_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let limits = CacheLimits::default();
        Self {
            max_entries: limits.max_entries,
            max_memory_bytes: limits.max_memory_bytes,
            eviction_fraction: limits.eviction_fraction,
            spec_ttl_secs: limits.default_ttl_secs,
        }
    }
}

impl From<&CacheConfig> for CacheLimits {
    fn from(config: &CacheConfig) -> Self {
        CacheLimits {
            max_entries: config.max_entries.max(1),
            max_memory_bytes: config.max_memory_bytes,
            eviction_fraction: config.eviction_fraction.clamp(0.0, 1.0),
            default_ttl_secs: config.spec_ttl_secs,
        }
    }
}

/// How to report a lane count the extractor had to assume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLanes {
    /// `lane_count_assumed` warning
    #[default]
    Warn,
    /// `lane_count_assumed` info only
    Assume,
}

/// Rule switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub unknown_lanes: UnknownLanes,
    /// List every non-ECC module instead of the first one
    pub report_all_ecc_offenders: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_lanes: UnknownLanes::Warn,
            report_all_ecc_offenders: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load one config file, ignoring unknown-key warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load one config file and report unknown keys
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits::from(&self.cache)
    }
}
