//! Configuration loading
//!
//! Files are read with `toml`; `serde_ignored` collects keys the schema
//! does not know so they can be reported instead of silently dropped.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{EngineConfig, LogFormat, UnknownLanes};

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "rackfit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(EngineConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(path, &content)
}

pub(crate) fn parse_with_warnings(
    path: &Path,
    content: &str,
) -> Result<(EngineConfig, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: EngineConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the config file to use.
///
/// An explicit path wins; otherwise `./rackfit.toml`, then the user config
/// (`~/.config/rackfit/config.toml`). `None` means built-in defaults.
pub fn locate(explicit: Option<&Path>, project_root: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(root) = project_root {
        let project = root.join(PROJECT_CONFIG_FILE);
        if project.exists() {
            return Some(project);
        }
    }
    user_config_path().filter(|p| p.exists())
}

/// Load the highest-priority config file plus `RACKFIT_*` overrides
pub fn load_hierarchy(
    explicit: Option<&Path>,
    project_root: Option<&Path>,
) -> Result<(EngineConfig, Vec<ConfigWarning>), ConfigError> {
    let (config, warnings) = match locate(explicit, project_root) {
        Some(path) => load_with_warnings(&path)?,
        None => (EngineConfig::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rackfit").join("config.toml"))
}

/// Apply environment variable overrides (RACKFIT_* prefix)
pub fn with_env_overrides(config: EngineConfig) -> EngineConfig {
    with_overrides_from(config, |name| std::env::var(name).ok())
}

pub(crate) fn with_overrides_from(
    mut config: EngineConfig,
    var: impl Fn(&str) -> Option<String>,
) -> EngineConfig {
    if let Some(n) = var("RACKFIT_CACHE_MAX_ENTRIES").and_then(|v| v.trim().parse().ok()) {
        config.cache.max_entries = n;
    }
    if let Some(n) = var("RACKFIT_CACHE_MAX_MEMORY").and_then(|v| v.trim().parse().ok()) {
        config.cache.max_memory_bytes = n;
    }
    if let Some(n) = var("RACKFIT_SPEC_TTL").and_then(|v| v.trim().parse().ok()) {
        config.cache.spec_ttl_secs = n;
    }

    if let Some(mode) = var("RACKFIT_UNKNOWN_LANES") {
        config.validation.unknown_lanes = match mode.to_lowercase().as_str() {
            "assume" => UnknownLanes::Assume,
            _ => UnknownLanes::Warn,
        };
    }
    if let Some(val) = var("RACKFIT_REPORT_ALL_ECC") {
        config.validation.report_all_ecc_offenders = val.to_lowercase() != "false" && val != "0";
    }

    if let Some(level) = var("RACKFIT_LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
        config.logging.level = level;
    }
    if let Some(format) = var("RACKFIT_LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "cache",
        "max_entries",
        "max_memory_bytes",
        "eviction_fraction",
        "spec_ttl_secs",
        "validation",
        "unknown_lanes",
        "report_all_ecc_offenders",
        "logging",
        "level",
        "format",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
