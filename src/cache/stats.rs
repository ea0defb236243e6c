//! Cache counters and configuration snapshots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Running counters plus current size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Values refused because they alone exceed the memory limit
    pub rejected: u64,
    pub entries: usize,
    pub memory_bytes: usize,
    /// hits / (hits + misses), 0 when nothing was read yet
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn refresh_hit_rate(&mut self) {
        let reads = self.hits + self.misses;
        self.hit_rate = if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    pub entries: usize,
    pub memory_bytes: usize,
}

/// Limits plus per-namespace occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheInfo {
    pub max_entries: usize,
    pub max_memory_bytes: usize,
    pub eviction_fraction: f64,
    pub default_ttl_secs: u64,
    pub namespaces: BTreeMap<String, NamespaceInfo>,
}
