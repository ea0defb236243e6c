//! Namespaced TTL + LRU store
//!
//! One `Mutex` guards the whole store, so every public operation is atomic
//! and one key always maps to one value. Expiry is checked lazily on read;
//! `purge_expired` sweeps on demand.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::entry::{CacheEntry, CacheWeight};
use super::stats::{CacheInfo, CacheStats, NamespaceInfo};
use crate::domain::ports::Clock;

/// Size limits and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLimits {
    pub max_entries: usize,
    pub max_memory_bytes: usize,
    /// Share of entries dropped per eviction round (at least one)
    pub eviction_fraction: f64,
    /// TTL used by `set_default`; 0 means no expiry
    pub default_ttl_secs: u64,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max_entries: 5000,
            max_memory_bytes: 50 * 1024 * 1024,
            eviction_fraction: 0.1,
            default_ttl_secs: 0,
        }
    }
}

struct Inner<V> {
    namespaces: HashMap<String, HashMap<String, CacheEntry<V>>>,
    entries: usize,
    memory: usize,
    seq: u64,
    stats: CacheStats,
}

impl<V> Inner<V> {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Option<CacheEntry<V>> {
        let bucket = self.namespaces.get_mut(namespace)?;
        let entry = bucket.remove(key)?;
        if bucket.is_empty() {
            self.namespaces.remove(namespace);
        }
        self.entries -= 1;
        self.memory = self.memory.saturating_sub(entry.size_estimate);
        Some(entry)
    }

    /// Keys of the `n` least recently accessed entries
    fn oldest(&self, n: usize) -> Vec<(String, String)> {
        let mut all: Vec<(u64, &str, &str)> = self
            .namespaces
            .iter()
            .flat_map(|(ns, bucket)| {
                bucket
                    .values()
                    .map(move |e| (e.access_seq, ns.as_str(), e.key.as_str()))
            })
            .collect();
        all.sort_unstable_by_key(|(seq, _, _)| *seq);
        all.into_iter()
            .take(n)
            .map(|(_, ns, key)| (ns.to_string(), key.to_string()))
            .collect()
    }

    fn evict(&mut self, victims: Vec<(String, String)>) -> usize {
        let mut evicted = 0;
        for (ns, key) in victims {
            if self.remove(&ns, &key).is_some() {
                evicted += 1;
            }
        }
        self.stats.evictions += evicted as u64;
        evicted
    }
}

/// Thread-safe cache of `V` values grouped by namespace
pub struct Cache<V> {
    inner: Mutex<Inner<V>>,
    limits: CacheLimits,
    clock: Arc<dyn Clock>,
}

impl<V: CacheWeight + Clone> Cache<V> {
    pub fn new(limits: CacheLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                namespaces: HashMap::new(),
                entries: 0,
                memory: 0,
                seq: 0,
                stats: CacheStats::default(),
            }),
            limits,
            clock,
        }
    }

    pub fn limits(&self) -> &CacheLimits {
        &self.limits
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read a value, refreshing its LRU position
    pub fn get(&self, namespace: &str, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let seq = inner.next_seq();

        let expired = match inner.namespaces.get(namespace).and_then(|b| b.get(key)) {
            None => {
                inner.stats.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            inner.remove(namespace, key);
            inner.stats.expirations += 1;
            inner.stats.misses += 1;
            return None;
        }

        inner.stats.hits += 1;
        let entry = inner
            .namespaces
            .get_mut(namespace)
            .and_then(|b| b.get_mut(key))?;
        entry.access_seq = seq;
        entry.last_accessed = now;
        Some(entry.value.clone())
    }

    /// Presence check; purges the entry if it has expired
    pub fn has(&self, namespace: &str, key: &str) -> bool {
        let now = self.clock.now();
        let mut inner = self.lock();
        let expired = match inner.namespaces.get(namespace).and_then(|b| b.get(key)) {
            None => return false,
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            inner.remove(namespace, key);
            inner.stats.expirations += 1;
        }
        !expired
    }

    /// Store a value with the configured default TTL
    pub fn set_default(&self, namespace: &str, key: &str, value: V) -> bool {
        self.set(namespace, key, value, self.limits.default_ttl_secs)
    }

    /// Store a value; `false` when it is too large to ever fit
    pub fn set(&self, namespace: &str, key: &str, value: V, ttl_secs: u64) -> bool {
        let size = value.weight() + key.len() + namespace.len();
        let mut inner = self.lock();

        if size > self.limits.max_memory_bytes {
            inner.stats.rejected += 1;
            debug!(namespace, key, size, "cache value larger than memory limit");
            return false;
        }

        inner.remove(namespace, key);

        if inner.entries >= self.limits.max_entries
            || inner.memory >= self.limits.max_memory_bytes
        {
            let fraction = (inner.entries as f64 * self.limits.eviction_fraction) as usize;
            let victims = inner.oldest(fraction.max(1));
            let evicted = inner.evict(victims);
            debug!(namespace, evicted, "cache eviction round");
        }
        while inner.memory + size > self.limits.max_memory_bytes && inner.entries > 0 {
            let victims = inner.oldest(1);
            inner.evict(victims);
        }

        let now = self.clock.now();
        let seq = inner.next_seq();
        inner
            .namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(
                key.to_string(),
                CacheEntry {
                    namespace: namespace.to_string(),
                    key: key.to_string(),
                    value,
                    created_at: now,
                    last_accessed: now,
                    access_seq: seq,
                    ttl_secs,
                    size_estimate: size,
                },
            );
        inner.entries += 1;
        inner.memory += size;
        inner.stats.sets += 1;
        true
    }

    pub fn delete(&self, namespace: &str, key: &str) -> bool {
        self.lock().remove(namespace, key).is_some()
    }

    /// Remove every key of `namespace` matching the glob; returns the count
    pub fn invalidate(&self, namespace: &str, pattern: &str) -> usize {
        let mut inner = self.lock();
        let keys: Vec<String> = match inner.namespaces.get(namespace) {
            Some(bucket) => bucket
                .keys()
                .filter(|k| super::glob::glob_matches(pattern, k))
                .cloned()
                .collect(),
            None => return 0,
        };
        for key in &keys {
            inner.remove(namespace, key);
        }
        keys.len()
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.namespaces.clear();
        inner.entries = 0;
        inner.memory = 0;
    }

    /// Drop every expired entry in all namespaces
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.lock();
        let expired: Vec<(String, String)> = inner
            .namespaces
            .iter()
            .flat_map(|(ns, bucket)| {
                bucket
                    .values()
                    .filter(|e| e.is_expired(now))
                    .map(move |e| (ns.clone(), e.key.clone()))
            })
            .collect();
        for (ns, key) in &expired {
            inner.remove(ns, key);
        }
        inner.stats.expirations += expired.len() as u64;
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.entries = inner.entries;
        stats.memory_bytes = inner.memory;
        stats.refresh_hit_rate();
        stats
    }

    pub fn info(&self) -> CacheInfo {
        let inner = self.lock();
        let namespaces = inner
            .namespaces
            .iter()
            .map(|(ns, bucket)| {
                (
                    ns.clone(),
                    NamespaceInfo {
                        entries: bucket.len(),
                        memory_bytes: bucket.values().map(|e| e.size_estimate).sum(),
                    },
                )
            })
            .collect();
        CacheInfo {
            max_entries: self.limits.max_entries,
            max_memory_bytes: self.limits.max_memory_bytes,
            eviction_fraction: self.limits.eviction_fraction,
            default_ttl_secs: self.limits.default_ttl_secs,
            namespaces,
        }
    }
}
