//! Specification cache
//!
//! In-memory memoization of repository lookups and derived values, with
//! per-entry TTL and LRU eviction under entry-count and memory limits.

mod entry;
mod glob;
mod stats;
mod store;

pub use entry::{CacheEntry, CacheValue, CacheWeight};
pub use glob::glob_matches;
pub use stats::{CacheInfo, CacheStats, NamespaceInfo};
pub use store::{Cache, CacheLimits};

/// The cache the engine uses for specs and negative lookups
pub type SpecCache = Cache<CacheValue>;
