//! Cache entries and their size estimates

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::ComponentSpec;

/// Approximate in-memory footprint of a cached value
pub trait CacheWeight {
    fn weight(&self) -> usize;
}

/// What the engine memoizes
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Spec(Arc<ComponentSpec>),
    /// Negative lookup: the repository has no such component
    NotFound,
}

impl CacheWeight for CacheValue {
    fn weight(&self) -> usize {
        match self {
            CacheValue::Spec(spec) => serde_json::to_vec(spec.as_ref()).map_or(0, |v| v.len()),
            CacheValue::NotFound => 1,
        }
    }
}

impl CacheWeight for String {
    fn weight(&self) -> usize {
        self.len()
    }
}

/// One stored value with its bookkeeping
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub namespace: String,
    pub key: String,
    pub value: V,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    /// Monotonic access counter; LRU order without timestamp ties
    pub access_seq: u64,
    /// Seconds; 0 means the entry never expires
    pub ttl_secs: u64,
    pub size_estimate: usize,
}

impl<V> CacheEntry<V> {
    /// Expired once more than `ttl_secs` have passed since creation
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.ttl_secs == 0 {
            return false;
        }
        let age = now.signed_duration_since(self.created_at);
        age.num_milliseconds() > (self.ttl_secs as i64).saturating_mul(1000)
    }
}
