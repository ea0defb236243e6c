//! Property tests for cache limits and glob invalidation.

use std::sync::Arc;

use proptest::prelude::*;

use rackfit::cache::{glob_matches, Cache, CacheLimits};
use rackfit::infrastructure::ManualClock;

#[derive(Debug, Clone)]
enum Op {
    Set(u8, u8),
    Get(u8),
    Delete(u8),
    Advance(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<u8>(), 0u8..64).prop_map(|(k, len)| Op::Set(k % 16, len)),
        3 => any::<u8>().prop_map(|k| Op::Get(k % 16)),
        1 => any::<u8>().prop_map(|k| Op::Delete(k % 16)),
        1 => (0u8..20).prop_map(Op::Advance),
    ]
}

fn key_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z:_-]{0,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: no sequence of operations pushes the cache past its limits,
    /// and the counters stay consistent with what was read.
    #[test]
    fn property_limits_hold_under_any_workload(
        max_entries in 1usize..8,
        ops in proptest::collection::vec(op(), 0..64),
    ) {
        let clock = Arc::new(ManualClock::default());
        let limits = CacheLimits {
            max_entries,
            max_memory_bytes: 256,
            eviction_fraction: 0.25,
            default_ttl_secs: 10,
        };
        let cache: Cache<String> = Cache::new(limits, clock.clone());
        let mut reads = 0u64;

        for op in ops {
            match op {
                Op::Set(k, len) => {
                    cache.set_default("ns", &format!("k{}", k), "v".repeat(len as usize));
                }
                Op::Get(k) => {
                    reads += 1;
                    let _ = cache.get("ns", &format!("k{}", k));
                }
                Op::Delete(k) => {
                    cache.delete("ns", &format!("k{}", k));
                }
                Op::Advance(secs) => clock.advance_secs(i64::from(secs)),
            }
            let stats = cache.stats();
            prop_assert!(stats.entries <= max_entries);
            prop_assert!(stats.memory_bytes <= 256);
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, reads);
        prop_assert!((0.0..=1.0).contains(&stats.hit_rate));
    }

    /// PROPERTY: `*` matches everything and a literal matches only itself.
    #[test]
    fn property_glob_literals_and_star(a in key_text(), b in key_text()) {
        prop_assert!(glob_matches("*", &a));
        prop_assert!(glob_matches(&a, &a));
        prop_assert_eq!(glob_matches(&a, &b), a == b);
        let (prefix_pattern, prefixed) = (format!("{}*", a), format!("{}{}", a, b));
        prop_assert!(glob_matches(&prefix_pattern, &prefixed));
    }
}
