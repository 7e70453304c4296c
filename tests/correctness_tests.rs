//! Correctness Tests for Eviction Policies
//!
//! This module validates the fundamental correctness of each policy behind
//! the `Cache` façade using small, predictable workloads. Each test checks
//! exactly which key is evicted next.
//!
//! ## Test Strategy
//! - Few entries with hand-picked sizes and costs
//! - Explicit checks for which key each eviction call returns
//! - The same scenario run against every Landlord variant

use landlord_cache::config::{LandlordConfig, LruConfig};
use landlord_cache::metrics::CacheMetrics;
use landlord_cache::{
    Cache, CacheError, EvictionPolicy, LandlordCached, LandlordLazy, LandlordNaive, LruPolicy,
};

// ============================================================================
// HELPER FUNCTIONS FOR CACHE CREATION
// ============================================================================

fn make_naive<V>() -> Cache<&'static str, V, LandlordNaive<&'static str, V>> {
    Cache::with_policy(LandlordNaive::new(LandlordConfig::new()))
}

fn make_cached<V>() -> Cache<&'static str, V, LandlordCached<&'static str, V>> {
    Cache::with_policy(LandlordCached::new(LandlordConfig::new()))
}

fn make_lazy<V>() -> Cache<&'static str, V, LandlordLazy<&'static str, V>> {
    Cache::with_policy(LandlordLazy::new(LandlordConfig::new()))
}

fn make_lru<V>() -> Cache<&'static str, V, LruPolicy<&'static str, V>> {
    Cache::with_policy(LruPolicy::new(LruConfig::new()))
}

/// Drains the cache and returns keys in eviction order.
fn drain<V, P>(cache: &mut Cache<&'static str, V, P>) -> Vec<&'static str>
where
    P: EvictionPolicy<&'static str, V>,
{
    std::iter::from_fn(|| cache.pop_least_valuable())
        .map(|(key, _, _)| key)
        .collect()
}

/// Runs the same test body against every Landlord variant.
macro_rules! for_each_landlord {
    ($body:ident) => {{
        $body(make_naive());
        $body(make_cached());
        $body(make_lazy());
    }};
}

// ============================================================================
// LANDLORD SCENARIOS
// ============================================================================

#[test]
fn test_cheap_entry_evicted_before_expensive() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("A", (), 10, 10.0);
        cache.add("B", (), 10, 100.0);
        assert_eq!(drain(&mut cache), ["A", "B"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_density_not_cost_decides() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        // large but expensive: density 2
        cache.add("big", (), 100, 200.0);
        // small and cheap: density 5
        cache.add("small", (), 2, 10.0);
        // medium: density 0.5
        cache.add("medium", (), 20, 10.0);
        assert_eq!(drain(&mut cache), ["medium", "big", "small"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_access_protects_entry() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("a", (), 1, 10.0);
        cache.add("b", (), 1, 12.0);
        cache.add("c", (), 1, 9.0);

        // c goes, a and b pay 9 each: a=1, b=3
        assert_eq!(cache.pop_least_valuable().map(|(k, _, _)| k), Some("c"));
        // a recovers to 0.75 * 10 + 0.25 * 1 = 7.75
        cache.retrieve(&"a", true);
        assert_eq!(drain(&mut cache), ["b", "a"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_inspection_does_not_refill() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("a", (), 1, 10.0);
        cache.add("b", (), 1, 12.0);
        cache.add("c", (), 1, 9.0);
        cache.pop_least_valuable();

        assert!(cache.retrieve(&"a", false).is_some());
        assert_eq!(drain(&mut cache), ["a", "b"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_credit_bounded_by_cost_under_repeated_access() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("X", (), 5, 5.0);
        let fillers = ["f0", "f1", "f2", "f3", "f4", "f5", "f6", "f7"];
        for filler in fillers {
            cache.add(filler, (), 1, 0.25);
            for _ in 0..25 {
                assert!(cache.retrieve(&"X", true).is_some());
                let credit = cache.credit(&"X").unwrap();
                assert!(credit <= 5.0 + 1e-9, "credit {credit} exceeds cost");
                assert!(credit >= 0.0);
            }
            let (key, _, _) = cache.pop_least_valuable().unwrap();
            assert_eq!(key, filler);
        }
    }
    for_each_landlord!(check);
}

#[test]
fn test_zero_cost_entries_go_first() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("worthless", (), 1, 0.0);
        cache.add("valuable", (), 1, 1.0);
        assert_eq!(drain(&mut cache), ["worthless", "valuable"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_readmitted_key_starts_with_full_credit() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        cache.add("a", (), 1, 10.0);
        cache.add("b", (), 1, 4.0);
        assert_eq!(cache.pop_least_valuable().map(|(k, _, _)| k), Some("b"));
        cache.add("b", (), 1, 4.0);
        assert_eq!(cache.credit(&"b"), Some(4.0));
        // a has 6 left, b 4
        assert_eq!(drain(&mut cache), ["b", "a"]);
    }
    for_each_landlord!(check);
}

#[test]
fn test_remove_by_key_then_evict() {
    fn check<P: EvictionPolicy<&'static str, u32>>(mut cache: Cache<&'static str, u32, P>) {
        cache.add("a", 1, 1, 1.0);
        cache.add("b", 2, 2, 10.0);
        cache.add("c", 3, 1, 20.0);
        assert_eq!(cache.remove(&"a"), (1, 1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.remove_least_valuable(), Some((2, 2)));
        assert_eq!(cache.remove_least_valuable(), Some((3, 1)));
        assert_eq!(cache.remove_least_valuable(), None);
    }
    for_each_landlord!(check);
}

// ============================================================================
// KEY UNIQUENESS
// ============================================================================

#[test]
fn test_try_add_rejects_duplicates_for_every_policy() {
    fn check<P: EvictionPolicy<&'static str, ()>>(mut cache: Cache<&'static str, (), P>) {
        assert_eq!(cache.try_add("k", (), 1, 1.0), Ok(()));
        assert_eq!(cache.try_add("k", (), 1, 1.0), Err(CacheError::DuplicateKey));
        assert_eq!(cache.len(), 1);
    }
    for_each_landlord!(check);
    check(make_lru());
}

#[test]
#[should_panic(expected = "already resident")]
fn test_naive_duplicate_add_panics() {
    let mut cache = make_naive();
    cache.add("k", (), 1, 1.0);
    cache.add("k", (), 1, 1.0);
}

#[test]
#[should_panic(expected = "already resident")]
fn test_lazy_duplicate_add_panics() {
    let mut cache = make_lazy();
    cache.add("k", (), 1, 1.0);
    cache.add("k", (), 1, 1.0);
}

#[test]
#[should_panic(expected = "already resident")]
fn test_lru_duplicate_add_panics() {
    let mut cache = make_lru();
    cache.add("k", (), 1, 1.0);
    cache.add("k", (), 1, 1.0);
}

#[test]
#[should_panic(expected = "non-zero size")]
fn test_zero_size_add_panics() {
    let mut cache = make_cached();
    cache.add("k", (), 0, 1.0);
}

// ============================================================================
// FAÇADE BATCHING
// ============================================================================

#[test]
fn test_exactly_one_entry_per_call() {
    let mut cache = make_naive();
    for key in ["t0", "t1", "t2", "t3"] {
        cache.add(key, (), 2, 2.0);
    }
    cache.add("keeper", (), 1, 50.0);

    let mut returned = Vec::new();
    for expected_pending in [3, 2, 1, 0] {
        let (key, _, _) = cache.pop_least_valuable().unwrap();
        returned.push(key);
        assert_eq!(cache.pending_evictions(), expected_pending);
        assert_eq!(cache.len(), 1);
    }
    returned.sort_unstable();
    assert_eq!(returned, ["t0", "t1", "t2", "t3"]);
    assert_eq!(drain(&mut cache), ["keeper"]);

    let metrics = cache.metrics();
    assert_eq!(metrics["eviction_passes"], 2.0);
    assert_eq!(metrics["evictions"], 5.0);
    assert_eq!(metrics["max_eviction_batch"], 4.0);
}

#[test]
fn test_lazy_surfaces_ties_one_pass_at_a_time() {
    let mut cache = make_lazy();
    for key in ["t0", "t1", "t2"] {
        cache.add(key, (), 2, 2.0);
    }
    for _ in 0..3 {
        cache.pop_least_valuable().unwrap();
        assert_eq!(cache.pending_evictions(), 0);
    }
    assert_eq!(cache.metrics()["max_eviction_batch"], 1.0);
}

#[test]
fn test_empty_includes_staged_entries() {
    let mut cache = make_naive();
    cache.add("a", (), 1, 1.0);
    cache.add("b", (), 1, 1.0);
    cache.pop_least_valuable();
    assert_eq!(cache.len(), 0);
    assert!(!cache.is_empty());
    cache.pop_least_valuable();
    assert!(cache.is_empty());
}

// ============================================================================
// LRU
// ============================================================================

#[test]
fn test_lru_ignores_cost() {
    let mut cache = make_lru();
    cache.add("precious", (), 1, 1_000.0);
    cache.add("cheap", (), 100, 1.0);
    assert_eq!(drain(&mut cache), ["precious", "cheap"]);
}

#[test]
fn test_lru_recency_order() {
    let mut cache = make_lru();
    cache.add("a", (), 1, 1.0);
    cache.add("b", (), 1, 1.0);
    cache.add("c", (), 1, 1.0);
    cache.retrieve(&"a", true);
    cache.retrieve(&"b", false);
    assert_eq!(drain(&mut cache), ["b", "c", "a"]);
}

// ============================================================================
// METRICS
// ============================================================================

#[test]
fn test_metrics_reflect_operations() {
    let mut cache = make_cached();
    cache.add("a", (), 4, 4.0);
    cache.add("b", (), 6, 60.0);
    cache.retrieve(&"a", true);
    cache.retrieve(&"missing", true);
    cache.retrieve(&"b", false);
    cache.remove(&"b");
    cache.pop_least_valuable();

    let metrics = cache.metrics();
    assert_eq!(metrics["insertions"], 2.0);
    assert_eq!(metrics["requests"], 2.0);
    assert_eq!(metrics["cache_hits"], 1.0);
    assert_eq!(metrics["hit_rate"], 0.5);
    assert_eq!(metrics["removals"], 1.0);
    assert_eq!(metrics["evictions"], 1.0);
    assert_eq!(metrics["cache_size"], 0.0);
    assert_eq!(cache.algorithm_name(), "LandlordCached");
}

#[test]
fn test_algorithm_names() {
    assert_eq!(make_naive::<()>().algorithm_name(), "LandlordNaive");
    assert_eq!(make_cached::<()>().algorithm_name(), "LandlordCached");
    assert_eq!(make_lazy::<()>().algorithm_name(), "LandlordLazy");
    assert_eq!(make_lru::<()>().algorithm_name(), "LRU");
}
