//! Cache Metrics System
//!
//! Every [`Cache`](crate::Cache) keeps a [`CoreCacheMetrics`] record and
//! reports it through the [`CacheMetrics`] trait as a `BTreeMap`.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap keeps metric names in a deterministic order, so simulator output
//! and test snapshots are reproducible. With about a dozen keys the
//! O(log n) lookup cost does not matter.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters maintained by the cache façade.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Lookups that counted as accesses (`retrieve` with a refill).
    pub requests: u64,

    /// Accesses that found the key resident.
    pub cache_hits: u64,

    /// Entries admitted.
    pub insertions: u64,

    /// Entries removed by key outside of eviction.
    pub removals: u64,

    /// Entries surfaced by eviction passes.
    pub evictions: u64,

    /// Calls into the policy's eviction routine.
    pub eviction_passes: u64,

    /// Largest number of entries a single pass surfaced.
    pub max_eviction_batch: u64,

    /// Sum of the sizes of all resident entries.
    pub cache_size: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed metrics record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an access that found the key resident.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records an access for a key that was not resident.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records an admission of `size` units.
    pub fn record_insertion(&mut self, size: u64) {
        self.insertions += 1;
        self.cache_size += size;
    }

    /// Records a removal by key of `size` units.
    pub fn record_removal(&mut self, size: u64) {
        self.removals += 1;
        self.cache_size -= size;
    }

    /// Records one eviction pass that surfaced `batch` entries totalling
    /// `batch_size` units.
    pub fn record_eviction_pass(&mut self, batch: u64, batch_size: u64) {
        self.eviction_passes += 1;
        self.evictions += batch;
        self.max_eviction_batch = self.max_eviction_batch.max(batch);
        self.cache_size -= batch_size;
    }

    /// Returns `cache_hits / requests`, or `0.0` before the first request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Returns the fraction of requests that missed, or `0.0` before the
    /// first request.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Returns the mean number of entries surfaced per eviction pass.
    pub fn avg_eviction_batch(&self) -> f64 {
        if self.eviction_passes > 0 {
            self.evictions as f64 / self.eviction_passes as f64
        } else {
            0.0
        }
    }

    /// Convert metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("eviction_passes".to_string(), self.eviction_passes as f64);
        metrics.insert(
            "max_eviction_batch".to_string(),
            self.max_eviction_batch as f64,
        );
        metrics.insert("cache_size".to_string(), self.cache_size as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());
        metrics.insert("avg_eviction_batch".to_string(), self.avg_eviction_batch());

        metrics
    }
}

/// Uniform metrics interface, so the simulator can compare policies.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. `"LandlordLazy"`, `"LRU"`).
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_before_any_request() {
        let metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);
        assert_eq!(metrics.avg_eviction_batch(), 0.0);
    }

    #[test]
    fn test_counters() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_insertion(10);
        metrics.record_insertion(5);
        metrics.record_insertion(1);
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_hit();
        metrics.record_removal(1);
        metrics.record_eviction_pass(2, 15);

        assert_eq!(metrics.cache_size, 0);
        assert_eq!(metrics.max_eviction_batch, 2);
        assert_eq!(metrics.avg_eviction_batch(), 2.0);

        let map = metrics.to_btreemap();
        assert_eq!(map["requests"], 3.0);
        assert_eq!(map["cache_misses"], 1.0);
        assert_eq!(map["insertions"], 3.0);
        assert_eq!(map["evictions"], 2.0);
        let hit_rate = map["hit_rate"];
        assert!(hit_rate > 0.666 && hit_rate < 0.667);
    }
}
