//! Simulation runner for cache algorithms
//!
//! Every selected algorithm replays the same request sequence under the same
//! byte budget. A hit only touches the entry. A miss pays the request's cost,
//! admits the object and then evicts least valuable entries until the
//! resident bytes fit the budget again. Objects larger than the whole budget
//! are never admitted.

use std::time::Instant;

use ahash::RandomState as AHashRandomState;
use landlord_cache::config::{LandlordConfig, LruConfig};
use landlord_cache::metrics::CacheMetrics;
use landlord_cache::{
    Cache, EvictionPolicy, LandlordCached, LandlordLazy, LandlordNaive, LruPolicy,
};
use lru::LruCache;
use tracing::{debug, info};

use crate::models::{AlgorithmStats, CacheAlgorithm, Request, SimulationConfig};
use crate::stats::SimulationStats;

/// The simulated cache for one algorithm.
enum CacheWrapper {
    LandlordNaive(Cache<String, (), LandlordNaive<String, ()>>),
    LandlordCached(Cache<String, (), LandlordCached<String, ()>>),
    LandlordLazy(Cache<String, (), LandlordLazy<String, ()>>),
    Lru(Cache<String, (), LruPolicy<String, ()>>),
    /// Maps keys to their size, recency kept by the `lru` crate
    LruCrate(LruCache<String, u64, AHashRandomState>),
}

impl CacheWrapper {
    fn new(algorithm: CacheAlgorithm) -> Self {
        match algorithm {
            CacheAlgorithm::LandlordNaive => {
                CacheWrapper::LandlordNaive(Cache::with_policy(LandlordNaive::new(
                    LandlordConfig::new(),
                )))
            }
            CacheAlgorithm::LandlordCached => {
                CacheWrapper::LandlordCached(Cache::with_policy(LandlordCached::new(
                    LandlordConfig::new(),
                )))
            }
            CacheAlgorithm::LandlordLazy => {
                CacheWrapper::LandlordLazy(Cache::with_policy(LandlordLazy::new(
                    LandlordConfig::new(),
                )))
            }
            CacheAlgorithm::Lru => {
                CacheWrapper::Lru(Cache::with_policy(LruPolicy::new(LruConfig::new())))
            }
            CacheAlgorithm::LruCrate => {
                CacheWrapper::LruCrate(LruCache::unbounded_with_hasher(AHashRandomState::new()))
            }
        }
    }

    /// Looks up `key`, returning whether it was a hit.
    fn access(&mut self, key: &str, refill: bool) -> bool {
        match self {
            CacheWrapper::LandlordNaive(cache) => cache.retrieve(key, refill).is_some(),
            CacheWrapper::LandlordCached(cache) => cache.retrieve(key, refill).is_some(),
            CacheWrapper::LandlordLazy(cache) => cache.retrieve(key, refill).is_some(),
            CacheWrapper::Lru(cache) => cache.retrieve(key, refill).is_some(),
            // recency is the only thing a hit can refresh here
            CacheWrapper::LruCrate(cache) if refill => cache.get(key).is_some(),
            CacheWrapper::LruCrate(cache) => cache.peek(key).is_some(),
        }
    }

    fn admit(&mut self, request: &Request) {
        let key = request.key.clone();
        match self {
            CacheWrapper::LandlordNaive(cache) => cache.add(key, (), request.size, request.cost),
            CacheWrapper::LandlordCached(cache) => cache.add(key, (), request.size, request.cost),
            CacheWrapper::LandlordLazy(cache) => cache.add(key, (), request.size, request.cost),
            CacheWrapper::Lru(cache) => cache.add(key, (), request.size, request.cost),
            CacheWrapper::LruCrate(cache) => {
                cache.put(key, request.size);
            }
        }
    }

    /// Evicts one entry and returns its size.
    fn evict_one(&mut self) -> Option<u64> {
        match self {
            CacheWrapper::LandlordNaive(cache) => evicted_size(cache),
            CacheWrapper::LandlordCached(cache) => evicted_size(cache),
            CacheWrapper::LandlordLazy(cache) => evicted_size(cache),
            CacheWrapper::Lru(cache) => evicted_size(cache),
            CacheWrapper::LruCrate(cache) => cache.pop_lru().map(|(_, size)| size),
        }
    }

    /// Hands back an entry left over from the last eviction pass, if any.
    ///
    /// A Landlord pass can exhaust several entries at once. They leave the
    /// policy together, so their bytes stop counting right away.
    fn take_staged(&mut self) -> Option<u64> {
        match self {
            CacheWrapper::LandlordNaive(cache) => staged_size(cache),
            CacheWrapper::LandlordCached(cache) => staged_size(cache),
            CacheWrapper::LandlordLazy(cache) => staged_size(cache),
            CacheWrapper::Lru(cache) => staged_size(cache),
            CacheWrapper::LruCrate(_) => None,
        }
    }

    /// Largest batch one eviction pass produced. The `lru` crate always
    /// evicts one entry at a time.
    fn max_eviction_batch(&self, evictions: u64) -> u64 {
        let metrics = match self {
            CacheWrapper::LandlordNaive(cache) => cache.metrics(),
            CacheWrapper::LandlordCached(cache) => cache.metrics(),
            CacheWrapper::LandlordLazy(cache) => cache.metrics(),
            CacheWrapper::Lru(cache) => cache.metrics(),
            CacheWrapper::LruCrate(_) => return evictions.min(1),
        };
        metrics
            .get("max_eviction_batch")
            .map_or(0, |batch| *batch as u64)
    }
}

fn evicted_size<P>(cache: &mut Cache<String, (), P>) -> Option<u64>
where
    P: EvictionPolicy<String, ()>,
{
    cache.remove_least_valuable().map(|(_, size)| size)
}

fn staged_size<P>(cache: &mut Cache<String, (), P>) -> Option<u64>
where
    P: EvictionPolicy<String, ()>,
{
    if cache.pending_evictions() == 0 {
        return None;
    }
    evicted_size(cache)
}

/// Runs the configured algorithms over a request sequence
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Replay `requests` against every algorithm in turn.
    pub fn run(&self, requests: &[Request]) -> SimulationStats {
        let mut stats = SimulationStats::new(&self.config);
        for &algorithm in &self.config.algorithms {
            info!(
                %algorithm,
                requests = requests.len(),
                budget = self.config.budget,
                "simulating"
            );
            let result = self.run_algorithm(algorithm, requests);
            info!(
                %algorithm,
                hit_rate = result.hit_rate(),
                time_ms = result.simulation_time_ms,
                "finished"
            );
            stats.record(algorithm, result);
        }
        stats
    }

    fn run_algorithm(&self, algorithm: CacheAlgorithm, requests: &[Request]) -> AlgorithmStats {
        let budget = self.config.budget;
        let mut cache = CacheWrapper::new(algorithm);
        let mut stats = AlgorithmStats::new();
        let mut used: u64 = 0;
        let start = Instant::now();

        for request in requests {
            if cache.access(&request.key, self.config.refill) {
                stats.hits += 1;
                stats.bytes_hit += request.size;
                stats.cost_hit += request.cost;
                continue;
            }

            stats.misses += 1;
            stats.bytes_miss += request.size;
            stats.cost_miss += request.cost;

            if request.size > budget {
                stats.bypassed += 1;
                continue;
            }

            cache.admit(request);
            used += request.size;
            while used > budget {
                match cache.evict_one() {
                    Some(size) => {
                        used -= size;
                        stats.evictions += 1;
                    }
                    None => break,
                }
            }
            while let Some(size) = cache.take_staged() {
                used -= size;
                stats.evictions += 1;
            }
            stats.peak_bytes = stats.peak_bytes.max(used);
        }

        stats.simulation_time_ms = start.elapsed().as_millis() as u64;
        stats.max_eviction_batch = cache.max_eviction_batch(stats.evictions);
        debug!(%algorithm, used, evictions = stats.evictions, "replay done");
        stats
    }
}
