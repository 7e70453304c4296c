//! Equivalence Tests for the Landlord Variants
//!
//! The naive, cached and lazy Landlord policies differ only in bookkeeping.
//! These tests drive all three with the same seeded random workloads and
//! check that they evict the same keys in the same order.
//!
//! Costs are drawn from a continuous range so that no two entries share a
//! credit density; among exact ties the eviction order is unspecified.

use landlord_cache::config::LandlordConfig;
use landlord_cache::mcd::{CachedMcd, CreditDensity, McdTracker, NaiveMcd};
use landlord_cache::{
    Cache, CacheEntry, EvictionPolicy, Landlord, LandlordCached, LandlordLazy, LandlordNaive,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_RESIDENT: usize = 64;

fn config() -> LandlordConfig {
    // a small epsilon keeps near-equal densities out of the same batch
    LandlordConfig::new().with_epsilon(1.0e-9)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1.0e-6 * f64::max(1.0, a.abs().max(b.abs()))
}

/// One step of a random workload.
#[derive(Debug, Clone, Copy)]
enum Op {
    Add { key: u64, size: u64, cost: f64 },
    Touch(usize),
    Inspect(usize),
    Remove(usize),
    Evict,
}

fn workload(seed: u64, steps: usize) -> Vec<Op> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_key = 0;
    (0..steps)
        .map(|_| match rng.gen_range(0..100) {
            0..=39 => {
                next_key += 1;
                Op::Add {
                    key: next_key,
                    size: rng.gen_range(1..=16),
                    cost: rng.gen_range(1.0..1000.0),
                }
            }
            40..=69 => Op::Touch(rng.gen_range(0..MAX_RESIDENT)),
            70..=74 => Op::Inspect(rng.gen_range(0..MAX_RESIDENT)),
            75..=79 => Op::Remove(rng.gen_range(0..MAX_RESIDENT)),
            _ => Op::Evict,
        })
        .collect()
}

/// Replays `ops` and returns the evicted keys in order.
///
/// Index-based operations pick from the caller-side list of resident keys,
/// so every policy sees exactly the same sequence of calls as long as the
/// evictions agree.
fn replay<P>(mut cache: Cache<u64, (), P>, ops: &[Op]) -> (Vec<u64>, Vec<(u64, f64)>)
where
    P: EvictionPolicy<u64, ()>,
{
    let mut resident: Vec<u64> = Vec::new();
    let mut evicted = Vec::new();

    for op in ops {
        match *op {
            Op::Add { key, size, cost } => {
                if resident.len() >= MAX_RESIDENT {
                    let (victim, _, _) = cache.pop_least_valuable().unwrap();
                    resident.retain(|&k| k != victim);
                    evicted.push(victim);
                }
                cache.add(key, (), size, cost);
                resident.push(key);
            }
            Op::Touch(i) if !resident.is_empty() => {
                let key = resident[i % resident.len()];
                assert!(cache.retrieve(&key, true).is_some());
            }
            Op::Inspect(i) if !resident.is_empty() => {
                let key = resident[i % resident.len()];
                assert!(cache.retrieve(&key, false).is_some());
            }
            Op::Remove(i) if !resident.is_empty() => {
                let key = resident.swap_remove(i % resident.len());
                cache.remove(&key);
            }
            Op::Evict if !resident.is_empty() => {
                let (victim, _, _) = cache.pop_least_valuable().unwrap();
                resident.retain(|&k| k != victim);
                evicted.push(victim);
            }
            _ => {}
        }
        assert_eq!(cache.pending_evictions(), 0);
    }

    let credits = resident
        .iter()
        .map(|key| (*key, cache.credit(key).unwrap()))
        .collect();
    (evicted, credits)
}

#[test]
fn test_landlord_variants_evict_identically() {
    for seed in [1, 7, 42, 2024] {
        let ops = workload(seed, 3_000);

        let (naive, naive_credits) = replay(
            Cache::with_policy(LandlordNaive::<u64, ()>::new(config())),
            &ops,
        );
        let (cached, cached_credits) = replay(
            Cache::with_policy(LandlordCached::<u64, ()>::new(config())),
            &ops,
        );
        let (lazy, lazy_credits) = replay(
            Cache::with_policy(LandlordLazy::<u64, ()>::new(config())),
            &ops,
        );

        assert!(naive.len() > 100, "workload should evict regularly");
        assert_eq!(naive, cached, "seed {seed}: naive vs cached");
        assert_eq!(naive, lazy, "seed {seed}: naive vs lazy");

        // the cached tracker returns the exact same charges
        assert_eq!(naive_credits, cached_credits);
        for ((key, expected), (_, actual)) in naive_credits.iter().zip(&lazy_credits) {
            assert!(
                approx_eq(*expected, *actual),
                "seed {seed}: key {key} credit {actual} != {expected}"
            );
        }
    }
}

#[test]
fn test_credit_stays_within_bounds() {
    let ops = workload(99, 2_000);
    let (_, credits) = replay(
        Cache::with_policy(LandlordLazy::<u64, ()>::new(config())),
        &ops,
    );
    for (key, credit) in credits {
        assert!(credit >= 0.0, "key {key} credit {credit}");
        assert!(credit <= 1000.0);
    }
}

// ============================================================================
// MCD EQUIVALENCE
// ============================================================================

/// Runs the cached and naive trackers side by side and checks every query.
#[derive(Debug, Default)]
struct CheckedMcd {
    cached: CachedMcd,
    naive: NaiveMcd,
    queries: u64,
}

impl McdTracker for CheckedMcd {
    const POLICY_NAME: &'static str = "LandlordChecked";

    fn notify_added<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        self.cached.notify_added(entry);
        self.naive.notify_added(entry);
    }

    fn notify_decreased<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        self.cached.notify_decreased(entry);
        self.naive.notify_decreased(entry);
    }

    fn notify_impending_mutation<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        self.cached.notify_impending_mutation(entry);
        self.naive.notify_impending_mutation(entry);
    }

    fn notify_mutated_or_removed<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        self.cached.notify_mutated_or_removed(entry);
        self.naive.notify_mutated_or_removed(entry);
    }

    fn query<'a, E, I>(&mut self, entries: I) -> f64
    where
        E: CreditDensity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let entries: Vec<&'a E> = entries.into_iter().collect();
        let cached = self.cached.query(entries.iter().copied());
        let naive = self.naive.query(entries.iter().copied());
        assert_eq!(cached, naive, "cached MCD diverged after {} queries", self.queries);
        self.queries += 1;
        naive
    }

    fn reset(&mut self) {
        self.cached.reset();
        self.naive.reset();
    }
}

#[test]
fn test_cached_mcd_matches_naive_scan() {
    for seed in [3, 11, 500] {
        let ops = workload(seed, 3_000);
        let policy: Landlord<u64, (), CheckedMcd> = Landlord::new(config());
        let mut cache = Cache::with_policy(policy);

        let mut resident: Vec<u64> = Vec::new();
        for op in &ops {
            match *op {
                Op::Add { key, size, cost } => {
                    cache.add(key, (), size, cost);
                    resident.push(key);
                }
                Op::Touch(i) if !resident.is_empty() => {
                    cache.retrieve(&resident[i % resident.len()], true);
                }
                Op::Remove(i) if !resident.is_empty() => {
                    let key = resident.swap_remove(i % resident.len());
                    cache.remove(&key);
                }
                Op::Evict if !resident.is_empty() => {
                    // ties are allowed here, so drain the whole batch
                    let (victim, _, _) = cache.pop_least_valuable().unwrap();
                    resident.retain(|&k| k != victim);
                    while cache.pending_evictions() > 0 {
                        let (victim, _, _) = cache.pop_least_valuable().unwrap();
                        resident.retain(|&k| k != victim);
                    }
                }
                _ => {}
            }
        }
        assert!(cache.policy().tracker().queries > 100);
    }
}

#[test]
fn test_cached_mcd_with_duplicate_densities() {
    let policy: Landlord<u32, (), CheckedMcd> = Landlord::new(LandlordConfig::new());
    let mut cache = Cache::with_policy(policy);
    for key in 0..32u32 {
        // four entries per density class
        cache.add(key, (), 2, f64::from(key / 4 + 1) * 2.0);
    }
    cache.retrieve(&5, true);
    cache.remove(&9);
    while cache.pop_least_valuable().is_some() {}
    assert!(cache.policy().tracker().queries > 0);
}

#[test]
fn test_entry_credit_density_direct() {
    let entry: CacheEntry<()> = CacheEntry::new((), 8, 2.0);
    assert_eq!(CreditDensity::credit_density(&entry), 0.25);
}
