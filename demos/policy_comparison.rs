extern crate landlord_cache;

use landlord_cache::config::{LandlordConfig, LruConfig};
use landlord_cache::metrics::CacheMetrics;
use landlord_cache::{
    Cache, EvictionPolicy, LandlordCached, LandlordLazy, LandlordNaive, LruPolicy,
};

/// Budget shared by every cache, in the same unit as the object sizes.
const BUDGET: u64 = 12;

/// (key, size, cost to fetch again)
const OBJECTS: [(&str, u64, f64); 4] = [
    ("thumbnail", 1, 2.0),
    ("report", 4, 40.0),
    ("video", 10, 5.0),
    ("query", 2, 30.0),
];

fn run<P>(label: &str, mut cache: Cache<&'static str, u32, P>)
where
    P: EvictionPolicy<&'static str, u32>,
{
    println!("\n{label}:");
    let mut used = 0;

    for (id, &(key, size, cost)) in OBJECTS.iter().enumerate() {
        cache.add(key, id as u32, size, cost);
        used += size;
        println!("   Added: {key} (size {size}, cost {cost})");
        used = settle(&mut cache, used);
    }

    // "query" is hit repeatedly before one more object arrives
    for _ in 0..3 {
        cache.retrieve(&"query", true);
    }
    cache.add("archive", 99, 3, 1.0);
    used += 3;
    println!("   Added: archive (size 3, cost 1) after 3 hits on query");
    used = settle(&mut cache, used);

    let mut resident: Vec<&str> = OBJECTS
        .iter()
        .map(|&(key, _, _)| key)
        .chain(["archive"])
        .filter(|key| cache.credit(key).is_some())
        .collect();
    resident.sort_unstable();
    println!("   Resident: {resident:?} ({used} of {BUDGET})");

    let metrics = cache.metrics();
    println!(
        "   {}: {} evictions in {} passes",
        cache.algorithm_name(),
        metrics.get("evictions").copied().unwrap_or(0.0),
        metrics.get("eviction_passes").copied().unwrap_or(0.0),
    );
}

/// Evicts until `used` fits the budget, including the rest of any batch.
fn settle<P>(cache: &mut Cache<&'static str, u32, P>, mut used: u64) -> u64
where
    P: EvictionPolicy<&'static str, u32>,
{
    while used > BUDGET || cache.pending_evictions() > 0 {
        let Some((key, _, size)) = cache.pop_least_valuable() else {
            break;
        };
        used -= size;
        println!("   Evicted: {key}");
    }
    used
}

fn main() {
    println!("Eviction Policy Comparison");
    println!("==========================");
    println!("Every cache holds at most {BUDGET} units.");
    println!("Landlord weighs fetch cost against size; LRU only looks at recency.");

    run(
        "1. Landlord (naive MCD scan)",
        Cache::with_policy(LandlordNaive::<&str, u32>::new(LandlordConfig::new())),
    );
    run(
        "2. Landlord (cached MCD)",
        Cache::with_policy(LandlordCached::<&str, u32>::new(LandlordConfig::new())),
    );
    run(
        "3. Landlord (lazy heap)",
        Cache::with_policy(LandlordLazy::<&str, u32>::new(LandlordConfig::new())),
    );
    run(
        "4. LRU",
        Cache::with_policy(LruPolicy::<&str, u32>::new(LruConfig::new())),
    );
}
