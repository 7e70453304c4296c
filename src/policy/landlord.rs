//! Landlord Eviction Policy (reference variants)
//!
//! Landlord (Young, 2002) is a cost-aware generalization of LRU and
//! Greedy-Dual-Size. Every resident entry holds *credit*, initially its cost.
//!
//! # Algorithm
//!
//! ```text
//!   evict_least_valuable:
//!     loop {
//!       delta = min over entries of credit / size          (MCD)
//!       for each entry:
//!         credit -= delta * size
//!         if credit < epsilon: evict
//!       if something was evicted: break
//!     }
//!
//!   touch:
//!     credit = gain * cost + (1 - gain) * credit
//! ```
//!
//! Entries that are cheap to reload per unit of size run out of credit
//! first. Hits move credit back toward the cost, but with `gain < 1` never
//! all the way, so no entry becomes permanently unevictable.
//!
//! # Variants
//!
//! [`Landlord`] is generic over the [`McdTracker`] that answers the MCD query:
//!
//! - [`LandlordNaive`] scans all entries for every query.
//! - [`LandlordCached`] keeps a running minimum and rescans only after the
//!   entry holding it was raised or removed.
//!
//! Both charge every entry on every pass, so eviction is O(n). See
//! [`LandlordLazy`](crate::LandlordLazy) for the O(log n) variant.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! policy (or the [`Cache`](crate::Cache) holding it) in a `Mutex`.

use crate::config::LandlordConfig;
use crate::divider::{DensityDivider, ReciprocalDivider};
use crate::entry::CacheEntry;
use crate::mcd::{CachedMcd, McdTracker, NaiveMcd};
use crate::policy::EvictionPolicy;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Charge passes after which the minimum-density entry is evicted directly.
///
/// A pass charges the minimum-density entry down to roughly zero credit, so a
/// second pass is already rare; this only bounds pathological rounding.
const MAX_CHARGE_PASSES: u32 = 8;

/// Landlord with an O(n) scan for the minimum credit density.
pub type LandlordNaive<K, V, D = ReciprocalDivider, S = DefaultHashBuilder> =
    Landlord<K, V, NaiveMcd, D, S>;

/// Landlord with an incrementally cached minimum credit density.
pub type LandlordCached<K, V, D = ReciprocalDivider, S = DefaultHashBuilder> =
    Landlord<K, V, CachedMcd, D, S>;

/// Reference Landlord policy charging every entry on each eviction pass.
///
/// # Examples
///
/// ```
/// use landlord_cache::config::LandlordConfig;
/// use landlord_cache::{CacheEntry, EvictionPolicy, LandlordCached};
///
/// let mut policy: LandlordCached<&str, ()> = LandlordCached::new(LandlordConfig::new());
/// policy.add("cheap", CacheEntry::new((), 10, 10.0));
/// policy.add("precious", CacheEntry::new((), 10, 100.0));
///
/// let mut evicted = Vec::new();
/// policy.evict_least_valuable(&mut evicted);
/// assert_eq!(evicted[0].0, "cheap");
/// assert!(policy.credit(&"precious").unwrap() < 100.0);
/// ```
pub struct Landlord<K, V, T = CachedMcd, D = ReciprocalDivider, S = DefaultHashBuilder> {
    config: LandlordConfig,
    map: HashMap<K, CacheEntry<V, D>, S>,
    mcd: T,
}

impl<K, V, T, D> Landlord<K, V, T, D, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    T: McdTracker,
    D: DensityDivider,
{
    /// Creates an empty policy with the default hasher.
    pub fn new(config: LandlordConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, T, D, S> Landlord<K, V, T, D, S>
where
    K: Hash + Eq + Clone,
    T: McdTracker,
    D: DensityDivider,
    S: BuildHasher,
{
    /// Creates an empty policy using `hash_builder` for the entry map.
    pub fn with_hasher(config: LandlordConfig, hash_builder: S) -> Self {
        Landlord {
            config,
            map: HashMap::with_capacity_and_hasher(config.initial_capacity(), hash_builder),
            mcd: T::default(),
        }
    }

    /// Returns the policy configuration.
    #[inline]
    pub fn config(&self) -> &LandlordConfig {
        &self.config
    }

    /// Returns the minimum credit density tracker.
    #[inline]
    pub fn tracker(&self) -> &T {
        &self.mcd
    }

    /// Iterates over resident entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V, D>)> {
        self.map.iter()
    }

    /// Charges every entry `delta` per unit of size and collects the keys of
    /// exhausted entries.
    fn charge_all(&mut self, delta: f64, victims: &mut Vec<K>) {
        let epsilon = self.config.epsilon();
        let mcd = &mut self.mcd;
        for (key, entry) in self.map.iter_mut() {
            let exhausted = entry.credit - delta * (entry.size as f64) < epsilon;
            if exhausted {
                mcd.notify_impending_mutation(&*entry);
                entry.charge(delta);
                mcd.notify_mutated_or_removed(&*entry);
                victims.push(key.clone());
            } else {
                entry.charge(delta);
                mcd.notify_decreased(&*entry);
            }
        }
    }

    /// Evicts the entry with the lowest credit density outright.
    fn evict_minimum(&mut self, victims: &mut Vec<K>) {
        let victim = self
            .map
            .iter()
            .min_by(|a, b| a.1.credit_density().total_cmp(&b.1.credit_density()))
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            if let Some(entry) = self.map.get(&key) {
                self.mcd.notify_impending_mutation(entry);
                self.mcd.notify_mutated_or_removed(entry);
            }
            victims.push(key);
        }
    }
}

impl<K, V, T, D, S> EvictionPolicy<K, V> for Landlord<K, V, T, D, S>
where
    K: Hash + Eq + Clone,
    T: McdTracker,
    D: DensityDivider,
    S: BuildHasher,
{
    type Divider = D;

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    fn add(&mut self, key: K, mut entry: CacheEntry<V, D>) {
        assert!(entry.size > 0, "cache entries must have a non-zero size");
        assert!(
            !self.map.contains_key(&key),
            "add called with a key that is already resident"
        );
        entry.credit = entry.cost;
        trace!(size = entry.size, cost = entry.cost, "landlord: admitted entry");
        self.mcd.notify_added(&entry);
        self.map.insert(key, entry);
    }

    #[inline]
    fn find<Q>(&self, key: &Q) -> Option<&CacheEntry<V, D>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<V, D>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.mcd.notify_impending_mutation(self.map.get(key)?);
        let entry = self.map.remove(key)?;
        self.mcd.notify_mutated_or_removed(&entry);
        trace!(size = entry.size, credit = entry.credit, "landlord: removed entry");
        Some(entry)
    }

    fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(entry) = self.map.get_mut(key) else {
            panic!("touch called with a key that is not resident");
        };
        self.mcd.notify_impending_mutation(&*entry);
        entry.refill(self.config.gain());
        self.mcd.notify_mutated_or_removed(&*entry);
    }

    fn evict_least_valuable(&mut self, out: &mut Vec<(K, CacheEntry<V, D>)>) {
        assert!(
            !self.map.is_empty(),
            "evict_least_valuable called on an empty policy"
        );

        let mut victims = Vec::new();
        let mut passes = 0;
        loop {
            passes += 1;
            if passes > MAX_CHARGE_PASSES {
                debug!(passes, "landlord: charge passes exhausted, evicting minimum");
                self.evict_minimum(&mut victims);
                break;
            }

            let delta = self.mcd.query(self.map.values());
            self.charge_all(delta, &mut victims);
            if !victims.is_empty() {
                trace!(delta, evicted = victims.len(), "landlord: eviction pass");
                break;
            }
            debug!(delta, passes, "landlord: pass evicted nothing, recharging");
        }

        for key in victims {
            if let Some(entry) = self.map.remove(&key) {
                out.push((key, entry));
            }
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.mcd.reset();
    }

    fn algorithm_name(&self) -> &'static str {
        T::POLICY_NAME
    }
}

impl<K, V, T: core::fmt::Debug, D, S> core::fmt::Debug for Landlord<K, V, T, D, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Landlord")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("mcd", &self.mcd)
            .finish()
    }
}
