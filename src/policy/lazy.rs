//! Lazy Landlord Eviction Policy
//!
//! Produces the same eviction order as [`Landlord`](crate::Landlord) without
//! charging every entry on every pass.
//!
//! # Algorithm
//!
//! A uniform charge of `delta` per unit of size lowers every credit density
//! by exactly `delta`, which never changes the relative order of entries.
//! So instead of charging everyone, the policy:
//!
//! 1. keeps a min-heap of `(credit density, key)` handles,
//! 2. pops the top, which is the globally least valuable entry,
//! 3. materializes that one entry's true credit by applying the accumulated
//!    `pending_delta`,
//! 4. adds the victim's density to `pending_delta`; that density is the MCD a
//!    full pass would have charged to every other entry.
//!
//! ```text
//!   stored credit  ──(- pending_delta * size)──▶  effective credit
//! ```
//!
//! The pending charge is applied individually on `touch`, `remove` and
//! eviction, and to every entry at once before a new admission so the
//! newcomer does not inherit charges that predate it.
//!
//! # Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `evict_least_valuable` | O(log n) |
//! | `add` | O(1), or O(n) when a pending charge must be committed first |
//! | `touch` | O(n), rebuilds the heap |
//! | `remove` | O(n), rebuilds the heap; not part of the eviction path |
//!
//! A binary heap has no efficient way to reposition or delete an arbitrary
//! element, so `touch` and `remove` rebuild it from the map.

use crate::config::LandlordConfig;
use crate::divider::{DensityDivider, ReciprocalDivider};
use crate::entry::CacheEntry;
use crate::policy::EvictionPolicy;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::{Ordering, Reverse};
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

/// Heap handle: a density snapshot plus the key to re-look-up in the map.
///
/// All snapshots in the heap are taken relative to the same `pending_delta`.
struct HeapSlot<K> {
    density: f64,
    key: K,
}

impl<K> PartialEq for HeapSlot<K> {
    fn eq(&self, other: &Self) -> bool {
        self.density.total_cmp(&other.density) == Ordering::Equal
    }
}

impl<K> Eq for HeapSlot<K> {}

impl<K> PartialOrd for HeapSlot<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for HeapSlot<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.density.total_cmp(&other.density)
    }
}

/// Landlord policy that defers charges through a shared pending delta.
///
/// # Examples
///
/// ```
/// use landlord_cache::config::LandlordConfig;
/// use landlord_cache::{CacheEntry, EvictionPolicy, LandlordLazy};
///
/// let mut policy: LandlordLazy<&str, ()> = LandlordLazy::new(LandlordConfig::new());
/// policy.add("a", CacheEntry::new((), 10, 10.0));
/// policy.add("b", CacheEntry::new((), 10, 100.0));
///
/// let mut evicted = Vec::new();
/// policy.evict_least_valuable(&mut evicted);
/// assert_eq!(evicted[0].0, "a");
///
/// // b's charge is still pending; the stored credit is untouched.
/// assert_eq!(policy.find(&"b").unwrap().credit(), 100.0);
/// assert_eq!(policy.credit(&"b"), Some(90.0));
/// ```
pub struct LandlordLazy<K, V, D = ReciprocalDivider, S = DefaultHashBuilder> {
    config: LandlordConfig,
    map: HashMap<K, CacheEntry<V, D>, S>,
    heap: BinaryHeap<Reverse<HeapSlot<K>>>,
    pending_delta: f64,
}

impl<K, V, D> LandlordLazy<K, V, D, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    D: DensityDivider,
{
    /// Creates an empty policy with the default hasher.
    pub fn new(config: LandlordConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, D, S> LandlordLazy<K, V, D, S>
where
    K: Hash + Eq + Clone,
    D: DensityDivider,
    S: BuildHasher,
{
    /// Creates an empty policy using `hash_builder` for the entry map.
    pub fn with_hasher(config: LandlordConfig, hash_builder: S) -> Self {
        LandlordLazy {
            config,
            map: HashMap::with_capacity_and_hasher(config.initial_capacity(), hash_builder),
            heap: BinaryHeap::with_capacity(config.initial_capacity()),
            pending_delta: 0.0,
        }
    }

    /// Returns the policy configuration.
    #[inline]
    pub fn config(&self) -> &LandlordConfig {
        &self.config
    }

    /// Returns the charge per unit of size owed by every resident entry.
    #[inline]
    pub fn pending_delta(&self) -> f64 {
        self.pending_delta
    }

    /// Applies the pending charge to every resident entry.
    fn commit_pending_delta(&mut self) {
        if self.pending_delta == 0.0 {
            return;
        }
        let delta = self.pending_delta;
        for entry in self.map.values_mut() {
            entry.charge(delta);
        }
        self.pending_delta = 0.0;
        self.rebuild_heap();
    }

    fn rebuild_heap(&mut self) {
        self.heap = self
            .map
            .iter()
            .map(|(key, entry)| {
                Reverse(HeapSlot {
                    density: entry.credit_density(),
                    key: key.clone(),
                })
            })
            .collect();
        trace!(entries = self.heap.len(), "lazy landlord: rebuilt heap");
    }
}

impl<K, V, D, S> EvictionPolicy<K, V> for LandlordLazy<K, V, D, S>
where
    K: Hash + Eq + Clone,
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
        self.commit_pending_delta();

        entry.credit = entry.cost;
        trace!(size = entry.size, cost = entry.cost, "lazy landlord: admitted entry");
        self.heap.push(Reverse(HeapSlot {
            density: entry.credit_density(),
            key: key.clone(),
        }));
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
        let mut entry = self.map.remove(key)?;
        entry.charge(self.pending_delta);
        trace!(size = entry.size, credit = entry.credit, "lazy landlord: removed entry");
        self.rebuild_heap();
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
        // Reward the effective credit, then store it back in the
        // lazily-charged domain shared by all other entries.
        entry.charge(self.pending_delta);
        entry.refill(self.config.gain());
        entry.charge(-self.pending_delta);
        self.rebuild_heap();
    }

    fn evict_least_valuable(&mut self, out: &mut Vec<(K, CacheEntry<V, D>)>) {
        assert!(
            !self.map.is_empty(),
            "evict_least_valuable called on an empty policy"
        );

        let (key, mut entry) = loop {
            let Some(Reverse(slot)) = self.heap.pop() else {
                debug!(resident = self.map.len(), "lazy landlord: heap ran dry, rebuilding");
                self.rebuild_heap();
                continue;
            };
            if let Some(entry) = self.map.remove(&slot.key) {
                break (slot.key, entry);
            }
        };

        entry.charge(self.pending_delta);
        let density = entry.credit_density();
        self.pending_delta += density;
        entry.charge(density);
        trace!(
            density,
            pending_delta = self.pending_delta,
            "lazy landlord: evicted entry"
        );
        out.push((key, entry));
    }

    fn credit<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map
            .get(key)
            .map(|entry| entry.credit - self.pending_delta * entry.size as f64)
    }

    fn clear(&mut self) {
        self.map.clear();
        self.heap.clear();
        self.pending_delta = 0.0;
    }

    fn algorithm_name(&self) -> &'static str {
        "LandlordLazy"
    }
}

impl<K, V, D, S> core::fmt::Debug for LandlordLazy<K, V, D, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LandlordLazy")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .field("pending_delta", &self.pending_delta)
            .finish()
    }
}
