//! Least Recently Used Eviction Policy
//!
//! Cost-oblivious alternative to Landlord: every eviction gives up the entry
//! that was admitted or touched longest ago, regardless of size or cost.
//!
//! # Performance Characteristics
//!
//! All operations are O(1): the map stores the address of each entry's list
//! node, so `touch` and `remove` relink without searching.
//!
//! # Thread Safety
//!
//! This policy is not thread-safe. Wrap the owning cache in a `Mutex` for
//! shared access.

use crate::config::LruConfig;
use crate::divider::{DensityDivider, ReciprocalDivider};
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::policy::EvictionPolicy;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use tracing::trace;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// LRU eviction policy.
///
/// # Safety
///
/// `map` holds raw pointers into `list`. A pointer stays valid while its node
/// is linked, and every unlink removes the map entry in the same operation.
///
/// # Examples
///
/// ```
/// use landlord_cache::config::LruConfig;
/// use landlord_cache::{CacheEntry, EvictionPolicy, LruPolicy};
///
/// let mut policy: LruPolicy<&str, ()> = LruPolicy::new(LruConfig::new());
/// policy.add("a", CacheEntry::new((), 1, 100.0));
/// policy.add("b", CacheEntry::new((), 1, 1.0));
/// policy.touch(&"a");
///
/// let mut evicted = Vec::new();
/// policy.evict_least_valuable(&mut evicted);
/// assert_eq!(evicted[0].0, "b");
/// ```
pub struct LruPolicy<K, V, D = ReciprocalDivider, S = DefaultHashBuilder> {
    config: LruConfig,
    list: List<(K, CacheEntry<V, D>)>,
    map: HashMap<K, *mut Node<(K, CacheEntry<V, D>)>, S>,
}

// SAFETY: the policy owns every node its pointers refer to.
unsafe impl<K: Send, V: Send, D: Send, S: Send> Send for LruPolicy<K, V, D, S> {}

// SAFETY: all mutation requires &mut self.
unsafe impl<K: Sync, V: Sync, D: Sync, S: Sync> Sync for LruPolicy<K, V, D, S> {}

impl<K, V, D> LruPolicy<K, V, D, DefaultHashBuilder>
where
    K: Hash + Eq + Clone,
    D: DensityDivider,
{
    /// Creates an empty policy with the default hasher.
    pub fn new(config: LruConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V, D, S> LruPolicy<K, V, D, S>
where
    K: Hash + Eq + Clone,
    D: DensityDivider,
    S: BuildHasher,
{
    /// Creates an empty policy using `hash_builder` for the node map.
    pub fn with_hasher(config: LruConfig, hash_builder: S) -> Self {
        LruPolicy {
            config,
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(config.initial_capacity(), hash_builder),
        }
    }

    /// Returns the policy configuration.
    #[inline]
    pub fn config(&self) -> &LruConfig {
        &self.config
    }
}

impl<K, V, D, S> EvictionPolicy<K, V> for LruPolicy<K, V, D, S>
where
    K: Hash + Eq + Clone,
    D: DensityDivider,
    S: BuildHasher,
{
    type Divider = D;

    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    fn add(&mut self, key: K, mut entry: CacheEntry<V, D>) {
        assert!(entry.size > 0, "cache entries must have a non-zero size");
        assert!(
            !self.map.contains_key(&key),
            "add called with a key that is already resident"
        );
        entry.credit = entry.cost;
        let node = self.list.push_front((key.clone(), entry));
        self.map.insert(key, node);
    }

    fn find<Q>(&self, key: &Q) -> Option<&CacheEntry<V, D>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        // SAFETY: node comes from our map and is linked
        unsafe { Some(&(*node).value().1) }
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<V, D>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node comes from our map and is linked
        let (_, entry) = unsafe { self.list.remove(node).into_value() };
        Some(entry)
    }

    fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(&node) = self.map.get(key) else {
            panic!("touch called with a key that is not resident");
        };
        // SAFETY: node comes from our map and is linked
        unsafe { self.list.move_to_front(node) };
    }

    fn evict_least_valuable(&mut self, out: &mut Vec<(K, CacheEntry<V, D>)>) {
        let Some(node) = self.list.pop_back() else {
            panic!("evict_least_valuable called on an empty policy");
        };
        // SAFETY: pop_back never yields a sentinel
        let (key, entry) = unsafe { node.into_value() };
        self.map.remove(&key);
        trace!(size = entry.size, "lru: evicted entry");
        out.push((key, entry));
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K, V, D, S> core::fmt::Debug for LruPolicy<K, V, D, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruPolicy")
            .field("config", &self.config)
            .field("len", &self.map.len())
            .finish()
    }
}
