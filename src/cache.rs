//! Cache Façade
//!
//! [`Cache`] wraps one [`EvictionPolicy`] and adds the pieces every policy
//! needs but none should implement itself:
//!
//! - a FIFO staging queue, so that exactly one entry is handed back per
//!   eviction call even when a Landlord pass exhausts several at once,
//! - fallible `try_*` entry points reporting [`CacheError`],
//! - [`CacheMetrics`] bookkeeping.
//!
//! The cache does not enforce a capacity. Callers decide when to evict,
//! typically by calling [`Cache::remove_least_valuable`] until their own size
//! budget is met.
//!
//! ```text
//!   add ──▶ policy ──evict_least_valuable──▶ staging FIFO ──▶ caller
//!                                             (batch ≥ 1)     (one per call)
//! ```
//!
//! # Thread Safety
//!
//! `Cache` is not thread-safe. It is `Send`/`Sync` whenever its parameters
//! are, so it can be shared behind a `Mutex`.

use crate::config::LandlordConfig;
use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::{EvictionPolicy, LandlordCached};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use tracing::{debug, trace};

/// Evicted entry waiting in the staging queue.
type Staged<K, V, P> = (K, CacheEntry<V, <P as EvictionPolicy<K, V>>::Divider>);

/// A cost-aware cache over an eviction policy `P`.
///
/// # Examples
///
/// ```
/// use landlord_cache::Cache;
///
/// let mut cache: Cache<&str, &str> = Cache::new();
/// cache.add("cheap", "a.png", 10, 10.0);
/// cache.add("expensive", "b.png", 10, 100.0);
///
/// assert_eq!(cache.retrieve(&"cheap", true), Some((&"a.png", 10)));
///
/// // Cheaper per unit of size, so it goes first.
/// assert_eq!(cache.remove_least_valuable(), Some(("a.png", 10)));
/// assert_eq!(cache.remove_least_valuable(), Some(("b.png", 10)));
/// assert!(cache.is_empty());
/// ```
pub struct Cache<K, V, P = LandlordCached<K, V>>
where
    P: EvictionPolicy<K, V>,
{
    policy: P,
    staged: VecDeque<Staged<K, V, P>>,
    batch: Vec<Staged<K, V, P>>,
    metrics: CoreCacheMetrics,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty cache using [`LandlordCached`] with default settings.
    pub fn new() -> Self {
        Cache::with_policy(LandlordCached::new(LandlordConfig::default()))
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Cache::new()
    }
}

impl<K, V, P> Cache<K, V, P>
where
    K: Hash + Eq,
    P: EvictionPolicy<K, V>,
{
    /// Creates an empty cache around the given policy.
    pub fn with_policy(policy: P) -> Self {
        Cache {
            policy,
            staged: VecDeque::new(),
            batch: Vec::new(),
            metrics: CoreCacheMetrics::new(),
        }
    }

    /// Admits `item` under `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is already resident, if `size` is zero or if `cost` is
    /// negative or not finite. Use [`try_add`](Self::try_add) to get an error
    /// instead.
    pub fn add(&mut self, key: K, item: V, size: u64, cost: f64) {
        if let Err(err) = self.try_add(key, item, size, cost) {
            panic!("add rejected: {err}");
        }
    }

    /// Admits `item` under `key`, rejecting invalid input.
    ///
    /// # Errors
    ///
    /// - [`CacheError::ZeroSize`] if `size` is zero
    /// - [`CacheError::InvalidCost`] if `cost` is negative, infinite or NaN
    /// - [`CacheError::DuplicateKey`] if `key` is already resident
    pub fn try_add(&mut self, key: K, item: V, size: u64, cost: f64) -> Result<(), CacheError> {
        if size == 0 {
            return Err(CacheError::ZeroSize);
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(CacheError::InvalidCost);
        }
        if self.policy.find(&key).is_some() {
            return Err(CacheError::DuplicateKey);
        }

        trace!(size, cost, "cache: add");
        self.policy.add(key, CacheEntry::new(item, size, cost));
        self.metrics.record_insertion(size);
        Ok(())
    }

    /// Removes a resident entry and returns its item and size.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not resident.
    pub fn remove<Q>(&mut self, key: &Q) -> (V, u64)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.try_remove(key) {
            Ok(removed) => removed,
            Err(err) => panic!("remove rejected: {err}"),
        }
    }

    /// Removes a resident entry and returns its item and size.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if `key` is not resident. Entries waiting
    /// in the staging queue are no longer resident.
    pub fn try_remove<Q>(&mut self, key: &Q) -> Result<(V, u64), CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.policy.remove(key).ok_or(CacheError::KeyNotFound)?;
        let size = entry.size();
        trace!(size, "cache: remove");
        self.metrics.record_removal(size);
        Ok((entry.into_item(), size))
    }

    /// Looks up a resident entry.
    ///
    /// With `refill_credit` the lookup counts as an access: it is recorded in
    /// the metrics and the policy rewards the entry. Without it the lookup is
    /// a pure inspection.
    pub fn retrieve<Q>(&mut self, key: &Q, refill_credit: bool) -> Option<(&V, u64)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if refill_credit {
            if self.policy.find(key).is_none() {
                self.metrics.record_miss();
                return None;
            }
            self.policy.touch(key);
            self.metrics.record_hit();
        }
        self.policy
            .find(key)
            .map(|entry| (entry.item(), entry.size()))
    }

    /// Evicts one entry and returns its key, item and size.
    ///
    /// Entries surfaced by an earlier pass are returned first, in the order
    /// the policy produced them. Returns `None` once nothing is resident or
    /// staged.
    pub fn pop_least_valuable(&mut self) -> Option<(K, V, u64)> {
        if self.staged.is_empty() {
            if self.policy.is_empty() {
                return None;
            }
            self.run_eviction_pass();
        }
        let (key, entry) = self.staged.pop_front()?;
        let size = entry.size();
        Some((key, entry.into_item(), size))
    }

    /// Evicts one entry and returns its item and size.
    ///
    /// See [`pop_least_valuable`](Self::pop_least_valuable).
    pub fn remove_least_valuable(&mut self) -> Option<(V, u64)> {
        self.pop_least_valuable().map(|(_, item, size)| (item, size))
    }

    fn run_eviction_pass(&mut self) {
        self.policy.evict_least_valuable(&mut self.batch);

        let count = self.batch.len() as u64;
        let total_size: u64 = self.batch.iter().map(|(_, entry)| entry.size()).sum();
        self.metrics.record_eviction_pass(count, total_size);
        if count > 1 {
            debug!(count, total_size, "cache: eviction pass surfaced a batch");
        }
        self.staged.extend(self.batch.drain(..));
    }

    /// Returns `true` if nothing is resident and nothing awaits eviction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.policy.is_empty() && self.staged.is_empty()
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.policy.len()
    }

    /// Returns the number of evicted entries not yet handed back.
    #[inline]
    pub fn pending_evictions(&self) -> usize {
        self.staged.len()
    }

    /// Returns the effective credit of a resident entry.
    pub fn credit<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.policy.credit(key)
    }

    /// Drops every resident and staged entry.
    pub fn clear(&mut self) {
        self.policy.clear();
        self.staged.clear();
        self.metrics.cache_size = 0;
    }

    /// Returns the underlying policy.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<K, V, P> CacheMetrics for Cache<K, V, P>
where
    P: EvictionPolicy<K, V>,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        self.policy.algorithm_name()
    }
}

impl<K, V, P> fmt::Debug for Cache<K, V, P>
where
    P: EvictionPolicy<K, V> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("pending_evictions", &self.staged.len())
            .field("metrics", &self.metrics)
            .finish()
    }
}
