//! Eviction Policies
//!
//! An eviction policy owns the resident entries of a cache and decides which
//! of them to give up next. [`Cache`](crate::Cache) is generic over the
//! [`EvictionPolicy`] trait, so new strategies plug in without touching the
//! façade.
//!
//! | Policy | Evict | Touch | Remove | Batch per pass |
//! |--------|-------|-------|--------|----------------|
//! | [`LandlordNaive`] | O(n) scan + O(n) charge | O(1) | O(1) | ≥ 1 |
//! | [`LandlordCached`] | O(1) query + O(n) charge | O(1) | O(1) | ≥ 1 |
//! | [`LandlordLazy`] | O(log n) | O(n) heap rebuild | O(n) heap rebuild | 1 |
//! | [`LruPolicy`] | O(1) | O(1) | O(1) | 1 |
//!
//! The three Landlord variants produce the same eviction order for the same
//! sequence of operations. They differ only in how much bookkeeping each
//! operation does. Among entries with exactly equal credit density the order
//! is implementation-defined.

use crate::entry::CacheEntry;
use crate::divider::DensityDivider;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::Hash;

pub mod landlord;
pub mod lazy;
pub mod lru;

pub use landlord::{Landlord, LandlordCached, LandlordNaive};
pub use lazy::LandlordLazy;
pub use lru::LruPolicy;

/// Owns resident entries and picks eviction victims.
///
/// # Preconditions
///
/// Violating these is a programming error and panics:
///
/// - [`add`](Self::add) with a key that is already resident, or with `size == 0`
/// - [`touch`](Self::touch) with a key that is not resident
/// - [`evict_least_valuable`](Self::evict_least_valuable) on an empty policy
///
/// [`remove`](Self::remove) reports a missing key by returning `None` so
/// callers can build fallible APIs on top of it.
pub trait EvictionPolicy<K, V> {
    /// Divider stored in every entry this policy holds.
    type Divider: DensityDivider;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Admits an entry; its credit starts at its cost.
    fn add(&mut self, key: K, entry: CacheEntry<V, Self::Divider>);

    /// Looks up an entry without counting it as an access.
    fn find<Q>(&self, key: &Q) -> Option<&CacheEntry<V, Self::Divider>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Removes an entry outside of the eviction path.
    fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<V, Self::Divider>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Records an access, rewarding the entry.
    fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Evicts at least one entry, appending every evicted entry to `out`.
    ///
    /// More than one entry may be appended when several are exhausted in the
    /// same pass; callers must handle a variable-size batch.
    fn evict_least_valuable(&mut self, out: &mut Vec<(K, CacheEntry<V, Self::Divider>)>);

    /// Returns the effective credit of a resident entry.
    fn credit<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).map(CacheEntry::credit)
    }

    /// Drops every resident entry.
    fn clear(&mut self);

    /// Short name used in metrics output (e.g. `"LandlordLazy"`).
    fn algorithm_name(&self) -> &'static str;
}
