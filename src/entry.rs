//! Cache Entry Accounting Record
//!
//! A [`CacheEntry`] is the per-entry state owned by an eviction policy: the
//! caller's item plus the Landlord accounting fields.
//!
//! # Lifecycle
//!
//! ```text
//!   add ──▶ Resident ──touch──▶ Resident        (credit moves toward cost)
//!              │
//!              ├──charge (credit < epsilon)──▶ Evicted  (handed back to caller)
//!              └──remove──────────────────────▶ Removed  (handed back to caller)
//! ```
//!
//! # Memory Layout
//!
//! - `item: V` - caller's payload, never inspected
//! - `size: u64` - 8 bytes
//! - `cost: f64` - 8 bytes
//! - `credit: f64` - 8 bytes
//! - `divider: D` - 0 bytes ([`NaiveDivider`](crate::divider::NaiveDivider))
//!   or 8 bytes ([`ReciprocalDivider`])

use crate::divider::{DensityDivider, ReciprocalDivider};
use crate::mcd::CreditDensity;
use core::fmt;

/// One resident entry: the caller's item plus size, cost and remaining credit.
///
/// # Examples
///
/// ```
/// use landlord_cache::CacheEntry;
///
/// let entry: CacheEntry<&str> = CacheEntry::new("texture.dds", 10, 25.0);
/// assert_eq!(entry.size(), 10);
/// assert_eq!(entry.cost(), 25.0);
/// assert_eq!(entry.credit(), 25.0);
/// assert_eq!(entry.credit_density(), 2.5);
/// ```
pub struct CacheEntry<V, D = ReciprocalDivider> {
    pub(crate) item: V,
    pub(crate) size: u64,
    pub(crate) cost: f64,
    pub(crate) credit: f64,
    divider: D,
}

impl<V, D: DensityDivider> CacheEntry<V, D> {
    /// Creates an entry whose credit starts at its full cost.
    ///
    /// # Arguments
    ///
    /// * `item` - The caller's payload
    /// * `size` - Weight of the entry (bytes or any unit). Policies reject `0`.
    /// * `cost` - Value of keeping the entry resident (e.g. time to reload it)
    #[inline]
    pub fn new(item: V, size: u64, cost: f64) -> Self {
        CacheEntry {
            item,
            size,
            cost,
            credit: cost,
            divider: D::new(size),
        }
    }

    /// Returns a reference to the caller's item.
    #[inline]
    pub fn item(&self) -> &V {
        &self.item
    }

    /// Consumes the entry and returns the caller's item.
    #[inline]
    pub fn into_item(self) -> V {
        self.item
    }

    /// Returns the entry's size.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the cost the entry was admitted with.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the stored credit.
    ///
    /// For entries held by [`LandlordLazy`](crate::LandlordLazy) this value
    /// does not include charges that are still pending; use
    /// [`EvictionPolicy::credit`](crate::EvictionPolicy::credit) for the
    /// effective credit.
    #[inline]
    pub fn credit(&self) -> f64 {
        self.credit
    }

    /// Returns `credit / size`.
    #[inline]
    pub fn credit_density(&self) -> f64 {
        self.divider.divide(self.credit, self.size)
    }

    /// Charges `delta` per unit of size.
    #[inline]
    pub(crate) fn charge(&mut self, delta: f64) {
        self.credit -= delta * self.size as f64;
    }

    /// Restores credit toward the admission cost after an access.
    ///
    /// `credit := gain * cost + (1 - gain) * credit`. With `gain < 1` a hit
    /// never restores the full cost.
    #[inline]
    pub(crate) fn refill(&mut self, gain: f64) {
        self.credit = gain * self.cost + (1.0 - gain) * self.credit;
    }
}

impl<V, D: DensityDivider> CreditDensity for CacheEntry<V, D> {
    #[inline]
    fn credit_density(&self) -> f64 {
        CacheEntry::credit_density(self)
    }
}

impl<V: Clone, D: Clone> Clone for CacheEntry<V, D> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            size: self.size,
            cost: self.cost,
            credit: self.credit,
            divider: self.divider.clone(),
        }
    }
}

impl<V: fmt::Debug, D> fmt::Debug for CacheEntry<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("item", &self.item)
            .field("size", &self.size)
            .field("cost", &self.cost)
            .field("credit", &self.credit)
            .finish()
    }
}
