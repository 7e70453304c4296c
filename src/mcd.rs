//! Minimum Credit Density Tracking
//!
//! Each Landlord eviction pass charges every resident entry at a rate equal
//! to the minimum credit density (MCD) across all resident entries. This
//! module provides two strategies for obtaining that minimum.
//!
//! | Tracker | `query` | Hooks |
//! |---------|---------|-------|
//! | [`NaiveMcd`] | O(n) scan every call | no-ops |
//! | [`CachedMcd`] | O(1) while valid, O(n) rescan after invalidation | O(1) |
//!
//! # Notification Protocol
//!
//! A policy using a tracker must call the hooks at these points:
//!
//! ```text
//!   add ─────────────▶ notify_added(entry)
//!   charge (survives) ▶ notify_decreased(entry)
//!   touch / remove /
//!   evict            ─▶ notify_impending_mutation(entry)   before the mutation
//!                       ... mutate or remove ...
//!                     ▶ notify_mutated_or_removed(entry)   after the mutation
//! ```
//!
//! The impending hook exists because once an entry's credit has been raised
//! or the entry has been removed, the tracker can no longer tell whether that
//! entry held the cached minimum.
//!
//! Under any call sequence following this protocol, [`CachedMcd::query`] and
//! [`NaiveMcd::query`] return the same value.

/// Anything that exposes a credit density.
pub trait CreditDensity {
    /// Returns `credit / size`.
    fn credit_density(&self) -> f64;
}

/// Strategy for answering "what is the minimum credit density right now?".
pub trait McdTracker: Default {
    /// Name of the Landlord variant built on this tracker, for metrics output.
    const POLICY_NAME: &'static str;

    /// A new entry was admitted.
    fn notify_added<E: CreditDensity + ?Sized>(&mut self, entry: &E);

    /// An entry's credit was lowered and the entry stays resident.
    fn notify_decreased<E: CreditDensity + ?Sized>(&mut self, entry: &E);

    /// An entry's credit is about to be raised, or the entry is about to be removed.
    fn notify_impending_mutation<E: CreditDensity + ?Sized>(&mut self, entry: &E);

    /// Completes the pair started by [`notify_impending_mutation`](Self::notify_impending_mutation).
    fn notify_mutated_or_removed<E: CreditDensity + ?Sized>(&mut self, entry: &E);

    /// Returns the minimum credit density over `entries`.
    ///
    /// Returns `f64::INFINITY` when `entries` is empty.
    fn query<'a, E, I>(&mut self, entries: I) -> f64
    where
        E: CreditDensity + 'a,
        I: IntoIterator<Item = &'a E>;

    /// Forgets all cached state, e.g. after the policy was cleared.
    fn reset(&mut self);
}

fn scan<'a, E, I>(entries: I) -> f64
where
    E: CreditDensity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entries
        .into_iter()
        .map(CreditDensity::credit_density)
        .fold(f64::INFINITY, f64::min)
}

/// Scans every entry on each query.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveMcd;

impl McdTracker for NaiveMcd {
    const POLICY_NAME: &'static str = "LandlordNaive";

    #[inline]
    fn notify_added<E: CreditDensity + ?Sized>(&mut self, _entry: &E) {}

    #[inline]
    fn notify_decreased<E: CreditDensity + ?Sized>(&mut self, _entry: &E) {}

    #[inline]
    fn notify_impending_mutation<E: CreditDensity + ?Sized>(&mut self, _entry: &E) {}

    #[inline]
    fn notify_mutated_or_removed<E: CreditDensity + ?Sized>(&mut self, _entry: &E) {}

    fn query<'a, E, I>(&mut self, entries: I) -> f64
    where
        E: CreditDensity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        scan(entries)
    }

    #[inline]
    fn reset(&mut self) {}
}

/// Relative tolerance used to decide whether an entry holds the cached minimum.
/// A spurious match only forces a rescan.
const MIN_MATCH_TOLERANCE: f64 = 1.0e-9;

fn holds_min(min: f64, density: f64) -> bool {
    let diff = if min > density {
        min - density
    } else {
        density - min
    };
    let scale = f64::max(1.0, f64::max(min, density));
    diff <= MIN_MATCH_TOLERANCE * scale
}

/// Maintains a running minimum that is rescanned only after the entry
/// holding it was raised or removed.
#[derive(Debug, Clone, Copy)]
pub struct CachedMcd {
    min: f64,
    valid: bool,
    was_min: bool,
}

impl Default for CachedMcd {
    fn default() -> Self {
        CachedMcd {
            min: f64::INFINITY,
            valid: false,
            was_min: false,
        }
    }
}

impl CachedMcd {
    /// Returns the cached minimum, if it is currently valid.
    pub fn cached(&self) -> Option<f64> {
        self.valid.then_some(self.min)
    }
}

impl McdTracker for CachedMcd {
    const POLICY_NAME: &'static str = "LandlordCached";

    #[inline]
    fn notify_added<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        // A new entry can only lower or preserve the minimum.
        self.notify_decreased(entry);
    }

    #[inline]
    fn notify_decreased<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        if self.valid {
            self.min = f64::min(self.min, entry.credit_density());
        }
    }

    #[inline]
    fn notify_impending_mutation<E: CreditDensity + ?Sized>(&mut self, entry: &E) {
        self.was_min = self.valid && holds_min(self.min, entry.credit_density());
    }

    #[inline]
    fn notify_mutated_or_removed<E: CreditDensity + ?Sized>(&mut self, _entry: &E) {
        if self.was_min {
            self.valid = false;
            self.was_min = false;
        }
    }

    fn query<'a, E, I>(&mut self, entries: I) -> f64
    where
        E: CreditDensity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        if !self.valid {
            self.min = scan(entries);
            self.valid = true;
        }
        self.min
    }

    fn reset(&mut self) {
        *self = CachedMcd::default();
    }
}
