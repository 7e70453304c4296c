//! Configuration for the LRU eviction policy.
//!
//! # Examples
//!
//! ```
//! use landlord_cache::config::LruConfig;
//! use landlord_cache::LruPolicy;
//!
//! let config = LruConfig::new().with_initial_capacity(1024);
//! let policy: LruPolicy<u64, Vec<u8>> = LruPolicy::new(config);
//! ```

use core::fmt;

/// Configuration for [`LruPolicy`](crate::LruPolicy).
///
/// LRU ignores cost and credit, so the only setting is how much map space to
/// reserve up front.
#[derive(Clone, Copy, Default)]
pub struct LruConfig {
    initial_capacity: usize,
}

impl LruConfig {
    /// Creates a configuration with no reserved capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_capacity: 0,
        }
    }

    /// Reserves map space for the given number of entries.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Returns the number of entries to reserve space for.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl fmt::Debug for LruConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruConfig")
            .field("initial_capacity", &self.initial_capacity)
            .finish()
    }
}
