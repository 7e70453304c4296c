//! Configuration for the Landlord eviction policies.
//!
//! `LandlordConfig` is shared by [`LandlordNaive`](crate::LandlordNaive),
//! [`LandlordCached`](crate::LandlordCached) and
//! [`LandlordLazy`](crate::LandlordLazy).
//!
//! # Examples
//!
//! ```
//! use landlord_cache::config::LandlordConfig;
//! use landlord_cache::LandlordCached;
//!
//! // Defaults: gain 0.75, epsilon 0.0001
//! let policy: LandlordCached<String, Vec<u8>> = LandlordCached::new(LandlordConfig::new());
//!
//! // Tuned: each hit restores half of the spent credit
//! let config = LandlordConfig::new()
//!     .with_gain(0.5)
//!     .with_initial_capacity(4096);
//! let policy: LandlordCached<String, Vec<u8>> = LandlordCached::new(config);
//! ```

use core::fmt;

/// Default fraction of an entry's cost restored on each access.
pub const DEFAULT_GAIN: f64 = 0.75;

/// Default credit below which an entry counts as exhausted.
pub const DEFAULT_EPSILON: f64 = 0.0001;

/// Tunables for the Landlord policies.
///
/// # Parameters
///
/// - `gain`: on every access, `credit := gain * cost + (1 - gain) * credit`.
///   Must lie in `(0, 1]`. Values below one keep repeatedly-hit entries
///   evictable. Default: `0.75`.
/// - `epsilon`: credit threshold under which a charged entry is evicted. It
///   absorbs rounding error in the density computation. Default: `0.0001`.
/// - `initial_capacity`: number of entries to reserve map space for. Default: `0`.
///
/// Both `gain` and `epsilon` are empirically tuned, not derived; override them
/// when the workload calls for it.
#[derive(Clone, Copy)]
pub struct LandlordConfig {
    gain: f64,
    epsilon: f64,
    initial_capacity: usize,
}

impl LandlordConfig {
    /// Creates a configuration with the default gain and epsilon.
    ///
    /// # Examples
    ///
    /// ```
    /// use landlord_cache::config::LandlordConfig;
    ///
    /// let config = LandlordConfig::new();
    /// assert_eq!(config.gain(), 0.75);
    /// assert_eq!(config.epsilon(), 0.0001);
    /// assert_eq!(config.initial_capacity(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            epsilon: DEFAULT_EPSILON,
            initial_capacity: 0,
        }
    }

    /// Sets the access reward gain.
    ///
    /// # Arguments
    ///
    /// * `gain` - Fraction of the cost restored per access, in `(0, 1]`
    #[must_use]
    pub fn with_gain(mut self, gain: f64) -> Self {
        debug_assert!(gain > 0.0 && gain <= 1.0, "gain must lie in (0, 1]");
        self.gain = gain;
        self
    }

    /// Sets the eviction threshold.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Credit below which an entry is evicted, `> 0`
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        debug_assert!(epsilon > 0.0, "epsilon must be positive");
        self.epsilon = epsilon;
        self
    }

    /// Reserves map space for the given number of entries.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Returns the access reward gain.
    #[inline]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Returns the eviction threshold.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the number of entries to reserve space for.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl Default for LandlordConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LandlordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandlordConfig")
            .field("gain", &self.gain)
            .field("epsilon", &self.epsilon)
            .field("initial_capacity", &self.initial_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landlord_config_defaults() {
        let config = LandlordConfig::default();
        assert_eq!(config.gain(), DEFAULT_GAIN);
        assert_eq!(config.epsilon(), DEFAULT_EPSILON);
        assert_eq!(config.initial_capacity(), 0);
    }

    #[test]
    fn test_landlord_config_builder_pattern() {
        let config = LandlordConfig::new()
            .with_gain(0.5)
            .with_epsilon(1.0e-6)
            .with_initial_capacity(128);
        assert_eq!(config.gain(), 0.5);
        assert_eq!(config.epsilon(), 1.0e-6);
        assert_eq!(config.initial_capacity(), 128);
    }

    #[test]
    #[should_panic(expected = "gain must lie in (0, 1]")]
    #[cfg(debug_assertions)]
    fn test_landlord_config_rejects_zero_gain() {
        let _ = LandlordConfig::new().with_gain(0.0);
    }
}
