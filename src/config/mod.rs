//! Policy Configuration Module
//!
//! This module provides configuration structures for the eviction policies.
//! Each policy family has its own configuration struct built with a
//! constructor plus `with_*` builder methods.
//!
//! | Config | Policies | Tunables |
//! |--------|----------|----------|
//! | [`LandlordConfig`] | [`LandlordNaive`](crate::LandlordNaive), [`LandlordCached`](crate::LandlordCached), [`LandlordLazy`](crate::LandlordLazy) | `gain`, `epsilon`, `initial_capacity` |
//! | [`LruConfig`] | [`LruPolicy`](crate::LruPolicy) | `initial_capacity` |
//!
//! # Examples
//!
//! ```
//! use landlord_cache::config::LandlordConfig;
//! use landlord_cache::{Cache, LandlordLazy};
//!
//! let config = LandlordConfig::new().with_gain(0.9);
//! let mut cache: Cache<&str, u32, LandlordLazy<&str, u32>> =
//!     Cache::with_policy(LandlordLazy::new(config));
//! cache.add("a", 1, 10, 10.0);
//! assert!(!cache.is_empty());
//! ```

pub mod landlord;
pub mod lru;

pub use landlord::LandlordConfig;
pub use lru::LruConfig;
