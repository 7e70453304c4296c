#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Choosing a Policy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Which Eviction Policy Should I Use?                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Do entries differ in reload cost or size?                              │
//! │       │                                                                 │
//! │      No ──────────────────────────────▶ ┌──────────────┐                │
//! │       │                                 │  LruPolicy   │                │
//! │      Yes                                └──────────────┘                │
//! │       ▼                                                                 │
//! │  Is eviction on the hot path, with few touches between evictions?       │
//! │       │                                                                 │
//! │      Yes ─────────────────────────────▶ ┌──────────────┐                │
//! │       │                                 │ LandlordLazy │                │
//! │      No                                 └──────────────┘                │
//! │       ▼                                                                 │
//! │  ┌────────────────┐                                                     │
//! │  │ LandlordCached │  (LandlordNaive as a reference / for testing)       │
//! │  └────────────────┘                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Policy | Description | Eviction cost |
//! |--------|-------------|---------------|
//! | [`LandlordNaive`] | Landlord, full scan for the minimum credit density | O(n) |
//! | [`LandlordCached`] | Landlord, cached minimum credit density (default) | O(n) charge, O(1) query |
//! | [`LandlordLazy`] | Landlord, min-heap with deferred charges | O(log n) |
//! | [`LruPolicy`] | Least Recently Used, cost-oblivious | O(1) |
//!
//! ## Code Examples
//!
//! ### Default cache
//!
//! ```rust
//! use landlord_cache::Cache;
//!
//! let mut cache: Cache<String, Vec<u8>> = Cache::new();
//! cache.add("small.png".to_string(), vec![0u8; 16], 16, 4.0);
//! cache.add("large.bin".to_string(), vec![0u8; 4096], 4096, 8.0);
//!
//! // An access moves the entry's credit back toward its cost.
//! assert!(cache.retrieve("small.png", true).is_some());
//!
//! // Evict until within a size budget.
//! let budget = 1024;
//! let mut used: u64 = 16 + 4096;
//! while used > budget {
//!     let (_, size) = cache.remove_least_valuable().unwrap();
//!     used -= size;
//! }
//! assert!(cache.retrieve("small.png", false).is_some());
//! ```
//!
//! ### Choosing a policy
//!
//! ```rust
//! use landlord_cache::config::{LandlordConfig, LruConfig};
//! use landlord_cache::{Cache, LandlordLazy, LruPolicy};
//!
//! let lazy: Cache<u64, String, LandlordLazy<u64, String>> =
//!     Cache::with_policy(LandlordLazy::new(LandlordConfig::new().with_gain(0.5)));
//!
//! let lru: Cache<u64, String, LruPolicy<u64, String>> =
//!     Cache::with_policy(LruPolicy::new(LruConfig::new()));
//! # let _ = (lazy, lru);
//! ```
//!
//! ### Fallible operations
//!
//! ```rust
//! use landlord_cache::{Cache, CacheError};
//!
//! let mut cache: Cache<&str, u32> = Cache::new();
//! assert_eq!(cache.try_add("k", 1, 0, 1.0), Err(CacheError::ZeroSize));
//! assert_eq!(cache.try_remove("k"), Err(CacheError::KeyNotFound));
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The [`Cache`] façade with its staging queue
//! - [`policy`]: The [`EvictionPolicy`] trait and its implementations
//! - [`mcd`]: Minimum credit density trackers
//! - [`divider`]: Credit density division strategies
//! - [`config`]: Configuration structures for each policy family
//! - [`metrics`]: Metrics collection for cache performance monitoring

#![no_std]

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

/// Credit density division strategies.
pub mod divider;

/// Per-entry accounting record.
pub mod entry;

/// Minimum credit density tracking.
///
/// Provides the naive and cached strategies used by
/// [`Landlord`](crate::policy::Landlord).
pub mod mcd;

/// Doubly linked list used for recency ordering.
///
/// **Note**: This module is internal infrastructure. It exposes unsafe raw
/// pointer operations that require careful invariant maintenance.
pub(crate) mod list;

/// Eviction policies: Landlord variants and LRU.
pub mod policy;

/// Policy configuration structures.
pub mod config;

/// Cache façade.
pub mod cache;

/// Error type for fallible cache operations.
pub mod error;

/// Cache metrics system.
///
/// Provides counters and a uniform reporting interface shared by every
/// policy behind the [`Cache`] façade.
pub mod metrics;

pub use cache::Cache;
pub use entry::CacheEntry;
pub use error::CacheError;
pub use policy::{
    EvictionPolicy, Landlord, LandlordCached, LandlordLazy, LandlordNaive, LruPolicy,
};
