//! Trace-driven simulator for the `landlord-cache` eviction policies.
//!
//! Traces are CSV files with a `key,size,cost` header. The [`generator`]
//! writes synthetic ones, [`input`] reads them back, and [`runner`] replays
//! them against each policy under a byte budget.

pub mod error;
pub mod generator;
pub mod input;
pub mod models;
pub mod runner;
pub mod stats;

pub use error::SimError;
