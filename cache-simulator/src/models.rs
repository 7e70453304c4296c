// Data models for cache simulation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// One record of a trace: a request for `key`, which costs `cost` to fetch
/// on a miss and occupies `size` bytes once cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub key: String,
    pub size: u64,
    pub cost: f64,
}

impl Request {
    pub fn new(key: impl Into<String>, size: u64, cost: f64) -> Self {
        Self {
            key: key.into(),
            size,
            cost,
        }
    }
}

/// Cache algorithms available for simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheAlgorithm {
    LandlordNaive,
    LandlordCached,
    LandlordLazy,
    Lru,
    /// `lru` crate baseline
    LruCrate,
}

impl CacheAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheAlgorithm::LandlordNaive => "LandlordNaive",
            CacheAlgorithm::LandlordCached => "LandlordCached",
            CacheAlgorithm::LandlordLazy => "LandlordLazy",
            CacheAlgorithm::Lru => "LRU",
            CacheAlgorithm::LruCrate => "lru-crate",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            CacheAlgorithm::LandlordNaive => "landlord-naive",
            CacheAlgorithm::LandlordCached => "landlord-cached",
            CacheAlgorithm::LandlordLazy => "landlord-lazy",
            CacheAlgorithm::Lru => "lru",
            CacheAlgorithm::LruCrate => "lru-crate",
        }
    }

    /// Get all available algorithms
    pub fn all() -> Vec<CacheAlgorithm> {
        vec![
            CacheAlgorithm::LandlordNaive,
            CacheAlgorithm::LandlordCached,
            CacheAlgorithm::LandlordLazy,
            CacheAlgorithm::Lru,
            CacheAlgorithm::LruCrate,
        ]
    }
}

impl FromStr for CacheAlgorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        CacheAlgorithm::all()
            .into_iter()
            .find(|algo| algo.cli_name() == name)
            .ok_or_else(|| SimError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for CacheAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Byte budget the cache must stay within after every request
    pub budget: u64,
    /// Whether hits reward the entry with credit
    pub refill: bool,
    pub algorithms: Vec<CacheAlgorithm>,
}

/// Statistics for a single algorithm
#[derive(Debug, Clone, Default)]
pub struct AlgorithmStats {
    pub hits: u64,
    pub misses: u64,
    pub bytes_hit: u64,
    pub bytes_miss: u64,
    /// Fetch cost avoided by hits
    pub cost_hit: f64,
    /// Fetch cost paid on misses
    pub cost_miss: f64,
    pub evictions: u64,
    /// Misses too large to fit in the budget at all
    pub bypassed: u64,
    /// Largest number of entries one eviction pass exhausted together
    pub max_eviction_batch: u64,
    pub peak_bytes: u64,
    pub simulation_time_ms: u64,
}

impl AlgorithmStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits as f64, self.requests() as f64)
    }

    pub fn byte_hit_rate(&self) -> f64 {
        ratio(
            self.bytes_hit as f64,
            (self.bytes_hit + self.bytes_miss) as f64,
        )
    }

    /// Share of total fetch cost that hits avoided
    pub fn cost_saving_rate(&self) -> f64 {
        ratio(self.cost_hit, self.cost_hit + self.cost_miss)
    }
}

fn ratio(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part * 100.0 / total
    } else {
        0.0
    }
}

/// Row written by [`SimulationStats::export_csv`](crate::stats::SimulationStats::export_csv)
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub algorithm: String,
    pub refill: bool,
    pub budget: u64,
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub byte_hit_rate: f64,
    pub cost_saving_rate: f64,
    pub evictions: u64,
    pub bypassed: u64,
    pub max_eviction_batch: u64,
    pub peak_bytes: u64,
    pub time_ms: u64,
}
