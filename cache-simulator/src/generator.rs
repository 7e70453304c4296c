//! Synthetic trace generation
//!
//! Builds a catalog of objects with fixed sizes and fetch costs, then draws
//! requests so that a small popular set receives most of the traffic.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::SimError;
use crate::models::Request;

/// Parameters for generating a trace
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Number of requests to emit
    pub requests: u64,
    /// Number of distinct objects
    pub unique_objects: u32,
    /// Percentage of objects considered popular
    pub popular_objects_percent: u8,
    /// Percentage of requests that go to popular objects
    pub popular_traffic_percent: u8,
    /// Minimum object size in bytes
    pub min_size: u64,
    /// Maximum object size in bytes
    pub max_size: u64,
    /// Minimum fetch cost
    pub min_cost: f64,
    /// Maximum fetch cost
    pub max_cost: f64,
    pub seed: u64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            unique_objects: 10_000,
            popular_objects_percent: 20,
            popular_traffic_percent: 80,
            min_size: 1024,        // 1KB
            max_size: 1024 * 1024, // 1MB
            min_cost: 1.0,
            max_cost: 100.0,
            seed: 42,
        }
    }
}

/// Generates requests according to a [`TraceConfig`]
#[derive(Debug)]
pub struct TraceGenerator {
    config: TraceConfig,
}

impl TraceGenerator {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Produce the full request sequence. The same config always yields the
    /// same trace.
    pub fn generate(&self) -> Vec<Request> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let unique = config.unique_objects.max(1);
        let min_size = config.min_size.max(1);
        let max_size = config.max_size.max(min_size);
        let min_cost = config.min_cost.max(0.0);
        let max_cost = config.max_cost.max(min_cost);

        let catalog: Vec<(u64, f64)> = (0..unique)
            .map(|_| {
                let size = rng.gen_range(min_size..=max_size);
                let cost = rng.gen_range(min_cost..=max_cost);
                (size, cost)
            })
            .collect();

        let popular = (u64::from(unique) * u64::from(config.popular_objects_percent.min(100))
            / 100)
            .clamp(1, u64::from(unique)) as u32;
        let popular_share = config.popular_traffic_percent.min(100);

        (0..config.requests)
            .map(|_| {
                let id = if popular == unique || rng.gen_range(0..100u8) < popular_share {
                    rng.gen_range(0..popular)
                } else {
                    rng.gen_range(popular..unique)
                };
                let (size, cost) = catalog[id as usize];
                Request::new(format!("obj_{id}"), size, cost)
            })
            .collect()
    }

    /// Write the trace as CSV with a `key,size,cost` header and return the
    /// number of requests written.
    pub fn write_to(&self, path: &Path) -> Result<u64, SimError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        let requests = self.generate();
        for request in &requests {
            writer.serialize(request)?;
        }
        writer.flush()?;

        info!(
            path = %path.display(),
            requests = requests.len(),
            objects = self.config.unique_objects,
            "wrote trace"
        );
        Ok(requests.len() as u64)
    }
}
