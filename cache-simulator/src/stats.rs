// Statistics collection and reporting for cache simulation

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SimError;
use crate::models::{AlgorithmStats, CacheAlgorithm, CsvResultRow, SimulationConfig};

/// Collects and reports statistics from simulation runs
#[derive(Debug)]
pub struct SimulationStats {
    budget: u64,
    refill: bool,
    /// Results ordered by algorithm
    stats: BTreeMap<CacheAlgorithm, AlgorithmStats>,
}

impl SimulationStats {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            budget: config.budget,
            refill: config.refill,
            stats: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, algorithm: CacheAlgorithm, stats: AlgorithmStats) {
        self.stats.insert(algorithm, stats);
    }

    pub fn get(&self, algorithm: CacheAlgorithm) -> Option<&AlgorithmStats> {
        self.stats.get(&algorithm)
    }

    /// Print a comparison table to stdout
    pub fn print_summary(&self) {
        let total_requests = self.stats.values().map(|s| s.requests()).max().unwrap_or(0);

        println!("\nCache Simulation Summary");
        println!("========================");
        println!("Total requests: {total_requests}");
        println!("Budget: {} bytes", self.budget);
        println!(
            "Access reward: {}",
            if self.refill { "on" } else { "off (--no-refill)" }
        );

        println!(
            "\n{:<16} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>12} {:>10}",
            "Algorithm",
            "Hits",
            "Misses",
            "Hit %",
            "Byte Hit %",
            "Cost Sav %",
            "Batch",
            "Evictions",
            "Time (ms)"
        );
        println!("{}", "-".repeat(104));

        for (algorithm, stats) in &self.stats {
            println!(
                "{:<16} {:>10} {:>10} {:>9.2}% {:>9.2}% {:>9.2}% {:>8} {:>12} {:>10}",
                algorithm.as_str(),
                stats.hits,
                stats.misses,
                stats.hit_rate(),
                stats.byte_hit_rate(),
                stats.cost_saving_rate(),
                stats.max_eviction_batch,
                stats.evictions,
                stats.simulation_time_ms
            );
        }

        if let Some((best, stats)) = self
            .stats
            .iter()
            .max_by(|a, b| a.1.cost_saving_rate().total_cmp(&b.1.cost_saving_rate()))
        {
            println!(
                "\nLowest total fetch cost: {} ({:.2}% of cost avoided)",
                best,
                stats.cost_saving_rate()
            );
        }
    }

    /// Export results to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<(), SimError> {
        let mut writer = csv::Writer::from_path(path)?;

        for (algorithm, stats) in &self.stats {
            writer.serialize(CsvResultRow {
                algorithm: algorithm.cli_name().to_string(),
                refill: self.refill,
                budget: self.budget,
                requests: stats.requests(),
                hits: stats.hits,
                misses: stats.misses,
                hit_rate: stats.hit_rate(),
                byte_hit_rate: stats.byte_hit_rate(),
                cost_saving_rate: stats.cost_saving_rate(),
                evictions: stats.evictions,
                bypassed: stats.bypassed,
                max_eviction_batch: stats.max_eviction_batch,
                peak_bytes: stats.peak_bytes,
                time_ms: stats.simulation_time_ms,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}
