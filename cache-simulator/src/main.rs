use std::path::PathBuf;
use std::process::ExitCode;

use cache_simulator::generator::{TraceConfig, TraceGenerator};
use cache_simulator::input::TraceReader;
use cache_simulator::models::{CacheAlgorithm, SimulationConfig};
use cache_simulator::runner::SimulationRunner;
use cache_simulator::SimError;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Landlord cache simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay traces against the selected algorithms
    Simulate {
        /// Glob pattern selecting trace files, e.g. "traces/*.csv"
        #[arg(short, long, value_name = "GLOB")]
        input: String,

        /// Cache size budget in bytes
        #[arg(short, long, default_value = "104857600")]
        budget: u64,

        /// Algorithms to simulate (landlord-naive, landlord-cached,
        /// landlord-lazy, lru, lru-crate). All when omitted.
        #[arg(short, long, value_name = "ALGOS", num_args = 1.., value_delimiter = ',')]
        algorithms: Option<Vec<String>>,

        /// Replay hits as inspections that do not restore credit
        #[arg(long)]
        no_refill: bool,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate a synthetic `key,size,cost` trace
    Generate {
        /// Output file
        #[arg(short, long, default_value = "trace.csv")]
        output: PathBuf,

        /// Number of requests
        #[arg(short, long, default_value = "100000")]
        requests: u64,

        /// Number of distinct objects
        #[arg(short, long, default_value = "10000")]
        unique_objects: u32,

        /// Percentage of objects that are popular
        #[arg(long, default_value = "20")]
        popular_objects_percent: u8,

        /// Percentage of requests that go to popular objects
        #[arg(long, default_value = "80")]
        popular_traffic_percent: u8,

        /// Minimum object size in bytes
        #[arg(long, default_value = "1024")]
        min_size: u64,

        /// Maximum object size in bytes
        #[arg(long, default_value = "1048576")]
        max_size: u64,

        /// Minimum fetch cost
        #[arg(long, default_value = "1.0")]
        min_cost: f64,

        /// Maximum fetch cost
        #[arg(long, default_value = "100.0")]
        max_cost: f64,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SimError> {
    match args.command {
        Commands::Simulate {
            input,
            budget,
            algorithms,
            no_refill,
            output_csv,
        } => {
            let algorithms = match algorithms {
                Some(names) => names
                    .iter()
                    .map(|name| name.parse())
                    .collect::<Result<Vec<CacheAlgorithm>, _>>()?,
                None => CacheAlgorithm::all(),
            };

            let requests = TraceReader::new(input).read_all()?;
            info!(requests = requests.len(), "trace loaded");

            let runner = SimulationRunner::new(SimulationConfig {
                budget,
                refill: !no_refill,
                algorithms,
            });
            let stats = runner.run(&requests);
            stats.print_summary();

            if let Some(path) = output_csv {
                stats.export_csv(&path)?;
                info!(path = %path.display(), "results exported");
            }
            Ok(())
        }
        Commands::Generate {
            output,
            requests,
            unique_objects,
            popular_objects_percent,
            popular_traffic_percent,
            min_size,
            max_size,
            min_cost,
            max_cost,
            seed,
        } => {
            let generator = TraceGenerator::new(TraceConfig {
                requests,
                unique_objects,
                popular_objects_percent,
                popular_traffic_percent,
                min_size,
                max_size,
                min_cost,
                max_cost,
                seed,
            });
            generator.write_to(&output)?;
            Ok(())
        }
    }
}
