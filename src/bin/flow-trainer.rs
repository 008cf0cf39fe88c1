// Order Flow Trainer - CLI
// Runs the synthetic market and renders the ladder, footprint and tape

use clap::{Parser, Subcommand};
use order_flow_trainer::{Config, TrainerError, TrainerResult};
use std::path::Path;
use tracing::{error, info, Level};

#[path = "../cli/run_commands.rs"]
mod run_commands;

use run_commands::RunOptions;

#[derive(Parser)]
#[command(name = "flow-trainer")]
#[command(version)]
#[command(about = "Synthetic order book and tape trainer", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "trainer.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the live simulation
    Run {
        /// Stop after this many ticks
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Stop after this many seconds
        #[arg(short, long)]
        seconds: Option<f64>,

        /// RNG seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Tick interval override in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Start paused
        #[arg(long)]
        paused: bool,

        /// Print one JSON snapshot per line instead of the ladder
        #[arg(long)]
        json: bool,

        /// Levels shown per side
        #[arg(short, long, default_value = "10")]
        depth: usize,
    },

    /// Advance the market N ticks without a timer and print the result
    Snapshot {
        /// Number of ticks to apply
        #[arg(short, long, default_value = "1")]
        ticks: u64,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of the ladder
        #[arg(long)]
        json: bool,

        /// Levels shown per side
        #[arg(short, long, default_value = "10")]
        depth: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Init writes the config, so it must not require one
    let config = match &cli.command {
        Commands::Init { .. } => Config::default(),
        _ => match load_config(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {}", e.user_message());
                std::process::exit(1);
            }
        },
    };

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.level.parse().unwrap_or(Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("📁 Config: {}", cli.config);

    let result = match cli.command {
        Commands::Init { force } => init_config(&cli.config, force),

        Commands::Run { ticks, seconds, seed, interval_ms, paused, json, depth } => {
            let mut config = config;
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            if let Some(ms) = interval_ms {
                config.simulation.tick_interval_ms = ms;
            }
            if paused {
                config.simulation.start_active = false;
            }

            let options = RunOptions { ticks, seconds, json, depth };
            run_commands::run_simulation(config, options).await
        }

        Commands::Snapshot { ticks, seed, json, depth } => {
            let mut config = config;
            if seed.is_some() {
                config.simulation.seed = seed;
            }
            run_commands::print_snapshot(config, ticks, json, depth)
        }
    };

    if let Err(e) = result {
        error!("❌ [{}] {}", e.category(), e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

/// Load the config file if present, otherwise fall back to defaults
fn load_config(path: &str) -> TrainerResult<Config> {
    if Path::new(path).exists() {
        Ok(Config::from_file(path)?)
    } else {
        Ok(Config::default())
    }
}

fn init_config(path: &str, force: bool) -> TrainerResult<()> {
    if Path::new(path).exists() && !force {
        return Err(TrainerError::FileWrite(format!(
            "{} already exists (use --force to overwrite)",
            path
        )));
    }

    Config::default().to_file(path)?;
    info!("✅ Wrote default configuration to {}", path);
    Ok(())
}
