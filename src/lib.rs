// Order Flow Trainer Library
//
// Synthetic order book, footprint and trade tape driven by a periodic random walk,
// for teaching how to read order flow

pub mod config;
pub mod error;       // Unified error handling
pub mod render;      // Text ladder for the CLI
pub mod simulation;
pub mod types;

// Re-export configuration
pub use config::{Config, ConfigError, SimulationConfig, OrderBookConfig, ClusterConfig, TapeConfig, LoggingConfig};

// Re-export error types
pub use error::{TrainerError, TrainerResult};

// Re-export shared types
pub use types::{Side, SimulationStatus};

// Re-export simulation components
pub use simulation::{
    MarketSimulator, SimulationClock, SimulationState, SimulationStats,
    OrderBookLevel, OrderBookSnapshot, ClusterCell, ClusterSnapshot, Trade,
};

pub use render::LadderRenderer;
