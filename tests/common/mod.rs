// Common test utilities and helpers

#![allow(dead_code)]

use order_flow_trainer::{Config, MarketSimulator};
use tempfile::TempDir;
use std::path::PathBuf;

/// Default reference behavior with per-tick logging off
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.logging.log_ticks = false;
    config
}

/// Test config with a fixed seed and a short interval for clock tests
pub fn create_fast_config(interval_ms: u64) -> Config {
    let mut config = create_test_config();
    config.simulation.seed = Some(7);
    config.simulation.tick_interval_ms = interval_ms;
    config
}

pub fn seeded_simulator(seed: u64) -> MarketSimulator {
    MarketSimulator::with_seed(create_test_config(), seed)
}

/// Create a temporary directory holding a config path
pub fn create_temp_config_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("trainer.toml");
    (temp_dir, path)
}
