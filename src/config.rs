// Configuration management for the order flow trainer

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,
    #[serde(default = "default_spread")]
    pub spread: f64,
    #[serde(default = "default_tick_size")]
    pub tick_size: f64,
    #[serde(default = "default_price_precision")]
    pub price_precision: u32,
    #[serde(default = "default_max_price_step")]
    pub max_price_step: f64,
    #[serde(default = "default_min_price")]
    pub min_price: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_true")]
    pub start_active: bool,
    /// Fixed RNG seed for reproducible sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookConfig {
    #[serde(default = "default_book_depth")]
    pub depth: usize,
    #[serde(default = "default_base_volume")]
    pub base_volume: u64,
    #[serde(default = "default_max_volume")]
    pub max_volume: u64,
    #[serde(default = "default_high_volume_threshold")]
    pub high_volume_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cells on each side of the reference price (band is 2K+1 wide)
    #[serde(default = "default_cluster_half_width")]
    pub half_width: usize,
    #[serde(default = "default_cluster_min_volume")]
    pub min_volume: u64,
    #[serde(default = "default_cluster_volume_range")]
    pub volume_range: u64,
    #[serde(default = "default_important_threshold")]
    pub important_threshold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapeConfig {
    #[serde(default = "default_tape_capacity")]
    pub capacity: usize,
    #[serde(default = "default_trade_price_jitter")]
    pub price_jitter: f64,
    #[serde(default = "default_trade_min_volume")]
    pub min_volume: u64,
    #[serde(default = "default_trade_volume_range")]
    pub volume_range: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub log_ticks: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub order_book: OrderBookConfig,
    #[serde(default)]
    pub clusters: ClusterConfig,
    #[serde(default)]
    pub tape: TapeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default value functions
fn default_initial_price() -> f64 { DEFAULT_INITIAL_PRICE }
fn default_spread() -> f64 { DEFAULT_SPREAD }
fn default_tick_size() -> f64 { DEFAULT_TICK_SIZE }
fn default_price_precision() -> u32 { DEFAULT_PRICE_PRECISION }
fn default_max_price_step() -> f64 { DEFAULT_MAX_PRICE_STEP }
fn default_min_price() -> f64 { DEFAULT_MIN_PRICE }
fn default_tick_interval_ms() -> u64 { DEFAULT_TICK_INTERVAL_MS }
fn default_true() -> bool { true }
fn default_book_depth() -> usize { DEFAULT_BOOK_DEPTH }
fn default_base_volume() -> u64 { DEFAULT_BASE_VOLUME }
fn default_max_volume() -> u64 { DEFAULT_MAX_VOLUME }
fn default_high_volume_threshold() -> u64 { DEFAULT_HIGH_VOLUME_THRESHOLD }
fn default_cluster_half_width() -> usize { DEFAULT_CLUSTER_HALF_WIDTH }
fn default_cluster_min_volume() -> u64 { DEFAULT_CLUSTER_MIN_VOLUME }
fn default_cluster_volume_range() -> u64 { DEFAULT_CLUSTER_VOLUME_RANGE }
fn default_important_threshold() -> i64 { DEFAULT_IMPORTANT_THRESHOLD }
fn default_tape_capacity() -> usize { DEFAULT_TAPE_CAPACITY }
fn default_trade_price_jitter() -> f64 { DEFAULT_TRADE_PRICE_JITTER }
fn default_trade_min_volume() -> u64 { DEFAULT_TRADE_MIN_VOLUME }
fn default_trade_volume_range() -> u64 { DEFAULT_TRADE_VOLUME_RANGE }
fn default_log_level() -> String { "info".to_string() }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_price: default_initial_price(),
            spread: default_spread(),
            tick_size: default_tick_size(),
            price_precision: default_price_precision(),
            max_price_step: default_max_price_step(),
            min_price: default_min_price(),
            tick_interval_ms: default_tick_interval_ms(),
            start_active: true,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            depth: default_book_depth(),
            base_volume: default_base_volume(),
            max_volume: default_max_volume(),
            high_volume_threshold: default_high_volume_threshold(),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            half_width: default_cluster_half_width(),
            min_volume: default_cluster_min_volume(),
            volume_range: default_cluster_volume_range(),
            important_threshold: default_important_threshold(),
        }
    }
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            capacity: default_tape_capacity(),
            price_jitter: default_trade_price_jitter(),
            min_volume: default_trade_min_volume(),
            volume_range: default_trade_volume_range(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_ticks: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;

        if !sim.initial_price.is_finite() || sim.initial_price <= 0.0 {
            return Err(ConfigError::Validation("initial_price must be positive".to_string()));
        }

        if !sim.spread.is_finite() || sim.spread < 0.0 {
            return Err(ConfigError::Validation("spread must be non-negative".to_string()));
        }

        if !sim.tick_size.is_finite() || sim.tick_size <= 0.0 {
            return Err(ConfigError::Validation("tick_size must be positive".to_string()));
        }

        if sim.price_precision > MAX_PRICE_PRECISION {
            return Err(ConfigError::Validation(format!(
                "price_precision {} exceeds the maximum of {}",
                sim.price_precision, MAX_PRICE_PRECISION
            )));
        }

        // Best ask and best bid must stay distinct after rounding
        let resolution = 10f64.powi(-(sim.price_precision as i32));
        if sim.spread < resolution - f64::EPSILON {
            return Err(ConfigError::Validation(format!(
                "spread {} is below one price unit at precision {} and would lock the book",
                sim.spread, sim.price_precision
            )));
        }

        // Adjacent levels must stay distinct after rounding
        if sim.tick_size < resolution - f64::EPSILON {
            return Err(ConfigError::Validation(format!(
                "tick_size {} is finer than price_precision {} can represent",
                sim.tick_size, sim.price_precision
            )));
        }

        if !sim.max_price_step.is_finite() || sim.max_price_step < 0.0 {
            return Err(ConfigError::Validation("max_price_step must be non-negative".to_string()));
        }

        if !sim.min_price.is_finite() || sim.min_price <= 0.0 {
            return Err(ConfigError::Validation("min_price must be positive".to_string()));
        }

        if sim.initial_price < sim.min_price {
            return Err(ConfigError::Validation(format!(
                "initial_price {} is below min_price {}",
                sim.initial_price, sim.min_price
            )));
        }

        if sim.tick_interval_ms == 0 {
            return Err(ConfigError::Validation("tick_interval_ms must be greater than 0".to_string()));
        }

        if self.order_book.depth == 0 {
            return Err(ConfigError::Validation("order_book.depth must be greater than 0".to_string()));
        }

        if self.order_book.max_volume == 0 {
            return Err(ConfigError::Validation("order_book.max_volume must be greater than 0".to_string()));
        }

        check_volume_range("order_book", self.order_book.base_volume, self.order_book.max_volume)?;

        if self.clusters.volume_range == 0 {
            return Err(ConfigError::Validation("clusters.volume_range must be greater than 0".to_string()));
        }

        // Cell delta is buy minus sell as i64
        let cluster_upper = check_volume_range("clusters", self.clusters.min_volume, self.clusters.volume_range)?;
        if cluster_upper > i64::MAX as u64 {
            return Err(ConfigError::Validation(
                "clusters.min_volume + clusters.volume_range must fit in a signed 64-bit delta".to_string(),
            ));
        }

        if self.clusters.important_threshold < 0 {
            return Err(ConfigError::Validation("clusters.important_threshold must be non-negative".to_string()));
        }

        if self.tape.capacity == 0 {
            return Err(ConfigError::Validation("tape.capacity must be greater than 0".to_string()));
        }

        if !self.tape.price_jitter.is_finite() || self.tape.price_jitter < 0.0 {
            return Err(ConfigError::Validation("tape.price_jitter must be non-negative".to_string()));
        }

        if self.tape.volume_range == 0 {
            return Err(ConfigError::Validation("tape.volume_range must be greater than 0".to_string()));
        }

        check_volume_range("tape", self.tape.min_volume, self.tape.volume_range)?;

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

/// Volumes are drawn from `[base, base + range)`; the upper bound must not overflow
fn check_volume_range(section: &str, base: u64, range: u64) -> Result<u64, ConfigError> {
    base.checked_add(range).ok_or_else(|| {
        ConfigError::Validation(format!(
            "{} volume range {} + {} overflows",
            section, base, range
        ))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.order_book.depth, 20);
        assert_eq!(config.clusters.half_width, 10);
        assert_eq!(config.tape.capacity, 8);
        assert_eq!(config.simulation.tick_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            "[simulation]\nseed = 7\ntick_interval_ms = 250\n\n[tape]\ncapacity = 4\n",
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.tick_interval_ms, 250);
        assert_eq!(config.simulation.spread, DEFAULT_SPREAD);
        assert_eq!(config.tape.capacity, 4);
        assert_eq!(config.order_book, OrderBookConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.simulation.spread = -0.0001;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.simulation.spread = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.tick_size = 0.00001;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tape.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unrepresentable_precision() {
        let mut config = Config::default();
        config.simulation.price_precision = MAX_PRICE_PRECISION;
        assert!(config.validate().is_ok());

        config.simulation.price_precision = 400;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_overflowing_volume_ranges() {
        let mut config = Config::default();
        config.order_book.base_volume = u64::MAX - 10;
        config.order_book.max_volume = 100;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = Config::default();
        config.clusters.min_volume = u64::MAX - 10;
        assert!(config.validate().is_err());

        // Fits in u64 but not in the signed delta
        let mut config = Config::default();
        config.clusters.min_volume = i64::MAX as u64;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tape.min_volume = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_initial_price_below_floor() {
        let mut config = Config::default();
        config.simulation.min_price = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.simulation.initial_price = 1.0;
        assert!(config.validate().is_ok());
    }
}
