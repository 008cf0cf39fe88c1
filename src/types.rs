// Common types used across the trainer

use serde::{Deserialize, Serialize};

/// Aggressor side of a synthetic trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// Whether the periodic driver is advancing the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationStatus {
    Active,
    Paused,
}

impl SimulationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SimulationStatus::Active)
    }

    pub fn toggled(&self) -> Self {
        match self {
            SimulationStatus::Active => SimulationStatus::Paused,
            SimulationStatus::Paused => SimulationStatus::Active,
        }
    }
}

impl From<bool> for SimulationStatus {
    fn from(active: bool) -> Self {
        if active {
            SimulationStatus::Active
        } else {
            SimulationStatus::Paused
        }
    }
}

// Reference behavior defaults
pub const DEFAULT_INITIAL_PRICE: f64 = 0.5818;
pub const DEFAULT_SPREAD: f64 = 0.0001;
pub const DEFAULT_TICK_SIZE: f64 = 0.0001;
pub const DEFAULT_PRICE_PRECISION: u32 = 4;
/// Beyond this `10^precision` loses integer resolution in an f64
pub const MAX_PRICE_PRECISION: u32 = 12;
pub const DEFAULT_MAX_PRICE_STEP: f64 = 0.00025;
pub const DEFAULT_MIN_PRICE: f64 = 0.0001;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1500;

pub const DEFAULT_BOOK_DEPTH: usize = 20;
pub const DEFAULT_BASE_VOLUME: u64 = 1000;
pub const DEFAULT_MAX_VOLUME: u64 = 9000;
pub const DEFAULT_HIGH_VOLUME_THRESHOLD: u64 = 5000;

pub const DEFAULT_CLUSTER_HALF_WIDTH: usize = 10;
pub const DEFAULT_CLUSTER_MIN_VOLUME: u64 = 50;
pub const DEFAULT_CLUSTER_VOLUME_RANGE: u64 = 500;
pub const DEFAULT_IMPORTANT_THRESHOLD: i64 = 300;

pub const DEFAULT_TAPE_CAPACITY: usize = 8;
pub const DEFAULT_TRADE_PRICE_JITTER: f64 = 0.0002;
pub const DEFAULT_TRADE_MIN_VOLUME: u64 = 20;
pub const DEFAULT_TRADE_VOLUME_RANGE: u64 = 150;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_display_precision() {
        assert_eq!(round_to(0.58184999, 4), 0.5818);
        assert_eq!(round_to(0.5818 + 0.0001, 4), 0.5819);
        assert_eq!(round_to(1.23456, 2), 1.23);
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(SimulationStatus::Active.toggled(), SimulationStatus::Paused);
        assert_eq!(SimulationStatus::Paused.toggled(), SimulationStatus::Active);
        assert!(SimulationStatus::from(true).is_active());
    }
}
