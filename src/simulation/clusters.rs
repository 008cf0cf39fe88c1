// Footprint Clusters
// Symmetric band of synthetic buy/sell volume around the reference price

use crate::config::{ClusterConfig, SimulationConfig};
use crate::types::round_to;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCell {
    pub price: f64,
    pub buy_volume: u64,
    pub sell_volume: u64,
    /// buy_volume - sell_volume
    pub delta: i64,
    pub is_important: bool,
}

/// One instantaneous footprint band, ordered from the lowest price up
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub cells: Vec<ClusterCell>,
}

impl ClusterSnapshot {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClusterCell> {
        self.cells.iter()
    }

    /// Net delta across the whole band
    pub fn total_delta(&self) -> i64 {
        self.cells.iter().map(|cell| cell.delta).sum()
    }

    pub fn important_cells(&self) -> impl Iterator<Item = &ClusterCell> {
        self.cells.iter().filter(|cell| cell.is_important)
    }

    /// Cell whose price matches within half a price unit
    pub fn cell_at(&self, price: f64, precision: u32) -> Option<&ClusterCell> {
        let target = round_to(price, precision);
        self.cells.iter().find(|cell| cell.price == target)
    }

    pub fn validate(&self, expected_len: usize, important_threshold: i64) -> Result<(), String> {
        if self.cells.len() != expected_len {
            return Err(format!(
                "expected {} cluster cells, got {}",
                expected_len,
                self.cells.len()
            ));
        }

        for cell in &self.cells {
            if !cell.price.is_finite() {
                return Err(format!("non-finite cluster price {}", cell.price));
            }
            if cell.delta != cell.buy_volume as i64 - cell.sell_volume as i64 {
                return Err(format!("delta mismatch at {}", cell.price));
            }
            if cell.is_important != (cell.delta.abs() > important_threshold) {
                return Err(format!("importance flag mismatch at {}", cell.price));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ClusterGenerator {
    half_width: usize,
    tick_size: f64,
    precision: u32,
    min_volume: u64,
    volume_range: u64,
    important_threshold: i64,
}

impl ClusterGenerator {
    pub fn new(clusters: &ClusterConfig, sim: &SimulationConfig) -> Self {
        Self {
            half_width: clusters.half_width,
            tick_size: sim.tick_size,
            precision: sim.price_precision,
            min_volume: clusters.min_volume,
            volume_range: clusters.volume_range,
            important_threshold: clusters.important_threshold,
        }
    }

    /// Number of cells per snapshot (2K+1)
    pub fn band_len(&self) -> usize {
        self.half_width * 2 + 1
    }

    pub fn important_threshold(&self) -> i64 {
        self.important_threshold
    }

    /// Independent draws for every offset in `[-K, K]`
    pub fn generate<R: Rng>(&self, reference_price: f64, rng: &mut R) -> ClusterSnapshot {
        let k = self.half_width as i64;
        let cells = (-k..=k)
            .map(|offset| {
                let buy_volume = rng.gen_range(self.min_volume..self.min_volume + self.volume_range);
                let sell_volume = rng.gen_range(self.min_volume..self.min_volume + self.volume_range);
                let delta = buy_volume as i64 - sell_volume as i64;

                ClusterCell {
                    price: round_to(reference_price + offset as f64 * self.tick_size, self.precision),
                    buy_volume,
                    sell_volume,
                    delta,
                    is_important: delta.abs() > self.important_threshold,
                }
            })
            .collect();

        ClusterSnapshot { cells }
    }
}
