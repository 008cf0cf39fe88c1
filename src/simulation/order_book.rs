// Synthetic Order Book
// Two-sided ladder regenerated wholesale from the reference price every tick

use crate::config::{OrderBookConfig, SimulationConfig};
use crate::types::round_to;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Represents a single price level in the ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub volume: u64,
    pub is_high_volume: bool,
    /// Volume normalized against the configured maximum, 0-100
    pub intensity: f64,
}

/// Full ladder state. Index 0 is the best level on each side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Ascending away from mid
    pub asks: Vec<OrderBookLevel>,
    /// Descending away from mid
    pub bids: Vec<OrderBookLevel>,
}

impl OrderBookSnapshot {
    /// Get best ask (lowest ask price)
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Get best bid (highest bid price)
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Get bid-ask spread
    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some((ask.price + bid.price) / 2.0),
            _ => None,
        }
    }

    pub fn total_ask_volume(&self) -> u64 {
        self.asks.iter().map(|level| level.volume).sum()
    }

    pub fn total_bid_volume(&self) -> u64 {
        self.bids.iter().map(|level| level.volume).sum()
    }

    /// (bid - ask) / (bid + ask), in [-1, 1]. Positive means bid-heavy.
    pub fn imbalance(&self) -> f64 {
        let bid = self.total_bid_volume() as f64;
        let ask = self.total_ask_volume() as f64;
        let total = bid + ask;

        if total > 0.0 {
            (bid - ask) / total
        } else {
            0.0
        }
    }

    /// Levels flagged as high volume on either side
    pub fn high_volume_levels(&self) -> impl Iterator<Item = &OrderBookLevel> {
        self.asks
            .iter()
            .chain(self.bids.iter())
            .filter(|level| level.is_high_volume)
    }

    /// Get order book depth (number of price levels)
    pub fn depth(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }

    /// Validate ladder integrity
    pub fn validate(&self, expected_depth: usize) -> Result<(), String> {
        if self.asks.len() != expected_depth || self.bids.len() != expected_depth {
            return Err(format!(
                "expected {} levels per side, got {} asks / {} bids",
                expected_depth,
                self.asks.len(),
                self.bids.len()
            ));
        }

        // NaN compares false everywhere below, so reject it up front
        if let Some(level) = self.asks.iter().chain(self.bids.iter()).find(|l| !l.price.is_finite()) {
            return Err(format!("non-finite level price {}", level.price));
        }

        if let Some(pair) = self.asks.windows(2).find(|w| w[1].price <= w[0].price) {
            return Err(format!(
                "ask prices not strictly increasing: {} then {}",
                pair[0].price, pair[1].price
            ));
        }

        if let Some(pair) = self.bids.windows(2).find(|w| w[1].price >= w[0].price) {
            return Err(format!(
                "bid prices not strictly decreasing: {} then {}",
                pair[0].price, pair[1].price
            ));
        }

        // Check if best bid < best ask
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid.price >= ask.price {
                return Err(format!(
                    "crossed book: best bid ({}) >= best ask ({})",
                    bid.price, ask.price
                ));
            }
        }

        for level in self.asks.iter().chain(self.bids.iter()) {
            if !(0.0..=100.0).contains(&level.intensity) {
                return Err(format!("intensity {} out of range at {}", level.intensity, level.price));
            }
        }

        Ok(())
    }
}

/// Draws a fresh ladder conditioned only on price
#[derive(Debug, Clone)]
pub struct OrderBookGenerator {
    depth: usize,
    tick_size: f64,
    precision: u32,
    base_volume: u64,
    max_volume: u64,
    high_volume_threshold: u64,
}

impl OrderBookGenerator {
    pub fn new(book: &OrderBookConfig, sim: &SimulationConfig) -> Self {
        Self {
            depth: book.depth,
            tick_size: sim.tick_size,
            precision: sim.price_precision,
            base_volume: book.base_volume,
            max_volume: book.max_volume,
            high_volume_threshold: book.high_volume_threshold,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Generate both sides. Asks start at `reference + spread`, bids at `reference`.
    pub fn generate<R: Rng>(&self, reference_price: f64, spread: f64, rng: &mut R) -> OrderBookSnapshot {
        let mut asks = Vec::with_capacity(self.depth);
        let mut bids = Vec::with_capacity(self.depth);

        for i in 0..self.depth {
            let offset = i as f64 * self.tick_size;
            asks.push(self.level(reference_price + spread + offset, rng));
            bids.push(self.level(reference_price - offset, rng));
        }

        OrderBookSnapshot { asks, bids }
    }

    fn level<R: Rng>(&self, price: f64, rng: &mut R) -> OrderBookLevel {
        let volume = rng.gen_range(self.base_volume..self.base_volume + self.max_volume);

        OrderBookLevel {
            price: round_to(price, self.precision),
            volume,
            is_high_volume: volume > self.high_volume_threshold,
            intensity: (volume as f64 / self.max_volume as f64 * 100.0).min(100.0),
        }
    }
}
