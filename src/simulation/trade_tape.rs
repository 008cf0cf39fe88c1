// Trade Tape
// One synthetic trade per tick, kept in a bounded newest-first window

use crate::config::{SimulationConfig, TapeConfig};
use crate::types::{round_to, Side};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    /// Emission order, strictly increasing per emitter
    pub sequence: u64,
    pub price: f64,
    pub volume: u64,
    pub side: Side,
    /// Wall-clock milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Synthesizes trades and is the sole writer of the history window
#[derive(Debug, Clone)]
pub struct TradeEmitter {
    history: VecDeque<Trade>,
    capacity: usize,
    next_sequence: u64,
    price_jitter: f64,
    precision: u32,
    min_volume: u64,
    volume_range: u64,
}

impl TradeEmitter {
    pub fn new(tape: &TapeConfig, sim: &SimulationConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(tape.capacity + 1),
            capacity: tape.capacity,
            next_sequence: 1,
            price_jitter: tape.price_jitter,
            precision: sim.price_precision,
            min_volume: tape.min_volume,
            volume_range: tape.volume_range,
        }
    }

    /// Emit one trade near `reference_price`, prepend it and drop the oldest
    /// entries beyond capacity
    pub fn emit<R: Rng>(&mut self, reference_price: f64, rng: &mut R) -> &Trade {
        let delta = rng.gen_range(-self.price_jitter..=self.price_jitter);
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };

        let trade = Trade {
            id: Uuid::new_v4().to_string(),
            sequence: self.next_sequence,
            price: round_to(reference_price + delta, self.precision),
            volume: rng.gen_range(self.min_volume..self.min_volume + self.volume_range),
            side,
            timestamp: Utc::now().timestamp_millis(),
        };
        self.next_sequence += 1;

        self.history.push_front(trade);
        self.history.truncate(self.capacity);

        &self.history[0]
    }

    /// Newest first
    pub fn history(&self) -> &VecDeque<Trade> {
        &self.history
    }

    pub fn latest(&self) -> Option<&Trade> {
        self.history.front()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total trades ever emitted, including those already dropped
    pub fn emitted(&self) -> u64 {
        self.next_sequence - 1
    }

    pub fn buy_volume(&self) -> u64 {
        self.side_volume(Side::Buy)
    }

    pub fn sell_volume(&self) -> u64 {
        self.side_volume(Side::Sell)
    }

    fn side_volume(&self, side: Side) -> u64 {
        self.history
            .iter()
            .filter(|trade| trade.side == side)
            .map(|trade| trade.volume)
            .sum()
    }
}
