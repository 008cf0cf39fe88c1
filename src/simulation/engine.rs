// Market Simulator
// Owns the synthetic market and advances it one tick at a time

use crate::config::{Config, ConfigError};
use crate::simulation::clusters::{ClusterGenerator, ClusterSnapshot};
use crate::simulation::order_book::{OrderBookGenerator, OrderBookSnapshot};
use crate::simulation::price_walker::PriceWalker;
use crate::simulation::trade_tape::{Trade, TradeEmitter};
use crate::types::{round_to, Side, SimulationStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Read interface handed to renderers once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Ticks applied since creation
    pub tick: u64,
    pub reference_price: f64,
    pub spread: f64,
    pub order_book: OrderBookSnapshot,
    pub clusters: ClusterSnapshot,
    /// Newest first
    pub trades: Vec<Trade>,
    pub active: bool,
}

impl SimulationState {
    pub fn status(&self) -> SimulationStatus {
        SimulationStatus::from(self.active)
    }

    /// Check the structural invariants of a published snapshot
    pub fn validate(&self, config: &Config) -> Result<(), String> {
        if !self.reference_price.is_finite() || self.reference_price <= 0.0 {
            return Err(format!("reference price {} is not positive", self.reference_price));
        }

        self.order_book.validate(config.order_book.depth)?;
        self.clusters.validate(
            config.clusters.half_width * 2 + 1,
            config.clusters.important_threshold,
        )?;

        if self.trades.len() > config.tape.capacity {
            return Err(format!(
                "trade history holds {} entries, capacity is {}",
                self.trades.len(),
                config.tape.capacity
            ));
        }

        if self.trades.windows(2).any(|w| w[0].sequence <= w[1].sequence) {
            return Err("trade history is not newest-first".to_string());
        }

        Ok(())
    }
}

/// Statistics tracked by the simulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks: u64,
    pub trades_emitted: u64,
    pub buy_volume: u64,
    pub sell_volume: u64,
    pub price_high: f64,
    pub price_low: f64,
    pub floor_clamps: u64,
}

/// Explicitly owned engine: create, tick, toggle. Dropping it is teardown.
pub struct MarketSimulator<R: Rng = StdRng> {
    config: Config,
    rng: R,
    walker: PriceWalker,
    book_generator: OrderBookGenerator,
    cluster_generator: ClusterGenerator,
    emitter: TradeEmitter,
    reference_price: f64,
    spread: f64,
    order_book: OrderBookSnapshot,
    clusters: ClusterSnapshot,
    status: SimulationStatus,
    stats: SimulationStats,
}

impl MarketSimulator<StdRng> {
    /// Validate the config and seed from `simulation.seed`, or from entropy
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self::new(config, rng))
    }

    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MarketSimulator<R> {
    /// Build the engine and draw the initial book and clusters.
    /// The trade tape starts empty.
    ///
    /// `config` must pass [`Config::validate`]; [`from_config`](MarketSimulator::from_config)
    /// enforces that.
    pub fn new(config: Config, mut rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "simulator built from an invalid config");
        let sim = &config.simulation;
        let walker = PriceWalker::from_config(sim);
        let book_generator = OrderBookGenerator::new(&config.order_book, sim);
        let cluster_generator = ClusterGenerator::new(&config.clusters, sim);
        let emitter = TradeEmitter::new(&config.tape, sim);

        let reference_price = round_to(sim.initial_price, sim.price_precision);
        let spread = sim.spread;
        let order_book = book_generator.generate(reference_price, spread, &mut rng);
        let clusters = cluster_generator.generate(reference_price, &mut rng);
        let status = SimulationStatus::from(sim.start_active);

        info!(
            "📖 Simulator created: price {:.4}, spread {:.4}, {} levels/side, {} cluster cells, status {:?}",
            reference_price,
            spread,
            book_generator.depth(),
            cluster_generator.band_len(),
            status
        );

        Self {
            stats: SimulationStats {
                price_high: reference_price,
                price_low: reference_price,
                ..Default::default()
            },
            config,
            rng,
            walker,
            book_generator,
            cluster_generator,
            emitter,
            reference_price,
            spread,
            order_book,
            clusters,
            status,
        }
    }

    /// Advance one tick if active. Returns false (and changes nothing) when paused.
    pub fn tick(&mut self) -> bool {
        if !self.status.is_active() {
            return false;
        }
        self.step();
        true
    }

    /// Advance one tick regardless of status
    pub fn step(&mut self) {
        let walk = self.walker.step(self.reference_price, &mut self.rng);
        if walk.clamped {
            self.stats.floor_clamps += 1;
            warn!("⚠️  Reference price clamped to floor {:.4}", walk.price);
        }
        self.reference_price = walk.price;

        self.order_book = self
            .book_generator
            .generate(self.reference_price, self.spread, &mut self.rng);
        self.clusters = self.cluster_generator.generate(self.reference_price, &mut self.rng);

        let trade = self.emitter.emit(self.reference_price, &mut self.rng);
        match trade.side {
            Side::Buy => self.stats.buy_volume += trade.volume,
            Side::Sell => self.stats.sell_volume += trade.volume,
        }

        if self.config.logging.log_ticks {
            debug!(
                "📊 Tick {}: price {:.4} | BBO {:.4}/{:.4} | {} {} @ {:.4}",
                self.stats.ticks + 1,
                self.reference_price,
                self.order_book.best_bid().map(|b| b.price).unwrap_or(0.0),
                self.order_book.best_ask().map(|a| a.price).unwrap_or(0.0),
                trade.side.as_str(),
                trade.volume,
                trade.price
            );
        }

        self.stats.ticks += 1;
        self.stats.trades_emitted = self.emitter.emitted();
        self.stats.price_high = self.stats.price_high.max(self.reference_price);
        self.stats.price_low = self.stats.price_low.min(self.reference_price);

        debug_assert!(
            self.state().validate(&self.config).is_ok(),
            "snapshot invariants broken after tick {}",
            self.stats.ticks
        );
    }

    /// Flip Active/Paused and return the new status
    pub fn toggle(&mut self) -> SimulationStatus {
        self.status = self.status.toggled();
        info!("⏯️  Simulation {:?}", self.status);
        self.status
    }

    pub fn set_status(&mut self, status: SimulationStatus) {
        self.status = status;
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Snapshot of everything a renderer needs
    pub fn state(&self) -> SimulationState {
        SimulationState {
            tick: self.stats.ticks,
            reference_price: self.reference_price,
            spread: self.spread,
            order_book: self.order_book.clone(),
            clusters: self.clusters.clone(),
            trades: self.emitter.history().iter().cloned().collect(),
            active: self.status.is_active(),
        }
    }

    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    pub fn order_book(&self) -> &OrderBookSnapshot {
        &self.order_book
    }

    pub fn clusters(&self) -> &ClusterSnapshot {
        &self.clusters
    }

    pub fn trades(&self) -> &TradeEmitter {
        &self.emitter
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
