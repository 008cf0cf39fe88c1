// Simulation Engine Module
// Synthetic market: price walk, order book ladder, footprint clusters, trade tape

pub mod price_walker;
pub mod order_book;
pub mod clusters;
pub mod trade_tape;
pub mod engine;
pub mod clock;

pub use price_walker::{PriceWalker, WalkStep};
pub use order_book::{OrderBookGenerator, OrderBookLevel, OrderBookSnapshot};
pub use clusters::{ClusterCell, ClusterGenerator, ClusterSnapshot};
pub use trade_tape::{Trade, TradeEmitter};
pub use engine::{MarketSimulator, SimulationState, SimulationStats};
pub use clock::SimulationClock;
