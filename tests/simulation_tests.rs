// Integration tests for the synthetic market engine

mod common;

use common::{create_test_config, seeded_simulator};
use order_flow_trainer::simulation::{OrderBookGenerator, PriceWalker};
use order_flow_trainer::{MarketSimulator, SimulationStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_snapshot_sizes_hold_every_tick() {
    let mut sim = seeded_simulator(1);

    for _ in 0..200 {
        sim.tick();
        let state = sim.state();
        assert_eq!(state.order_book.asks.len(), 20);
        assert_eq!(state.order_book.bids.len(), 20);
        assert_eq!(state.clusters.len(), 21);
        assert!(state.trades.len() <= 8);
    }
}

#[test]
fn test_level_intensity_and_high_volume_flags() {
    let mut sim = seeded_simulator(2);

    for _ in 0..100 {
        sim.tick();
        let book = sim.order_book();
        for level in book.asks.iter().chain(book.bids.iter()) {
            assert!(level.intensity >= 0.0 && level.intensity <= 100.0);
            assert_eq!(level.is_high_volume, level.volume > 5000);
        }
    }
}

#[test]
fn test_book_is_monotonic_and_never_crosses() {
    let mut sim = seeded_simulator(3);

    for _ in 0..200 {
        sim.tick();
        let book = sim.order_book();

        assert!(book.asks.windows(2).all(|w| w[1].price > w[0].price));
        assert!(book.bids.windows(2).all(|w| w[1].price < w[0].price));
        assert!(book.asks[0].price > book.bids[0].price);
    }
}

#[test]
fn test_cluster_delta_and_importance() {
    let mut sim = seeded_simulator(4);

    for _ in 0..100 {
        sim.tick();
        for cell in sim.clusters().iter() {
            assert_eq!(cell.delta, cell.buy_volume as i64 - cell.sell_volume as i64);
            assert_eq!(cell.is_important, cell.delta.abs() > 300);
        }
    }
}

#[test]
fn test_trade_window_keeps_latest_eight() {
    let mut sim = seeded_simulator(5);
    let mut emitted = Vec::new();

    for _ in 0..25 {
        sim.tick();
        emitted.push(sim.trades().latest().unwrap().sequence);

        let state = sim.state();
        assert!(state.trades.windows(2).all(|w| w[0].sequence > w[1].sequence));
    }

    let state = sim.state();
    assert_eq!(state.trades.len(), 8);
    // Oldest survivor is the 8th most recent emission
    assert_eq!(state.trades[7].sequence, emitted[emitted.len() - 8]);
}

#[test]
fn test_reference_scenario_best_prices() {
    let config = create_test_config();
    let generator = OrderBookGenerator::new(&config.order_book, &config.simulation);
    let mut rng = StdRng::seed_from_u64(6);

    let book = generator.generate(0.5818, 0.0001, &mut rng);

    assert_eq!(book.asks[0].price, 0.5819);
    assert_eq!(book.bids[0].price, 0.5818);
}

#[test]
fn test_ten_ticks_leave_eight_trades() {
    let mut sim = seeded_simulator(7);
    assert_eq!(sim.status(), SimulationStatus::Active);

    for _ in 0..10 {
        assert!(sim.tick());
    }

    let state = sim.state();
    assert_eq!(state.trades.len(), 8);
    let sequences: Vec<u64> = state.trades.iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, vec![10, 9, 8, 7, 6, 5, 4, 3]);
}

#[test]
fn test_reference_price_stays_in_envelope() {
    let mut sim = seeded_simulator(8);
    let start = sim.reference_price();
    let walker = PriceWalker::from_config(&sim.config().simulation);
    // Per-tick bound: max step plus half a price unit of rounding
    let per_tick = walker.max_step() + 0.00005;

    for n in 1..=2_000u64 {
        sim.tick();
        let drift = (sim.reference_price() - start).abs();
        assert!(drift <= n as f64 * per_tick + 1e-9, "tick {}: drift {}", n, drift);
        assert!(sim.reference_price() > 0.0);
    }
}

#[test]
fn test_every_published_state_validates() {
    let mut sim = seeded_simulator(9);

    for _ in 0..50 {
        sim.tick();
        assert!(sim.state().validate(sim.config()).is_ok());
    }
}

#[test]
fn test_same_seed_same_market() {
    let mut a = MarketSimulator::with_seed(create_test_config(), 123);
    let mut b = MarketSimulator::with_seed(create_test_config(), 123);

    for _ in 0..20 {
        a.tick();
        b.tick();
    }

    let (sa, sb) = (a.state(), b.state());
    assert_eq!(sa.reference_price, sb.reference_price);
    assert_eq!(sa.order_book, sb.order_book);
    assert_eq!(sa.clusters, sb.clusters);

    let prices_a: Vec<f64> = sa.trades.iter().map(|t| t.price).collect();
    let prices_b: Vec<f64> = sb.trades.iter().map(|t| t.price).collect();
    assert_eq!(prices_a, prices_b);
}

#[test]
fn test_paused_simulator_freezes_snapshot() {
    let mut sim = seeded_simulator(10);
    sim.tick();
    sim.toggle();

    let frozen = sim.state();
    for _ in 0..5 {
        assert!(!sim.tick());
    }
    assert_eq!(sim.state(), frozen);

    sim.toggle();
    assert!(sim.tick());
    assert_ne!(sim.state().tick, frozen.tick);
}
