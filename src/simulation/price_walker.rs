// Price Walker
// Bounded random walk for the synthetic reference price

use crate::config::SimulationConfig;
use crate::types::round_to;
use rand::Rng;

/// Outcome of one walk step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep {
    pub price: f64,
    /// True if the raw step fell below the floor and was clamped
    pub clamped: bool,
}

/// Advances the reference price by a uniform delta in `[-max_step, max_step]`
#[derive(Debug, Clone)]
pub struct PriceWalker {
    max_step: f64,
    precision: u32,
    floor: f64,
}

impl PriceWalker {
    pub fn new(max_step: f64, precision: u32, floor: f64) -> Self {
        Self {
            max_step,
            precision,
            floor: round_to(floor, precision),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.max_price_step, config.price_precision, config.min_price)
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Compute the next reference price. Pure apart from the random draw.
    pub fn advance<R: Rng>(&self, current: f64, rng: &mut R) -> f64 {
        self.step(current, rng).price
    }

    /// Like [`advance`](Self::advance) but reports whether the floor kicked in
    pub fn step<R: Rng>(&self, current: f64, rng: &mut R) -> WalkStep {
        let delta = rng.gen_range(-self.max_step..=self.max_step);
        let next = round_to(current + delta, self.precision);

        if next < self.floor {
            WalkStep { price: self.floor, clamped: true }
        } else {
            WalkStep { price: next, clamped: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_step_is_bounded_and_rounded() {
        let walker = PriceWalker::new(0.00025, 4, 0.0001);
        let mut rng = StdRng::seed_from_u64(42);
        let mut price = 0.5818;

        for _ in 0..1_000 {
            let next = walker.advance(price, &mut rng);
            // 0.00025 rounds to at most 0.0003 at 4dp
            assert!((next - price).abs() <= 0.0003 + 1e-12);
            assert_eq!(next, round_to(next, 4));
            price = next;
        }
    }

    #[test]
    fn test_zero_step_is_identity() {
        let walker = PriceWalker::new(0.0, 4, 0.0001);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(walker.advance(0.5818, &mut rng), 0.5818);
    }

    #[test]
    fn test_floor_keeps_price_positive() {
        let walker = PriceWalker::new(0.01, 4, 0.0001);
        let mut rng = StdRng::seed_from_u64(7);
        let mut price = 0.0001;
        let mut clamps = 0;

        for _ in 0..200 {
            let step = walker.step(price, &mut rng);
            assert!(step.price >= 0.0001);
            if step.clamped {
                clamps += 1;
            }
            price = step.price;
        }

        assert!(clamps > 0);
    }

    #[test]
    fn test_seeded_walk_is_deterministic() {
        let walker = PriceWalker::new(0.00025, 4, 0.0001);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        let walk = |rng: &mut StdRng| {
            let mut price = 1.0;
            (0..20)
                .map(|_| {
                    price = walker.advance(price, rng);
                    price
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(walk(&mut a), walk(&mut b));
    }
}
