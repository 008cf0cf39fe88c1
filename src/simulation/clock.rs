// Simulation Clock
// Periodic driver that ticks the simulator while active and publishes snapshots

use crate::config::Config;
use crate::error::{TrainerError, TrainerResult};
use crate::simulation::engine::{MarketSimulator, SimulationState, SimulationStats};
use crate::types::SimulationStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The single running timer task, if any
struct Driver {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns one simulator and at most one periodic driver.
///
/// Must be created inside a Tokio runtime. Snapshots are published on a
/// `watch` channel after every tick and every toggle.
pub struct SimulationClock {
    simulator: Arc<Mutex<MarketSimulator>>,
    publisher: Arc<watch::Sender<SimulationState>>,
    driver: Option<Driver>,
    period: Duration,
}

impl SimulationClock {
    /// Validate the config, build the simulator and start ticking if it starts active
    pub fn start(config: Config) -> TrainerResult<Self> {
        let simulator = MarketSimulator::from_config(config)?;
        Ok(Self::with_simulator(simulator))
    }

    pub fn with_simulator(simulator: MarketSimulator) -> Self {
        let period = simulator.config().simulation.tick_interval();
        let (publisher, _) = watch::channel(simulator.state());
        let active = simulator.is_active();

        let mut clock = Self {
            simulator: Arc::new(Mutex::new(simulator)),
            publisher: Arc::new(publisher),
            driver: None,
            period,
        };

        if active {
            clock.spawn_driver();
        }

        clock
    }

    /// Receiver that always holds the latest published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SimulationState> {
        self.publisher.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SimulationState {
        self.publisher.borrow().clone()
    }

    pub async fn stats(&self) -> SimulationStats {
        self.simulator.lock().await.stats().clone()
    }

    pub fn status(&self) -> SimulationStatus {
        SimulationStatus::from(self.driver.is_some())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Flip Active/Paused. Pausing waits for the driver to finish, so no tick
    /// lands after this returns.
    pub async fn toggle(&mut self) -> TrainerResult<SimulationStatus> {
        let status = {
            let mut simulator = self.simulator.lock().await;
            simulator.toggle()
        };

        match status {
            SimulationStatus::Active => {
                if self.driver.is_none() {
                    self.spawn_driver();
                }
            }
            SimulationStatus::Paused => self.stop_driver().await?,
        }

        self.publish().await;
        Ok(status)
    }

    pub async fn pause(&mut self) -> TrainerResult<SimulationStatus> {
        if self.status().is_active() {
            self.toggle().await
        } else {
            Ok(SimulationStatus::Paused)
        }
    }

    pub async fn resume(&mut self) -> TrainerResult<SimulationStatus> {
        if self.status().is_active() {
            Ok(SimulationStatus::Active)
        } else {
            self.toggle().await
        }
    }

    /// Stop the driver and release the simulator. Returns final stats.
    pub async fn dispose(mut self) -> TrainerResult<SimulationStats> {
        self.stop_driver().await?;
        let stats = self.simulator.lock().await.stats().clone();
        info!("🛑 Simulation disposed after {} ticks", stats.ticks);
        Ok(stats)
    }

    async fn publish(&self) {
        let state = self.simulator.lock().await.state();
        self.publisher.send_replace(state);
    }

    fn spawn_driver(&mut self) {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let simulator = Arc::clone(&self.simulator);
        let publisher = Arc::clone(&self.publisher);
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let mut sim = simulator.lock().await;
                        // Pause may have been requested while waiting for the lock
                        if task_cancel.is_cancelled() {
                            break;
                        }
                        if sim.tick() {
                            publisher.send_replace(sim.state());
                        }
                    }
                }
            }

            debug!("⏹️  Simulation driver loop exited");
        });

        info!("▶️  Simulation driver started ({:?} interval)", period);
        self.driver = Some(Driver { cancel, handle });
    }

    async fn stop_driver(&mut self) -> TrainerResult<()> {
        let Some(driver) = self.driver.take() else {
            return Ok(());
        };

        driver.cancel.cancel();
        driver.handle.await.map_err(TrainerError::from)?;
        info!("⏸️  Simulation driver stopped");
        Ok(())
    }
}

impl Drop for SimulationClock {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            warn!("⚠️  SimulationClock dropped without dispose; cancelling driver");
            driver.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.simulation.seed = Some(42);
        config.simulation.tick_interval_ms = 100;
        config.logging.log_ticks = false;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_ticks_on_interval() {
        let clock = SimulationClock::start(fast_config()).unwrap();
        let mut rx = clock.subscribe();
        assert_eq!(rx.borrow().tick, 0);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().tick, 1);

        clock.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_flips_status() {
        let mut clock = SimulationClock::start(fast_config()).unwrap();
        assert_eq!(clock.status(), SimulationStatus::Active);

        assert_eq!(clock.toggle().await.unwrap(), SimulationStatus::Paused);
        assert!(!clock.snapshot().active);
        assert_eq!(clock.status(), SimulationStatus::Paused);

        assert_eq!(clock.toggle().await.unwrap(), SimulationStatus::Active);
        assert!(clock.snapshot().active);

        clock.dispose().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume_are_idempotent() {
        let mut clock = SimulationClock::start(fast_config()).unwrap();

        assert_eq!(clock.pause().await.unwrap(), SimulationStatus::Paused);
        assert_eq!(clock.pause().await.unwrap(), SimulationStatus::Paused);
        assert_eq!(clock.resume().await.unwrap(), SimulationStatus::Active);
        assert_eq!(clock.resume().await.unwrap(), SimulationStatus::Active);

        clock.dispose().await.unwrap();
    }
}
