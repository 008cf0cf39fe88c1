// Run command implementations
use order_flow_trainer::{
    Config, LadderRenderer, MarketSimulator, SimulationClock, SimulationState, TrainerError, TrainerResult,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Options for a live run
pub struct RunOptions {
    pub ticks: Option<u64>,
    pub seconds: Option<f64>,
    pub json: bool,
    pub depth: usize,
}

fn emit(state: &SimulationState, json: bool, renderer: &LadderRenderer) -> TrainerResult<()> {
    if json {
        println!("{}", serde_json::to_string(state)?);
    } else {
        println!("{}", renderer.render(state));
    }
    Ok(())
}

/// Convert `--seconds` into a deadline. Negative, NaN and overflowing values are rejected.
fn time_limit(seconds: Option<f64>) -> TrainerResult<Option<Duration>> {
    seconds
        .map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|e| {
                TrainerError::ConfigValidation(format!("invalid --seconds value {}: {}", secs, e))
            })
        })
        .transpose()
}

/// Drive the clock until the tick limit, the time limit, or Ctrl-C.
/// Each line on stdin toggles pause/resume.
pub async fn run_simulation(config: Config, options: RunOptions) -> TrainerResult<()> {
    let renderer = LadderRenderer::new(options.depth);
    let limit = time_limit(options.seconds)?;

    let mut clock = SimulationClock::start(config)?;
    let mut updates = clock.subscribe();

    info!("🚀 Simulation running every {:?} (press Enter to pause/resume, Ctrl-C to quit)", clock.period());
    emit(&updates.borrow_and_update().clone(), options.json, &renderer)?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let deadline = tokio::time::sleep(limit.unwrap_or(Duration::ZERO));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("⚠️  Snapshot channel closed");
                    break;
                }
                let state = updates.borrow_and_update().clone();
                emit(&state, options.json, &renderer)?;

                if options.ticks.is_some_and(|max| state.tick >= max) {
                    info!("✅ Reached {} ticks", state.tick);
                    break;
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line? {
                    Some(_) => {
                        let status = clock.toggle().await?;
                        info!("⏯️  {:?}", status);
                    }
                    None => stdin_open = false,
                }
            }
            _ = &mut deadline, if limit.is_some() => {
                info!("⏱️  Time limit reached");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    let stats = clock.dispose().await?;
    info!(
        "📈 {} ticks | {} trades | buy vol {} | sell vol {} | range {:.4}-{:.4}",
        stats.ticks,
        stats.trades_emitted,
        stats.buy_volume,
        stats.sell_volume,
        stats.price_low,
        stats.price_high
    );

    Ok(())
}

/// Step a simulator synchronously and print the resulting snapshot
pub fn print_snapshot(config: Config, ticks: u64, json: bool, depth: usize) -> TrainerResult<()> {
    let mut simulator = MarketSimulator::from_config(config)?;

    for _ in 0..ticks {
        simulator.step();
    }

    let state = simulator.state();
    if let Err(reason) = state.validate(simulator.config()) {
        warn!("⚠️  Snapshot failed invariant check: {}", reason);
    }

    emit(&state, json, &LadderRenderer::new(depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limit_accepts_valid_seconds() {
        assert_eq!(time_limit(None).unwrap(), None);
        assert_eq!(time_limit(Some(2.5)).unwrap(), Some(Duration::from_millis(2500)));
        assert_eq!(time_limit(Some(0.0)).unwrap(), Some(Duration::ZERO));
    }

    #[test]
    fn test_time_limit_rejects_bad_seconds() {
        for secs in [-1.0, f64::NAN, f64::INFINITY, 1e30] {
            let err = time_limit(Some(secs)).unwrap_err();
            assert!(matches!(err, TrainerError::ConfigValidation(_)), "{}", secs);
        }
    }
}
