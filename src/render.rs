// Text ladder renderer used by the CLI
// Reads snapshots only; never feeds anything back into the simulator

use crate::simulation::SimulationState;
use crate::types::Side;
use chrono::{TimeZone, Utc};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct LadderRenderer {
    /// Levels shown per side (the book may hold more)
    pub depth: usize,
    pub show_clusters: bool,
    pub show_tape: bool,
}

impl Default for LadderRenderer {
    fn default() -> Self {
        Self {
            depth: 10,
            show_clusters: true,
            show_tape: true,
        }
    }
}

impl LadderRenderer {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn render(&self, state: &SimulationState) -> String {
        let mut out = String::new();
        let status = if state.active { "LIVE" } else { "PAUSED" };

        let _ = writeln!(
            out,
            "── tick {} │ {} │ ref {:.4} │ spread {:.4} ──",
            state.tick, status, state.reference_price, state.spread
        );

        self.render_book(state, &mut out);

        if self.show_clusters {
            self.render_clusters(state, &mut out);
        }

        if self.show_tape {
            self.render_tape(state, &mut out);
        }

        out
    }

    fn render_book(&self, state: &SimulationState, out: &mut String) {
        let book = &state.order_book;
        let shown = self.depth.min(book.asks.len());

        // Farthest ask at the top so the ladder reads downwards through the spread
        for level in book.asks.iter().take(shown).rev() {
            let _ = writeln!(
                out,
                "  ASK {:.4} {:>6} {}{}",
                level.price,
                level.volume,
                bar(level.intensity),
                if level.is_high_volume { " *" } else { "" }
            );
        }

        match (book.best_ask(), book.best_bid()) {
            (Some(ask), Some(bid)) => {
                let _ = writeln!(
                    out,
                    "  ---- {:.4} / {:.4}  imbalance {:+.2}",
                    bid.price,
                    ask.price,
                    book.imbalance()
                );
            }
            _ => {
                let _ = writeln!(out, "  ---- empty book");
            }
        }

        for level in book.bids.iter().take(self.depth) {
            let _ = writeln!(
                out,
                "  BID {:.4} {:>6} {}{}",
                level.price,
                level.volume,
                bar(level.intensity),
                if level.is_high_volume { " *" } else { "" }
            );
        }
    }

    fn render_clusters(&self, state: &SimulationState, out: &mut String) {
        let _ = writeln!(out, "  footprint (net delta {:+})", state.clusters.total_delta());

        for cell in state.clusters.iter().rev() {
            let _ = writeln!(
                out,
                "    {:.4} {:>4} x {:<4} {:+5}{}",
                cell.price,
                cell.sell_volume,
                cell.buy_volume,
                cell.delta,
                if cell.is_important { " !" } else { "" }
            );
        }
    }

    fn render_tape(&self, state: &SimulationState, out: &mut String) {
        let _ = writeln!(out, "  tape");

        if state.trades.is_empty() {
            let _ = writeln!(out, "    (no trades yet)");
            return;
        }

        for trade in &state.trades {
            let time = Utc
                .timestamp_millis_opt(trade.timestamp)
                .single()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "--:--:--".to_string());
            let arrow = match trade.side {
                Side::Buy => "▲",
                Side::Sell => "▼",
            };

            let _ = writeln!(
                out,
                "    {} {} {:.4} {:>4}",
                time, arrow, trade.price, trade.volume
            );
        }
    }
}

fn bar(intensity: f64) -> String {
    let filled = ((intensity / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::simulation::MarketSimulator;

    #[test]
    fn test_render_contains_all_sections() {
        let mut config = Config::default();
        config.logging.log_ticks = false;
        let mut sim = MarketSimulator::with_seed(config, 9);
        sim.tick();

        let text = LadderRenderer::new(5).render(&sim.state());

        assert!(text.contains("tick 1"));
        assert!(text.contains("LIVE"));
        assert_eq!(text.matches("ASK ").count(), 5);
        assert_eq!(text.matches("BID ").count(), 5);
        assert!(text.contains("footprint"));
        assert_eq!(text.matches('▲').count() + text.matches('▼').count(), 1);
    }

    #[test]
    fn test_render_without_trades() {
        let sim = MarketSimulator::with_seed(Config::default(), 10);
        let renderer = LadderRenderer {
            depth: 3,
            show_clusters: false,
            show_tape: true,
        };

        let text = renderer.render(&sim.state());
        assert!(text.contains("(no trades yet)"));
        assert!(!text.contains("footprint"));
    }

    #[test]
    fn test_bar_is_capped() {
        assert_eq!(bar(100.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.0), "");
    }
}
