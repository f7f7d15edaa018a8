//! Shared helpers for the integration tests.
#![allow(dead_code)]

use lemonade_core::{config::SimConfig, rng::RandomSource, state::GameState};

/// A RandomSource that replays a fixed script of uniform draws.
/// Panics when the script runs out, unless a fallback value is set.
pub struct ScriptedRng {
    script: Vec<f64>,
    fallback: Option<f64>,
    pub draws: usize,
}

impl ScriptedRng {
    pub fn new(script: &[f64]) -> Self {
        Self { script: script.to_vec(), fallback: None, draws: 0 }
    }

    /// Every draw returns `value`.
    pub fn always(value: f64) -> Self {
        Self { script: Vec::new(), fallback: Some(value), draws: 0 }
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let value = match self.script.get(self.draws) {
            Some(v) => *v,
            None => self
                .fallback
                .unwrap_or_else(|| panic!("script exhausted after {} draws", self.draws)),
        };
        self.draws += 1;
        value
    }
}

/// Route the crate's log output through the test harness. Set RUST_LOG
/// to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config() -> SimConfig {
    init_logging();
    SimConfig::builtin()
}

pub fn fresh_state() -> GameState {
    GameState::new(&config())
}

/// A state with plenty of every supply and some cash to spare.
pub fn stocked_state() -> GameState {
    let mut state = fresh_state();
    state.cash = 100.0;
    state.inventory.lemons = 200;
    state.inventory.sugar = 200;
    state.inventory.cups = 200;
    state.inventory.ice = 200;
    state
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
