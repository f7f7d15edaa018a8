//! Subsystem trait.
//!
//! RULE: Every stage of a day implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, once per day.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::GameState,
    types::Day,
};

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per day by the engine.
    ///
    /// - `day`:       the day being resolved
    /// - `state`:     the session's game state, exclusively borrowed
    /// - `events_in`: events emitted by earlier subsystems this day
    /// - `rng`:       this subsystem's deterministic stream for this day
    ///
    /// Returns a vec of new events to add to the day's event stream.
    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>>;
}
