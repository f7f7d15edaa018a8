//! Special event subsystem: picks at most one event for the day.
//!
//! Selection policy: one independent Bernoulli trial per catalog entry,
//! in catalog (priority) order; the first success wins and no further
//! trials are drawn. No success means no event.
//!
//! Immediate effects applied here: Power Outage loses all ice unless a
//! fridge is installed. Every other effect is read from the event by
//! later subsystems.

use crate::{
    config::{EventConfig, SimConfig},
    error::SimResult,
    event::{forced_event, SimEvent},
    rng::RandomSource,
    state::GameState,
    subsystem::SimSubsystem,
    types::Day,
};

/// Run the priority-ordered trials. Pure apart from the draws.
pub fn select_event<'a>(
    catalog: &'a [EventConfig],
    rng: &mut dyn RandomSource,
) -> Option<&'a EventConfig> {
    catalog.iter().find(|event| rng.chance(event.chance))
}

pub struct EventSubsystem {
    config: SimConfig,
}

impl EventSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for EventSubsystem {
    fn name(&self) -> &'static str { "event" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let chosen = match forced_event(events_in) {
            Some(kind) => self.config.event(kind),
            None => select_event(&self.config.events, rng),
        };

        let Some(event) = chosen else {
            log::debug!("day={day} event: none");
            return Ok(vec![]);
        };

        let mut ice_lost = 0;
        let mut fridge_saved_ice = false;
        if event.effect.ice_loss {
            if state.upgrades.fridge > 0 {
                fridge_saved_ice = true;
            } else {
                ice_lost = state.inventory.ice;
                state.inventory.ice = 0;
            }
        }

        log::debug!(
            "day={day} event: {} ice_lost={ice_lost} fridge_saved={fridge_saved_ice}",
            event.kind.name()
        );

        let message = if fridge_saved_ice {
            "Your fridge saved the day!".to_string()
        } else {
            event.message.clone()
        };

        Ok(vec![SimEvent::SpecialEventTriggered {
            day,
            kind: event.kind,
            message,
            ice_lost,
            fridge_saved_ice,
        }])
    }
}
