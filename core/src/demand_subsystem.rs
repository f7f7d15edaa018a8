//! Demand subsystem: how many customers walk up to the stand today.
//!
//! potential = round(roll[min, max] × weather × (1 + reputation/100)
//!                   × stand_appeal × event_customers × (1 + marketing/100))
//!
//! The result seeds the customer subsystem's population. It is not a
//! count of served customers. Product quality is computed here too and
//! travels with the estimate.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::{triggered_event, SimEvent},
    quality::{is_premium, product_quality},
    rng::RandomSource,
    state::GameState,
    subsystem::SimSubsystem,
    types::{Day, EventKind},
};

/// Every factor of the demand formula except the base roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandInputs {
    pub weather_multiplier: f64,
    pub reputation: f64,
    pub stand_appeal: f64,
    pub event_multiplier: f64,
    pub marketing_boost: f64,
}

impl DemandInputs {
    pub fn from_state(state: &GameState, event: Option<EventKind>, config: &SimConfig) -> Self {
        Self {
            weather_multiplier: config
                .weather_profile(state.weather)
                .map_or(1.0, |w| w.customer_multiplier),
            reputation: state.reputation,
            stand_appeal: config.upgrades.stand_appeal(state.upgrades.stand),
            event_multiplier: event
                .and_then(|kind| config.event(kind))
                .map_or(1.0, |e| e.effect.customer_multiplier),
            marketing_boost: config.upgrades.marketing_boost(state.upgrades.marketing),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandEstimate {
    pub base_roll: u32,
    pub potential_customers: u32,
}

/// Draws the base roll and applies the multipliers.
pub fn estimate_demand(
    inputs: &DemandInputs,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> DemandEstimate {
    let demand = &config.demand;
    let base_roll = rng.range_u32(demand.base_customers_min, demand.base_customers_max);
    let potential_customers = potential_customers(base_roll, inputs, config);
    DemandEstimate { base_roll, potential_customers }
}

/// The deterministic half of the formula, given a base roll.
pub fn potential_customers(base_roll: u32, inputs: &DemandInputs, config: &SimConfig) -> u32 {
    let demand = &config.demand;
    let reputation_factor = 1.0 + inputs.reputation / demand.reputation_divisor;
    let marketing_factor = 1.0 + inputs.marketing_boost / demand.marketing_divisor;
    let expected = base_roll as f64
        * inputs.weather_multiplier
        * reputation_factor
        * inputs.stand_appeal
        * inputs.event_multiplier
        * marketing_factor;
    expected.round().max(0.0) as u32
}

pub struct DemandSubsystem {
    config: SimConfig,
}

impl DemandSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for DemandSubsystem {
    fn name(&self) -> &'static str { "demand" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let quality = product_quality(&state.recipe, state.upgrades.juicer, &self.config);
        let inputs = DemandInputs::from_state(state, triggered_event(events_in), &self.config);
        let estimate = estimate_demand(&inputs, &self.config, rng);

        log::debug!(
            "day={day} demand: roll={} potential={} quality={quality:.2}",
            estimate.base_roll,
            estimate.potential_customers
        );

        Ok(vec![SimEvent::DemandEstimated {
            day,
            quality,
            premium: is_premium(quality, &self.config),
            base_roll: estimate.base_roll,
            potential_customers: estimate.potential_customers,
        }])
    }
}
