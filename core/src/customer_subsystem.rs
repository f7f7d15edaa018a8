//! Customer subsystem: resolves each potential customer in arrival order.
//!
//! Per customer:
//!   1. Roll wants_ice (hot weather forces it; the roll is drawn anyway).
//!   2. No lemons, sugar or cups left → lost as out of stock. No price roll.
//!   3. Roll the customer's price ceiling from quality, event, weather
//!      and reputation. Premium quality raises it by 10%.
//!   4. price ≤ ceiling → sale. Supplies are consumed only here; ice only
//!      if the customer wants it and some is left. Otherwise lost as too
//!      expensive with nothing consumed.
//!
//! Every customer resolves to exactly one CustomerResolved event, in order.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::{demand_estimate, triggered_event, SimEvent},
    quality::is_premium,
    rng::RandomSource,
    state::GameState,
    subsystem::SimSubsystem,
    types::{Day, EventKind},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WalkAwayReason {
    TooExpensive,
    OutOfStock,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CustomerOutcome {
    Purchased { paid: f64, with_ice: bool },
    WalkedAway { reason: WalkAwayReason },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    /// Arrival position within the day, starting at 0.
    pub index: u32,
    pub wants_ice: bool,
    /// None when the customer never got as far as looking at the price.
    pub max_price: Option<f64>,
    pub outcome: CustomerOutcome,
}

impl CustomerRecord {
    pub fn purchased(&self) -> bool {
        matches!(self.outcome, CustomerOutcome::Purchased { .. })
    }

    /// Bought a cup but wanted ice that had run out.
    pub fn served_warm(&self) -> bool {
        matches!(self.outcome, CustomerOutcome::Purchased { with_ice: false, .. }) && self.wants_ice
    }

    pub fn walk_away_reason(&self) -> Option<WalkAwayReason> {
        match self.outcome {
            CustomerOutcome::WalkedAway { reason } => Some(reason),
            CustomerOutcome::Purchased { .. } => None,
        }
    }
}

/// Everything that shapes a customer's price ceiling on a given day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTolerance {
    pub quality: f64,
    pub premium: bool,
    pub event_multiplier: f64,
    pub weather_bonus: f64,
    pub reputation_bonus: f64,
    pub forces_ice: bool,
}

impl PriceTolerance {
    pub fn for_day(
        state: &GameState,
        quality: f64,
        event: Option<EventKind>,
        config: &SimConfig,
    ) -> Self {
        let weather = config.weather_profile(state.weather);
        let reputation_bonus = if state.reputation > config.customer.reputation_price_threshold {
            config.customer.reputation_price_bonus
        } else {
            0.0
        };
        Self {
            quality,
            premium: is_premium(quality, config),
            event_multiplier: event
                .and_then(|kind| config.event(kind))
                .map_or(1.0, |e| e.effect.price_multiplier),
            weather_bonus: weather.map_or(0.0, |w| w.price_bonus),
            reputation_bonus,
            forces_ice: weather.is_some_and(|w| w.forces_ice),
        }
    }

    /// Roll one customer's price ceiling.
    pub fn roll_max_price(&self, config: &SimConfig, rng: &mut dyn RandomSource) -> f64 {
        let c = &config.customer;
        let mut max_price = rng.uniform(c.max_price_min, c.max_price_max)
            * self.quality
            * self.event_multiplier
            + self.weather_bonus
            + self.reputation_bonus;
        if self.premium {
            max_price *= 1.0 + c.premium_tolerance_bonus;
        }
        max_price
    }
}

/// A customer buys iff the asking price does not exceed their ceiling.
pub fn will_purchase(price: f64, max_price: f64) -> bool {
    price <= max_price
}

/// Resolve a single customer against the shared inventory.
pub fn resolve_customer(
    index: u32,
    state: &mut GameState,
    tolerance: &PriceTolerance,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> CustomerRecord {
    let wants_ice = rng.chance(config.customer.ice_preference_chance) || tolerance.forces_ice;

    if !state.inventory.has_basics() {
        return CustomerRecord {
            index,
            wants_ice,
            max_price: None,
            outcome: CustomerOutcome::WalkedAway { reason: WalkAwayReason::OutOfStock },
        };
    }

    let max_price = tolerance.roll_max_price(config, rng);
    if !will_purchase(state.price, max_price) {
        return CustomerRecord {
            index,
            wants_ice,
            max_price: Some(max_price),
            outcome: CustomerOutcome::WalkedAway { reason: WalkAwayReason::TooExpensive },
        };
    }

    let with_ice = wants_ice && state.inventory.ice >= 1;
    state.inventory.consume_cup(with_ice);
    state.cash += state.price;
    state.total_sales += 1;

    CustomerRecord {
        index,
        wants_ice,
        max_price: Some(max_price),
        outcome: CustomerOutcome::Purchased { paid: state.price, with_ice },
    }
}

/// Resolve `potential` customers strictly in arrival order.
pub fn simulate_customers(
    potential: u32,
    state: &mut GameState,
    tolerance: &PriceTolerance,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Vec<CustomerRecord> {
    let mut records = Vec::with_capacity(potential as usize);
    for index in 0..potential {
        records.push(resolve_customer(index, state, tolerance, config, &mut *rng));
    }
    records
}

pub struct CustomerSubsystem {
    config: SimConfig,
}

impl CustomerSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for CustomerSubsystem {
    fn name(&self) -> &'static str { "customer" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let Some((quality, potential)) = demand_estimate(events_in) else {
            log::warn!("day={day} customer: no demand estimate, nobody shows up");
            return Ok(vec![]);
        };

        let tolerance =
            PriceTolerance::for_day(state, quality, triggered_event(events_in), &self.config);
        let records = simulate_customers(potential, state, &tolerance, &self.config, rng);

        let served = records.iter().filter(|r| r.purchased()).count();
        log::debug!(
            "day={day} customer: served={served} lost={} stock=({}, {}, {}, {})",
            records.len() - served,
            state.inventory.lemons,
            state.inventory.sugar,
            state.inventory.cups,
            state.inventory.ice
        );

        Ok(records
            .into_iter()
            .map(|customer| SimEvent::CustomerResolved { day, customer })
            .collect())
    }
}
