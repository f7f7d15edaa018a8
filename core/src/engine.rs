//! The day engine: resolves one in-game day over a GameState.
//!
//! EXECUTION ORDER (fixed):
//!   1. Event subsystem        (special event selection, outage ice loss)
//!   2. Demand subsystem       (quality + potential customers)
//!   3. Customer subsystem     (per-customer sale / walk-away)
//!   4. Resolver subsystem     (reputation, ice melt, money, history)
//!   5. Achievement subsystem  (one-time unlocks)
//!   6. Weather subsystem      (tomorrow's weather and forecast)
//!
//! RULES:
//!   - Subsystems execute in registration order, once per day.
//!   - No subsystem calls another subsystem's functions directly.
//!   - All randomness flows through the RngBank.
//!   - The engine never touches storage; persisting the mutated
//!     state is the caller's job.

use crate::{
    achievement_subsystem::{AchievementSubsystem, UnlockedAchievement},
    config::SimConfig,
    customer_subsystem::{CustomerRecord, CustomerSubsystem},
    demand_subsystem::DemandSubsystem,
    error::{SimError, SimResult},
    event::{customers, day_summary, triggered_event, SimEvent},
    event_subsystem::EventSubsystem,
    resolver_subsystem::ResolverSubsystem,
    rng::{RngBank, SubsystemSlot},
    state::{DaySummary, GameState},
    subsystem::SimSubsystem,
    types::{Day, EventKind},
    weather_subsystem::WeatherSubsystem,
};
use serde::{Deserialize, Serialize};

/// Everything a caller gets back from one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayResult {
    pub day: Day,
    pub event: Option<EventKind>,
    /// One entry per customer, in arrival order.
    pub log: Vec<CustomerRecord>,
    pub summary: DaySummary,
    pub achievements: Vec<UnlockedAchievement>,
    /// The full ordered event stream of the day.
    pub events: Vec<SimEvent>,
}

impl DayResult {
    fn from_events(day: Day, events: Vec<SimEvent>) -> SimResult<Self> {
        let summary = day_summary(&events)
            .cloned()
            .ok_or(SimError::DayIncomplete { day })?;
        let achievements = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::AchievementUnlocked { id, name, description, reward, .. } => {
                    Some(UnlockedAchievement {
                        id: *id,
                        name: name.clone(),
                        description: description.clone(),
                        reward: *reward,
                    })
                }
                _ => None,
            })
            .collect();
        Ok(Self {
            day,
            event: triggered_event(&events),
            log: customers(&events).cloned().collect(),
            summary,
            achievements,
            events,
        })
    }
}

pub struct DayEngine {
    pub rng_bank: RngBank,
    subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    forced_event: Option<EventKind>,
}

impl DayEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng_bank: RngBank::new(seed),
            subsystems: Vec::new(),
            forced_event: None,
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(seed: u64, config: &SimConfig) -> Self {
        let mut engine = DayEngine::new(seed);

        // EXECUTION ORDER is fixed. Never reorder.
        engine.register(SubsystemSlot::Event, Box::new(EventSubsystem::new(config.clone())));
        engine.register(SubsystemSlot::Demand, Box::new(DemandSubsystem::new(config.clone())));
        engine.register(SubsystemSlot::Customer, Box::new(CustomerSubsystem::new(config.clone())));
        engine.register(SubsystemSlot::Resolver, Box::new(ResolverSubsystem::new(config.clone())));
        engine.register(
            SubsystemSlot::Achievement,
            Box::new(AchievementSubsystem::new(config.clone())),
        );
        engine.register(SubsystemSlot::Weather, Box::new(WeatherSubsystem::new()));
        engine
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    /// Make the next day's special event `kind` instead of rolling for one.
    /// Used by tests and tooling; consumed by the next run_day().
    pub fn force_next_event(&mut self, kind: EventKind) {
        self.forced_event = Some(kind);
    }

    /// Resolve the state's current day. This is the core simulation step.
    pub fn run_day(&mut self, state: &mut GameState) -> SimResult<DayResult> {
        let day = state.day_number;
        let mut day_events: Vec<SimEvent> = vec![SimEvent::DayStarted {
            day,
            weather: state.weather,
            price: state.price,
            cash: state.cash,
        }];
        if let Some(kind) = self.forced_event.take() {
            day_events.push(SimEvent::EventForced { day, kind });
        }

        // Each subsystem sees all events emitted so far this day.
        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_day(*slot, day);
            let new_events = subsystem.update(day, state, &day_events, &mut rng)?;
            log::trace!("day={day} {}: {} events", subsystem.name(), new_events.len());
            day_events.extend(new_events);
        }

        day_events.push(SimEvent::DayCompleted { day });
        DayResult::from_events(day, day_events)
    }
}
