//! Day resolver: closes the books on a day.
//!
//! Reads the day's events and:
//!   - computes the conversion rate and the reputation change
//!     (clamped to [0, min(100, stand cap)]),
//!   - melts leftover ice according to the fridge tier,
//!   - applies the event's flat cash delta (never below zero cash),
//!   - updates profit streak and lifetime stats,
//!   - appends the DaySummary to history and advances the day counter.

use crate::{
    config::SimConfig,
    customer_subsystem::{CustomerOutcome, WalkAwayReason},
    error::SimResult,
    event::{customers, demand_estimate, triggered_event, SimEvent},
    rng::RandomSource,
    state::{stars_for, DaySummary, GameState},
    subsystem::SimSubsystem,
    types::{round_cents, Day, EventKind},
};

/// Aggregate of one day's demand and customer events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTotals {
    pub event: Option<EventKind>,
    pub quality: f64,
    pub potential_customers: u32,
    pub served: u32,
    pub lost_too_expensive: u32,
    pub lost_out_of_stock: u32,
    pub served_warm: u32,
    pub ice_used: u32,
    pub revenue: f64,
}

impl DayTotals {
    pub fn from_events(events: &[SimEvent]) -> Self {
        let (quality, potential_customers) = demand_estimate(events).unwrap_or((0.0, 0));
        let mut totals = Self {
            event: triggered_event(events),
            quality,
            potential_customers,
            ..Self::default()
        };
        for record in customers(events) {
            match record.walk_away_reason() {
                Some(WalkAwayReason::TooExpensive) => totals.lost_too_expensive += 1,
                Some(WalkAwayReason::OutOfStock) => totals.lost_out_of_stock += 1,
                None => {
                    totals.served += 1;
                    if record.served_warm() {
                        totals.served_warm += 1;
                    }
                    if let CustomerOutcome::Purchased { paid, with_ice } = record.outcome {
                        totals.revenue += paid;
                        if with_ice {
                            totals.ice_used += 1;
                        }
                    }
                }
            }
        }
        totals.revenue = round_cents(totals.revenue);
        totals
    }

    pub fn lost(&self) -> u32 {
        self.lost_too_expensive + self.lost_out_of_stock
    }
}

/// served / potential, or 0 when nobody came.
pub fn conversion_rate(served: u32, potential: u32) -> f64 {
    if potential == 0 {
        0.0
    } else {
        served as f64 / potential as f64
    }
}

/// Reputation change earned by the day's service, before event effects.
pub fn service_reputation_change(
    conversion: f64,
    quality: f64,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> f64 {
    let r = &config.reputation;
    let mut change = if conversion >= 1.0 {
        rng.range_u32(r.perfect_gain_min, r.perfect_gain_max) as f64
    } else if conversion > r.strong_conversion {
        rng.range_u32(r.strong_gain_min, r.strong_gain_max) as f64
    } else if conversion < r.weak_conversion {
        -(rng.range_u32(r.weak_loss_min, r.weak_loss_max) as f64)
    } else {
        0.0
    };

    if quality > r.high_quality {
        change += r.quality_swing;
    } else if quality < r.low_quality {
        change -= r.quality_swing;
    }
    change
}

/// Ice cubes lost overnight: floor(ice × (1 − fridge preservation)).
pub fn ice_melt(ice: u32, fridge_tier: usize, config: &SimConfig) -> u32 {
    let save = config.upgrades.fridge_ice_save(fridge_tier).clamp(0.0, 1.0);
    // Nudge before flooring so 10 × 0.6 is 6, not 5.
    let melted = (ice as f64 * (1.0 - save) + 1e-9).floor() as u32;
    melted.min(ice)
}

/// Apply a flat event cash delta. Returns the amount actually applied,
/// which differs from `delta` only when a charge would overdraw the stand.
pub fn apply_event_cash(state: &mut GameState, delta: f64) -> f64 {
    let applied = if delta < 0.0 { delta.max(-state.cash.max(0.0)) } else { delta };
    state.cash = round_cents(state.cash + applied).max(0.0);
    applied
}

/// Close the day. Returns the resolver's events, ending with DayResolved.
pub fn resolve_day(
    day: Day,
    state: &mut GameState,
    totals: &DayTotals,
    config: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let effect = totals.event.and_then(|kind| config.event(kind)).map(|e| e.effect.clone());

    // ── Reputation ─────────────────────────────────────────────
    let conversion = conversion_rate(totals.served, totals.potential_customers);
    let mut raw_change = service_reputation_change(conversion, totals.quality, config, rng);
    if let Some(effect) = &effect {
        raw_change += effect.reputation_delta;
    }
    let prev = state.reputation;
    let cap = state.reputation_cap(config);
    state.reputation = (prev + raw_change).clamp(0.0, cap);
    state.stars = stars_for(state.reputation, config);
    let reputation_delta = state.reputation - prev;

    events.push(SimEvent::ReputationUpdated {
        day,
        score: state.reputation,
        delta: reputation_delta,
        stars: state.stars,
        conversion_rate: conversion,
    });

    if reputation_delta <= -5.0 {
        log::warn!("day={day} reputation drop: {prev:.1} -> {:.1} ({reputation_delta:+.1})", state.reputation);
    } else {
        log::debug!("day={day} reputation: {:.1} ({reputation_delta:+.1})", state.reputation);
    }

    if totals.potential_customers > 0 && totals.served == totals.potential_customers {
        state.perfect_days += 1;
    }

    // ── Ice melt ───────────────────────────────────────────────
    let ice_melted = ice_melt(state.inventory.ice, state.upgrades.fridge, config);
    state.inventory.ice -= ice_melted;
    let ice_loss = round_cents(ice_melted as f64 * config.costs.ice);
    if ice_melted > 0 {
        events.push(SimEvent::IceMelted {
            day,
            melted: ice_melted,
            remaining: state.inventory.ice,
            loss: ice_loss,
        });
    }

    // ── Money ──────────────────────────────────────────────────
    let event_cash = match &effect {
        Some(effect) if effect.cash_delta != 0.0 => apply_event_cash(state, effect.cash_delta),
        _ => {
            state.cash = round_cents(state.cash);
            0.0
        }
    };
    let cost_of_goods = round_cents(
        totals.served as f64 * config.costs.cup_cost() + totals.ice_used as f64 * config.costs.ice,
    );
    let net_profit = round_cents(totals.revenue + event_cash - cost_of_goods - ice_loss);

    if net_profit > 0.0 {
        state.profit_streak += 1;
    } else {
        state.profit_streak = 0;
    }
    state.total_revenue = round_cents(state.total_revenue + totals.revenue);
    state.best_day = state.best_day.max(totals.served);

    // ── History ────────────────────────────────────────────────
    let summary = DaySummary {
        day,
        weather: state.weather,
        event: totals.event,
        quality: totals.quality,
        potential_customers: totals.potential_customers,
        served: totals.served,
        lost: totals.lost(),
        lost_too_expensive: totals.lost_too_expensive,
        lost_out_of_stock: totals.lost_out_of_stock,
        served_warm: totals.served_warm,
        conversion_rate: conversion,
        revenue: totals.revenue,
        cost_of_goods,
        ice_melted,
        ice_loss,
        event_cash,
        net_profit,
        reputation_delta,
        ending_cash: state.cash,
    };
    state.history.push(summary.clone());
    state.day_number += 1;

    log::debug!(
        "day={day} resolved: served={}/{} revenue=${:.2} net=${net_profit:.2} cash=${:.2}",
        totals.served,
        totals.potential_customers,
        totals.revenue,
        state.cash
    );

    events.push(SimEvent::DayResolved { day, summary });
    events
}

pub struct ResolverSubsystem {
    config: SimConfig,
}

impl ResolverSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for ResolverSubsystem {
    fn name(&self) -> &'static str { "resolver" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        events_in: &[SimEvent],
        rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let totals = DayTotals::from_events(events_in);
        Ok(resolve_day(day, state, &totals, &self.config, rng))
    }
}
