//! The event bus: all inter-subsystem communication.
//!
//! RULE: Subsystems communicate ONLY through events.
//! A subsystem may never call another subsystem's functions directly.
//! A subsystem reads what earlier subsystems decided from `events_in`.

use crate::{
    command::PlayerCommand,
    customer_subsystem::CustomerRecord,
    error::SimResult,
    state::DaySummary,
    types::{AchievementId, Day, EventKind, SessionId, Weather},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during a session.
/// Variants are never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    DayStarted {
        day: Day,
        weather: Weather,
        price: f64,
        cash: f64,
    },
    DayCompleted {
        day: Day,
    },
    EventForced {
        day: Day,
        kind: EventKind,
    },

    // ── Special events ─────────────────────────────
    SpecialEventTriggered {
        day: Day,
        kind: EventKind,
        message: String,
        ice_lost: u32,
        fridge_saved_ice: bool,
    },

    // ── Demand ─────────────────────────────────────
    DemandEstimated {
        day: Day,
        quality: f64,
        premium: bool,
        base_roll: u32,
        potential_customers: u32,
    },

    // ── Customers (one per customer, arrival order) ─
    CustomerResolved {
        day: Day,
        customer: CustomerRecord,
    },

    // ── Resolution ─────────────────────────────────
    ReputationUpdated {
        day: Day,
        score: f64,
        delta: f64,
        stars: f64,
        conversion_rate: f64,
    },
    IceMelted {
        day: Day,
        melted: u32,
        remaining: u32,
        loss: f64,
    },
    DayResolved {
        day: Day,
        summary: DaySummary,
    },
    AchievementUnlocked {
        day: Day,
        id: AchievementId,
        name: String,
        description: String,
        reward: f64,
    },
    WeatherForecast {
        day: Day,
        weather: Weather,
        next_weather: Weather,
    },

    // ── Player command events ──────────────────────
    CommandApplied {
        day: Day,
        command: PlayerCommand,
    },
    CommandRejected {
        day: Day,
        command: PlayerCommand,
        reason: String,
    },
}

impl SimEvent {
    /// Stable string name of the variant.
    /// Used for the event_type column in event_log.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DayStarted { .. }            => "day_started",
            Self::DayCompleted { .. }          => "day_completed",
            Self::EventForced { .. }           => "event_forced",
            Self::SpecialEventTriggered { .. } => "special_event_triggered",
            Self::DemandEstimated { .. }       => "demand_estimated",
            Self::CustomerResolved { .. }      => "customer_resolved",
            Self::ReputationUpdated { .. }     => "reputation_updated",
            Self::IceMelted { .. }             => "ice_melted",
            Self::DayResolved { .. }           => "day_resolved",
            Self::AchievementUnlocked { .. }   => "achievement_unlocked",
            Self::WeatherForecast { .. }       => "weather_forecast",
            Self::CommandApplied { .. }        => "command_applied",
            Self::CommandRejected { .. }       => "command_rejected",
        }
    }

    /// Name of the component that emits this variant.
    pub fn source(&self) -> &'static str {
        match self {
            Self::DayStarted { .. } | Self::DayCompleted { .. } | Self::EventForced { .. } => "engine",
            Self::SpecialEventTriggered { .. } => "event",
            Self::DemandEstimated { .. } => "demand",
            Self::CustomerResolved { .. } => "customer",
            Self::ReputationUpdated { .. } | Self::IceMelted { .. } | Self::DayResolved { .. } => {
                "resolver"
            }
            Self::AchievementUnlocked { .. } => "achievement",
            Self::WeatherForecast { .. } => "weather",
            Self::CommandApplied { .. } | Self::CommandRejected { .. } => "player",
        }
    }

    pub fn day(&self) -> Day {
        match self {
            Self::DayStarted { day, .. }
            | Self::DayCompleted { day }
            | Self::EventForced { day, .. }
            | Self::SpecialEventTriggered { day, .. }
            | Self::DemandEstimated { day, .. }
            | Self::CustomerResolved { day, .. }
            | Self::ReputationUpdated { day, .. }
            | Self::IceMelted { day, .. }
            | Self::DayResolved { day, .. }
            | Self::AchievementUnlocked { day, .. }
            | Self::WeatherForecast { day, .. }
            | Self::CommandApplied { day, .. }
            | Self::CommandRejected { day, .. } => *day,
        }
    }
}

// ── Readers over a day's event stream ──────────────────────────────

/// The special event that fired today, if any.
pub fn triggered_event(events: &[SimEvent]) -> Option<EventKind> {
    events.iter().find_map(|e| match e {
        SimEvent::SpecialEventTriggered { kind, .. } => Some(*kind),
        _ => None,
    })
}

/// The event the caller forced for today, if any.
pub fn forced_event(events: &[SimEvent]) -> Option<EventKind> {
    events.iter().find_map(|e| match e {
        SimEvent::EventForced { kind, .. } => Some(*kind),
        _ => None,
    })
}

/// (quality, potential_customers) from today's demand estimate.
pub fn demand_estimate(events: &[SimEvent]) -> Option<(f64, u32)> {
    events.iter().find_map(|e| match e {
        SimEvent::DemandEstimated { quality, potential_customers, .. } => {
            Some((*quality, *potential_customers))
        }
        _ => None,
    })
}

/// Customers resolved today, in arrival order.
pub fn customers(events: &[SimEvent]) -> impl Iterator<Item = &CustomerRecord> {
    events.iter().filter_map(|e| match e {
        SimEvent::CustomerResolved { customer, .. } => Some(customer),
        _ => None,
    })
}

pub fn day_summary(events: &[SimEvent]) -> Option<&DaySummary> {
    events.iter().find_map(|e| match e {
        SimEvent::DayResolved { summary, .. } => Some(summary),
        _ => None,
    })
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub session_id: SessionId,
    pub day: Day,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}

impl EventLogEntry {
    pub fn from_event(session_id: &str, event: &SimEvent) -> SimResult<Self> {
        Ok(Self {
            id: None,
            session_id: session_id.to_string(),
            day: event.day(),
            subsystem: event.source().to_string(),
            event_type: event.event_type().to_string(),
            payload: serde_json::to_string(event)?,
        })
    }
}
