//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// An in-game day number. Day 1 is the first day of a fresh game.
pub type Day = u32;

/// The canonical player-session identifier.
pub type SessionId = String;

/// Round a currency amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Hot,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Self::Sunny, Self::Cloudy, Self::Rainy, Self::Hot];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Hot => "hot",
        }
    }
}

/// The seven day-scoped special events.
/// Declaration order is the selector's priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FoodCritic,
    Celebrity,
    HealthInspector,
    RivalStand,
    SchoolBus,
    PowerOutage,
    Festival,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FoodCritic => "food_critic",
            Self::Celebrity => "celebrity",
            Self::HealthInspector => "health_inspector",
            Self::RivalStand => "rival_stand",
            Self::SchoolBus => "school_bus",
            Self::PowerOutage => "power_outage",
            Self::Festival => "festival",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SupplyKind {
    Lemons,
    Sugar,
    Cups,
    Ice,
}

impl SupplyKind {
    pub const ALL: [SupplyKind; 4] = [Self::Lemons, Self::Sugar, Self::Cups, Self::Ice];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lemons => "lemons",
            Self::Sugar => "sugar",
            Self::Cups => "cups",
            Self::Ice => "ice",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTrack {
    Juicer,
    Stand,
    Fridge,
    Marketing,
}

impl UpgradeTrack {
    pub const ALL: [UpgradeTrack; 4] = [Self::Juicer, Self::Stand, Self::Fridge, Self::Marketing];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Juicer => "juicer",
            Self::Stand => "stand",
            Self::Fridge => "fridge",
            Self::Marketing => "marketing",
        }
    }
}

/// Identifiers of the static achievement catalog.
/// Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstSale,
    HundredSales,
    ThousandSales,
    ProfitMaster,
    FiveStar,
    Tycoon,
    PerfectDay,
    IceKing,
}

impl AchievementId {
    pub const ALL: [AchievementId; 8] = [
        Self::FirstSale,
        Self::HundredSales,
        Self::ThousandSales,
        Self::ProfitMaster,
        Self::FiveStar,
        Self::Tycoon,
        Self::PerfectDay,
        Self::IceKing,
    ];
}
