//! Persistent game state: everything that survives from one day to the next.
//!
//! RULE: GameState is mutated only by the day subsystems (via the engine)
//! and by PlayerCommand::apply. Nothing else writes to it.

use crate::{
    config::SimConfig,
    types::{AchievementId, Day, EventKind, SupplyKind, UpgradeTrack, Weather},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Inventory {
    pub lemons: u32,
    pub sugar: u32,
    pub cups: u32,
    pub ice: u32,
}

impl Inventory {
    pub fn get(&self, item: SupplyKind) -> u32 {
        match item {
            SupplyKind::Lemons => self.lemons,
            SupplyKind::Sugar => self.sugar,
            SupplyKind::Cups => self.cups,
            SupplyKind::Ice => self.ice,
        }
    }

    pub fn slot_mut(&mut self, item: SupplyKind) -> &mut u32 {
        match item {
            SupplyKind::Lemons => &mut self.lemons,
            SupplyKind::Sugar => &mut self.sugar,
            SupplyKind::Cups => &mut self.cups,
            SupplyKind::Ice => &mut self.ice,
        }
    }

    /// True when one cup of lemonade can be made. Ice is optional.
    pub fn has_basics(&self) -> bool {
        self.lemons >= 1 && self.sugar >= 1 && self.cups >= 1
    }

    /// Take one lemon, sugar and cup, plus an ice cube if `with_ice`.
    /// Callers check `has_basics` first; counts saturate at zero.
    pub fn consume_cup(&mut self, with_ice: bool) {
        self.lemons = self.lemons.saturating_sub(1);
        self.sugar = self.sugar.saturating_sub(1);
        self.cups = self.cups.saturating_sub(1);
        if with_ice {
            self.ice = self.ice.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub lemon_ratio: f64,
    pub sugar_ratio: f64,
}

impl Default for Recipe {
    fn default() -> Self {
        Self { lemon_ratio: 1.0, sugar_ratio: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Upgrades {
    pub juicer: usize,
    pub stand: usize,
    pub fridge: usize,
    pub marketing: usize,
}

impl Upgrades {
    pub fn tier(&self, track: UpgradeTrack) -> usize {
        match track {
            UpgradeTrack::Juicer => self.juicer,
            UpgradeTrack::Stand => self.stand,
            UpgradeTrack::Fridge => self.fridge,
            UpgradeTrack::Marketing => self.marketing,
        }
    }

    pub fn tier_mut(&mut self, track: UpgradeTrack) -> &mut usize {
        match track {
            UpgradeTrack::Juicer => &mut self.juicer,
            UpgradeTrack::Stand => &mut self.stand,
            UpgradeTrack::Fridge => &mut self.fridge,
            UpgradeTrack::Marketing => &mut self.marketing,
        }
    }
}

/// One finished day. Appended to `GameState::history` and never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySummary {
    pub day: Day,
    pub weather: Weather,
    pub event: Option<EventKind>,
    pub quality: f64,
    pub potential_customers: u32,
    pub served: u32,
    pub lost: u32,
    pub lost_too_expensive: u32,
    pub lost_out_of_stock: u32,
    /// Buyers who wanted ice but got their cup without it.
    pub served_warm: u32,
    pub conversion_rate: f64,
    pub revenue: f64,
    pub cost_of_goods: f64,
    pub ice_melted: u32,
    pub ice_loss: f64,
    /// Event cash actually applied (negative deltas clamp at zero cash).
    pub event_cash: f64,
    pub net_profit: f64,
    pub reputation_delta: f64,
    pub ending_cash: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub cash: f64,
    pub day_number: Day,
    pub inventory: Inventory,
    pub price: f64,
    pub recipe: Recipe,
    pub upgrades: Upgrades,
    pub reputation: f64,
    pub stars: f64,
    pub weather: Weather,
    pub next_weather: Weather,
    pub total_sales: u64,
    pub total_revenue: f64,
    /// Most cups sold in a single day.
    pub best_day: u32,
    pub perfect_days: u32,
    pub profit_streak: u32,
    pub history: Vec<DaySummary>,
    pub achievements_unlocked: BTreeSet<AchievementId>,
}

impl GameState {
    /// A fresh game as configured by `config.start`.
    pub fn new(config: &SimConfig) -> Self {
        let start = &config.start;
        Self {
            cash: start.cash,
            day_number: 1,
            inventory: Inventory {
                lemons: start.lemons,
                sugar: start.sugar,
                cups: start.cups,
                ice: start.ice,
            },
            price: start.price,
            recipe: Recipe::default(),
            upgrades: Upgrades::default(),
            reputation: start.reputation,
            stars: stars_for(start.reputation, config),
            weather: start.weather,
            next_weather: start.next_weather,
            total_sales: 0,
            total_revenue: 0.0,
            best_day: 0,
            perfect_days: 0,
            profit_streak: 0,
            history: Vec::new(),
            achievements_unlocked: BTreeSet::new(),
        }
    }

    pub fn reset(&mut self, config: &SimConfig) {
        *self = Self::new(config);
    }

    /// Highest reputation the current stand can hold.
    pub fn reputation_cap(&self, config: &SimConfig) -> f64 {
        config
            .upgrades
            .stand_rep_cap(self.upgrades.stand)
            .min(config.reputation.max_reputation)
    }

    pub fn last_day(&self) -> Option<&DaySummary> {
        self.history.last()
    }

    pub fn has_unlocked(&self, id: AchievementId) -> bool {
        self.achievements_unlocked.contains(&id)
    }

    /// Check the invariants a restored state must satisfy.
    pub fn check_invariants(&self, config: &SimConfig) -> Result<(), String> {
        if !self.cash.is_finite() || self.cash < 0.0 {
            return Err(format!("cash {} is not a valid balance", self.cash));
        }
        if !(0.0..=config.reputation.max_reputation).contains(&self.reputation) {
            return Err(format!("reputation {} out of range", self.reputation));
        }
        let limits = &config.limits;
        if !(limits.price_min..=limits.price_max).contains(&self.price) {
            return Err(format!("price {} out of range", self.price));
        }
        for ratio in [self.recipe.lemon_ratio, self.recipe.sugar_ratio] {
            if !(limits.recipe_min..=limits.recipe_max).contains(&ratio) {
                return Err(format!("recipe ratio {ratio} out of range"));
            }
        }
        for track in UpgradeTrack::ALL {
            let tier = self.upgrades.tier(track);
            if tier > config.upgrades.max_tier(track) {
                return Err(format!("{} tier {tier} does not exist", track.name()));
            }
        }
        if self.day_number == 0 {
            return Err("day_number starts at 1".into());
        }
        Ok(())
    }
}

pub(crate) fn stars_for(reputation: f64, config: &SimConfig) -> f64 {
    1.0 + reputation / config.reputation.stars_divisor
}
