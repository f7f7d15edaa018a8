//! Achievement subsystem: one-time unlocks with cash rewards.
//!
//! Runs after the resolver, so day-level predicates read the summary
//! the resolver just appended. Unlocks are recorded permanently;
//! evaluation on an unchanged state unlocks nothing.

use crate::{
    config::{AchievementConfig, SimConfig},
    error::SimResult,
    event::SimEvent,
    rng::RandomSource,
    state::GameState,
    subsystem::SimSubsystem,
    types::{round_cents, AchievementId, Day, Weather},
};
use serde::{Deserialize, Serialize};

/// An achievement unlocked during evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockedAchievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub reward: f64,
}

impl From<&AchievementConfig> for UnlockedAchievement {
    fn from(a: &AchievementConfig) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            description: a.description.clone(),
            reward: a.reward,
        }
    }
}

/// Whether the unlock condition for `id` holds on `state`.
pub fn predicate_holds(id: AchievementId, state: &GameState) -> bool {
    let last = state.last_day();
    match id {
        AchievementId::FirstSale => state.total_sales >= 1,
        AchievementId::HundredSales => state.total_sales >= 100,
        AchievementId::ThousandSales => state.total_sales >= 1000,
        AchievementId::ProfitMaster => last.is_some_and(|d| d.net_profit >= 100.0),
        AchievementId::FiveStar => state.reputation >= 100.0,
        AchievementId::Tycoon => state.cash >= 1000.0,
        AchievementId::PerfectDay => {
            last.is_some_and(|d| d.potential_customers > 0 && d.served == d.potential_customers)
        }
        AchievementId::IceKing => last.is_some_and(|d| {
            d.weather == Weather::Hot && d.served > 0 && d.served_warm == 0
        }),
    }
}

/// Unlock every catalog entry whose predicate holds and that is not yet
/// unlocked. Rewards are paid in catalog order, and the catalog is walked
/// again until a pass unlocks nothing, so a reward that lifts cash past
/// the Tycoon line unlocks it in the same call.
pub fn evaluate_achievements(state: &mut GameState, config: &SimConfig) -> Vec<UnlockedAchievement> {
    let mut unlocked = Vec::new();
    loop {
        let before = unlocked.len();
        for achievement in &config.achievements {
            if state.has_unlocked(achievement.id) || !predicate_holds(achievement.id, state) {
                continue;
            }
            state.achievements_unlocked.insert(achievement.id);
            state.cash = round_cents(state.cash + achievement.reward);
            unlocked.push(UnlockedAchievement::from(achievement));
        }
        if unlocked.len() == before {
            break;
        }
    }
    unlocked
}

pub struct AchievementSubsystem {
    config: SimConfig,
}

impl AchievementSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for AchievementSubsystem {
    fn name(&self) -> &'static str { "achievement" }

    fn update(
        &mut self,
        day: Day,
        state: &mut GameState,
        _events_in: &[SimEvent],
        _rng: &mut dyn RandomSource,
    ) -> SimResult<Vec<SimEvent>> {
        let unlocked = evaluate_achievements(state, &self.config);
        for a in &unlocked {
            log::info!("day={day} achievement unlocked: {} (+${:.2})", a.name, a.reward);
        }
        Ok(unlocked
            .into_iter()
            .map(|a| SimEvent::AchievementUnlocked {
                day,
                id: a.id,
                name: a.name,
                description: a.description,
                reward: a.reward,
            })
            .collect())
    }
}
