use crate::{
    config::SimConfig,
    error::Rejection,
    state::GameState,
    types::{round_cents, SupplyKind, UpgradeTrack},
};
use serde::{Deserialize, Serialize};

// Tolerance for comparing cash against a cent-rounded cost.
const CASH_EPSILON: f64 = 1e-9;

/// All player-issued actions between days.
/// Variants are never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    SetPrice {
        price: f64,
    },
    SetRecipe {
        lemon_ratio: f64,
        sugar_ratio: f64,
    },
    BuySupplies {
        item: SupplyKind,
        quantity: u32,
    },
    PurchaseUpgrade {
        track: UpgradeTrack,
    },
    Reset,
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPrice { .. } => "set_price",
            Self::SetRecipe { .. } => "set_recipe",
            Self::BuySupplies { .. } => "buy_supplies",
            Self::PurchaseUpgrade { .. } => "purchase_upgrade",
            Self::Reset => "reset",
        }
    }

    /// Validate and apply the command.
    /// On rejection the state is left exactly as it was.
    pub fn apply(&self, state: &mut GameState, config: &SimConfig) -> Result<(), Rejection> {
        let limits = &config.limits;
        match *self {
            Self::SetPrice { price } => {
                if !(limits.price_min..=limits.price_max).contains(&price) {
                    return Err(Rejection::PriceOutOfRange {
                        price,
                        min: limits.price_min,
                        max: limits.price_max,
                    });
                }
                state.price = price;
            }

            Self::SetRecipe { lemon_ratio, sugar_ratio } => {
                for (field, value) in [("lemon", lemon_ratio), ("sugar", sugar_ratio)] {
                    if !(limits.recipe_min..=limits.recipe_max).contains(&value) {
                        return Err(Rejection::RecipeOutOfRange {
                            field,
                            value,
                            min: limits.recipe_min,
                            max: limits.recipe_max,
                        });
                    }
                }
                state.recipe.lemon_ratio = lemon_ratio;
                state.recipe.sugar_ratio = sugar_ratio;
            }

            Self::BuySupplies { item, quantity } => {
                if quantity == 0 {
                    return Err(Rejection::invalid_quantity(item, quantity));
                }
                let new_count = state
                    .inventory
                    .get(item)
                    .checked_add(quantity)
                    .ok_or_else(|| Rejection::invalid_quantity(item, quantity))?;
                let cost = round_cents(config.costs.unit_cost(item) * quantity as f64);
                ensure_cash(state, cost)?;

                state.cash = round_cents(state.cash - cost);
                *state.inventory.slot_mut(item) = new_count;
            }

            Self::PurchaseUpgrade { track } => {
                let current = state.upgrades.tier(track);
                let next = current + 1;
                let cost = config
                    .upgrades
                    .tier_cost(track, next)
                    .ok_or(Rejection::MaxTierReached { track, tier: current })?;
                ensure_cash(state, cost)?;

                state.cash = round_cents(state.cash - cost);
                *state.upgrades.tier_mut(track) = next;
            }

            Self::Reset => state.reset(config),
        }
        Ok(())
    }
}

fn ensure_cash(state: &GameState, needed: f64) -> Result<(), Rejection> {
    if state.cash + CASH_EPSILON < needed {
        return Err(Rejection::InsufficientCash {
            needed,
            available: state.cash,
        });
    }
    Ok(())
}
