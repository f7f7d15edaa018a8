//! Player command validation. A rejected command never changes the state.

mod common;

use common::{approx, config, fresh_state};
use lemonade_core::{
    command::PlayerCommand,
    error::Rejection,
    state::GameState,
    types::{SupplyKind, UpgradeTrack},
};

#[test]
fn price_above_five_dollars_is_rejected() {
    let config = config();
    let mut state = fresh_state();
    let before = state.clone();

    let err = PlayerCommand::SetPrice { price: 6.0 }
        .apply(&mut state, &config)
        .expect_err("$6 must be rejected");

    assert_eq!(err, Rejection::PriceOutOfRange { price: 6.0, min: 0.25, max: 5.0 });
    assert_eq!(state, before, "rejection must leave the state untouched");
}

#[test]
fn price_bounds_are_inclusive() {
    let config = config();
    let mut state = fresh_state();
    PlayerCommand::SetPrice { price: 0.25 }.apply(&mut state, &config).expect("min price");
    assert_eq!(state.price, 0.25);
    PlayerCommand::SetPrice { price: 5.0 }.apply(&mut state, &config).expect("max price");
    assert_eq!(state.price, 5.0);
    assert!(PlayerCommand::SetPrice { price: 0.24 }.apply(&mut state, &config).is_err());
}

#[test]
fn recipe_ratios_are_validated_independently() {
    let config = config();
    let mut state = fresh_state();

    PlayerCommand::SetRecipe { lemon_ratio: 1.5, sugar_ratio: 0.5 }
        .apply(&mut state, &config)
        .expect("bounds are inclusive");
    assert_eq!(state.recipe.lemon_ratio, 1.5);

    let before = state.clone();
    let err = PlayerCommand::SetRecipe { lemon_ratio: 1.0, sugar_ratio: 1.6 }
        .apply(&mut state, &config)
        .expect_err("sugar out of range");
    assert!(matches!(err, Rejection::RecipeOutOfRange { field: "sugar", .. }), "got {err:?}");
    assert_eq!(state, before);
}

#[test]
fn buying_supplies_moves_cash_into_stock() {
    let config = config();
    let mut state = fresh_state();

    PlayerCommand::BuySupplies { item: SupplyKind::Lemons, quantity: 10 }
        .apply(&mut state, &config)
        .expect("affordable");

    assert!(approx(state.cash, 20.0));
    assert_eq!(state.inventory.lemons, 15);
}

/// $25 buys exactly 500 ice at $0.05.
#[test]
fn spending_the_last_cent_is_allowed() {
    let config = config();
    let mut state = fresh_state();
    PlayerCommand::BuySupplies { item: SupplyKind::Ice, quantity: 500 }
        .apply(&mut state, &config)
        .expect("exactly affordable");
    assert_eq!(state.cash, 0.0);
    assert_eq!(state.inventory.ice, 500);
}

#[test]
fn unaffordable_or_empty_purchases_are_rejected() {
    let config = config();
    let mut state = fresh_state();
    let before = state.clone();

    let err = PlayerCommand::BuySupplies { item: SupplyKind::Lemons, quantity: 100 }
        .apply(&mut state, &config)
        .expect_err("$50 of lemons with $25");
    assert_eq!(err, Rejection::InsufficientCash { needed: 50.0, available: 25.0 });

    let err = PlayerCommand::BuySupplies { item: SupplyKind::Cups, quantity: 0 }
        .apply(&mut state, &config)
        .expect_err("zero quantity");
    assert_eq!(err, Rejection::InvalidQuantity { item: "cups", quantity: 0 });

    assert_eq!(state, before);
}

#[test]
fn upgrades_step_one_tier_at_a_time() {
    let config = config();
    let mut state = fresh_state();

    let err = PlayerCommand::PurchaseUpgrade { track: UpgradeTrack::Juicer }
        .apply(&mut state, &config)
        .expect_err("$50 juicer with $25");
    assert!(matches!(err, Rejection::InsufficientCash { .. }));

    state.cash = 300.0;
    PlayerCommand::PurchaseUpgrade { track: UpgradeTrack::Juicer }
        .apply(&mut state, &config)
        .expect("tier 1");
    assert_eq!(state.upgrades.juicer, 1);
    assert!(approx(state.cash, 250.0));

    PlayerCommand::PurchaseUpgrade { track: UpgradeTrack::Juicer }
        .apply(&mut state, &config)
        .expect("tier 2");
    assert_eq!(state.upgrades.juicer, 2);
    assert!(approx(state.cash, 50.0));
}

#[test]
fn max_tier_cannot_be_exceeded() {
    let config = config();
    let mut state = fresh_state();
    state.cash = 10_000.0;
    state.upgrades.marketing = 3;
    let before = state.clone();

    let err = PlayerCommand::PurchaseUpgrade { track: UpgradeTrack::Marketing }
        .apply(&mut state, &config)
        .expect_err("billboard is the last tier");
    assert_eq!(err, Rejection::MaxTierReached { track: UpgradeTrack::Marketing, tier: 3 });
    assert_eq!(err.to_string(), "marketing is already at max tier 3");
    assert_eq!(state, before);
}

#[test]
fn reset_starts_the_stand_over() {
    let config = config();
    let mut state = fresh_state();
    state.cash = 999.0;
    state.day_number = 40;
    state.upgrades.stand = 2;
    state.total_sales = 1234;

    PlayerCommand::Reset.apply(&mut state, &config).expect("reset");
    assert_eq!(state, GameState::new(&config));
}

/// Commands arrive as JSON over IPC.
#[test]
fn commands_parse_from_tagged_json() {
    let cmd: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"buy_supplies","item":"ice","quantity":20}"#).expect("parse");
    assert_eq!(cmd, PlayerCommand::BuySupplies { item: SupplyKind::Ice, quantity: 20 });
    let reset: PlayerCommand = serde_json::from_str(r#"{"cmd":"reset"}"#).expect("parse");
    assert_eq!(reset, PlayerCommand::Reset);
}
