//! Per-customer purchase decisions and inventory conservation.

mod common;

use common::{approx, config, stocked_state, ScriptedRng};
use lemonade_core::{
    customer_subsystem::{
        resolve_customer, simulate_customers, will_purchase, CustomerOutcome, PriceTolerance,
        WalkAwayReason,
    },
    rng::SubsystemRng,
    types::{EventKind, Weather},
};

fn plain_tolerance() -> PriceTolerance {
    PriceTolerance {
        quality: 1.0,
        premium: false,
        event_multiplier: 1.0,
        weather_bonus: 0.0,
        reputation_bonus: 0.0,
        forces_ice: false,
    }
}

#[test]
fn purchase_iff_price_within_ceiling() {
    assert!(will_purchase(1.00, 1.00));
    assert!(will_purchase(0.99, 1.00));
    assert!(!will_purchase(1.01, 1.00));
}

/// Ice draw 0.9 (no ice), ceiling draw 0.5 → 0.8 + 0.5 × 1.2 = 1.40.
#[test]
fn sale_consumes_one_of_each_basic_supply() {
    let config = config();
    let mut state = stocked_state();
    state.price = 1.00;
    let before = state.inventory;

    let record = resolve_customer(0, &mut state, &plain_tolerance(), &config, &mut ScriptedRng::new(&[0.9, 0.5]));

    assert!(approx(record.max_price.expect("price rolled"), 1.40));
    assert_eq!(record.outcome, CustomerOutcome::Purchased { paid: 1.00, with_ice: false });
    assert_eq!(state.inventory.lemons, before.lemons - 1);
    assert_eq!(state.inventory.sugar, before.sugar - 1);
    assert_eq!(state.inventory.cups, before.cups - 1);
    assert_eq!(state.inventory.ice, before.ice, "customer did not want ice");
    assert!(approx(state.cash, 101.0));
    assert_eq!(state.total_sales, 1);
}

#[test]
fn too_expensive_consumes_nothing() {
    let config = config();
    let mut state = stocked_state();
    state.price = 2.00;
    let before = state.clone();

    let record = resolve_customer(0, &mut state, &plain_tolerance(), &config, &mut ScriptedRng::new(&[0.9, 0.5]));

    assert_eq!(record.walk_away_reason(), Some(WalkAwayReason::TooExpensive));
    assert_eq!(state, before, "a walk-away must not touch the state");
}

/// Out of stock short-circuits before the price ceiling is rolled.
#[test]
fn out_of_stock_skips_the_price_roll() {
    let config = config();
    let mut state = stocked_state();
    state.inventory.cups = 0;
    let mut rng = ScriptedRng::new(&[0.9]);

    let record = resolve_customer(3, &mut state, &plain_tolerance(), &config, &mut rng);

    assert_eq!(record.walk_away_reason(), Some(WalkAwayReason::OutOfStock));
    assert_eq!(record.max_price, None);
    assert_eq!(rng.draws, 1, "only the ice preference is drawn");
}

#[test]
fn ice_is_used_when_wanted_and_available() {
    let config = config();
    let mut state = stocked_state();
    state.price = 0.50;

    let record = resolve_customer(0, &mut state, &plain_tolerance(), &config, &mut ScriptedRng::new(&[0.1, 0.5]));

    assert!(record.wants_ice);
    assert_eq!(record.outcome, CustomerOutcome::Purchased { paid: 0.50, with_ice: true });
    assert_eq!(state.inventory.ice, 199);
}

#[test]
fn no_ice_means_a_warm_cup_not_a_lost_sale() {
    let config = config();
    let mut state = stocked_state();
    state.inventory.ice = 0;
    state.price = 0.50;

    let record = resolve_customer(0, &mut state, &plain_tolerance(), &config, &mut ScriptedRng::new(&[0.1, 0.5]));

    assert!(record.purchased());
    assert!(record.served_warm());
}

#[test]
fn hot_weather_makes_everyone_want_ice() {
    let config = config();
    let mut state = stocked_state();
    state.weather = Weather::Hot;
    let tolerance = PriceTolerance::for_day(&state, 1.0, None, &config);
    assert!(tolerance.forces_ice);
    assert!(approx(tolerance.weather_bonus, 0.50));

    let record = resolve_customer(0, &mut state, &tolerance, &config, &mut ScriptedRng::new(&[0.99, 0.0]));
    assert!(record.wants_ice, "the 0.99 draw would say no, but it is hot");
    // 0.8 × 1.0 + 0.50 hot bonus
    assert!(approx(record.max_price.expect("price rolled"), 1.30));
}

/// (0.8 + 0.5 × 1.2) × 1.5 quality, then +10% for premium.
#[test]
fn premium_quality_raises_the_ceiling() {
    let config = config();
    let mut state = stocked_state();
    state.upgrades.juicer = 2;
    let tolerance = PriceTolerance::for_day(&state, 1.5, None, &config);
    assert!(tolerance.premium);

    let record = resolve_customer(0, &mut state, &tolerance, &config, &mut ScriptedRng::new(&[0.9, 0.5]));
    assert!(approx(record.max_price.expect("price rolled"), 1.4 * 1.5 * 1.1));
}

#[test]
fn reputation_and_festival_adjust_tolerance() {
    let config = config();
    let mut state = stocked_state();
    state.reputation = 61.0;
    let tolerance = PriceTolerance::for_day(&state, 1.0, Some(EventKind::Festival), &config);
    assert!(approx(tolerance.reputation_bonus, 0.40));
    assert!(approx(tolerance.event_multiplier, 1.2));

    state.reputation = 60.0;
    let at_threshold = PriceTolerance::for_day(&state, 1.0, None, &config);
    assert_eq!(at_threshold.reputation_bonus, 0.0, "the bonus needs more than 60");
}

/// Every customer resolves exactly once, and selling stops exactly when
/// the scarcest supply runs out.
#[test]
fn customers_are_conserved_and_stock_runs_dry() {
    let config = config();
    let mut state = stocked_state();
    state.inventory.cups = 30;
    state.price = 0.25;

    let mut rng = SubsystemRng::new(17, 2);
    let records = simulate_customers(100, &mut state, &plain_tolerance(), &config, &mut rng);

    let served = records.iter().filter(|r| r.purchased()).count();
    let out_of_stock = records
        .iter()
        .filter(|r| r.walk_away_reason() == Some(WalkAwayReason::OutOfStock))
        .count();
    assert_eq!(records.len(), 100);
    assert_eq!(served, 30, "the cheapest price always sells while cups last");
    assert_eq!(out_of_stock, 70);
    assert_eq!(state.inventory.cups, 0);
    assert_eq!(state.inventory.lemons, 170);
    assert!(records.iter().enumerate().all(|(i, r)| r.index == i as u32));

    // Once out of stock, never back in stock.
    let first_missing = records.iter().position(|r| !r.purchased()).expect("some lost");
    assert!(records[first_missing..].iter().all(|r| !r.purchased()));
}
