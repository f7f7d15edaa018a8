use lemonade_core::{
    config::SimConfig,
    types::{EventKind, UpgradeTrack},
};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

/// The shipped data files and the builtin catalog must never drift apart.
#[test]
fn shipped_data_matches_builtin() {
    let loaded = SimConfig::load(&data_dir()).expect("load data/");
    assert_eq!(loaded, SimConfig::builtin());
}

#[test]
fn missing_data_dir_is_an_error() {
    assert!(SimConfig::load("/definitely/not/a/data/dir").is_err());
}

#[test]
fn inverted_limits_fail_validation() {
    let mut config = SimConfig::builtin();
    config.limits.price_min = 6.0;
    assert!(config.validate().is_err());
}

/// Inverted swing ranges would abort the day at the first draw, so they
/// are refused up front.
#[test]
fn inverted_reputation_ranges_fail_validation() {
    let base = SimConfig::builtin();

    let mut perfect = base.clone();
    perfect.reputation.perfect_gain_min = 20;
    assert!(perfect.validate().is_err(), "perfect gain range");

    let mut strong = base.clone();
    strong.reputation.strong_gain_min = 7;
    assert!(strong.validate().is_err(), "strong gain range");

    let mut weak = base.clone();
    weak.reputation.weak_loss_max = 2;
    assert!(weak.validate().is_err(), "weak loss range");

    assert!(base.validate().is_ok());
}

#[test]
fn inverted_price_ceiling_range_fails_validation() {
    let mut config = SimConfig::builtin();
    config.customer.max_price_min = 2.50;
    let err = config.validate().expect_err("ceiling range is inverted");
    assert!(err.to_string().contains("price ceiling"), "unexpected error: {err}");
}

#[test]
fn catalog_lookups() {
    let config = SimConfig::builtin();
    assert_eq!(config.upgrades.max_tier(UpgradeTrack::Marketing), 3);
    assert_eq!(config.upgrades.tier_cost(UpgradeTrack::Stand, 2), Some(500.0));
    assert_eq!(config.upgrades.tier_cost(UpgradeTrack::Stand, 3), None);
    assert_eq!(config.upgrades.tier_name(UpgradeTrack::Fridge, 1), Some("Mini Fridge"));
    assert_eq!(config.event(EventKind::SchoolBus).map(|e| e.chance), Some(0.20));

    let order: Vec<_> = config.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        order,
        vec![
            EventKind::FoodCritic,
            EventKind::Celebrity,
            EventKind::HealthInspector,
            EventKind::RivalStand,
            EventKind::SchoolBus,
            EventKind::PowerOutage,
            EventKind::Festival,
        ],
        "catalog order is the trial priority"
    );
}
