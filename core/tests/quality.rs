mod common;

use common::{approx, config};
use lemonade_core::{
    quality::{base_quality, is_premium, product_quality},
    state::Recipe,
};

fn recipe(lemon_ratio: f64, sugar_ratio: f64) -> Recipe {
    Recipe { lemon_ratio, sugar_ratio }
}

#[test]
fn optimal_recipe_scores_one() {
    assert!(approx(base_quality(&recipe(1.0, 1.0), &config()), 1.0));
}

#[test]
fn quality_falls_off_symmetrically() {
    let config = config();
    let over = base_quality(&recipe(1.5, 1.0), &config);
    let under = base_quality(&recipe(0.5, 1.0), &config);
    let sugar = base_quality(&recipe(1.0, 1.5), &config);
    assert!(approx(over, 0.7), "got {over}");
    assert!(approx(over, under), "lemon deviation must be symmetric");
    assert!(approx(over, sugar), "sugar and lemon weigh the same");
    assert!(approx(base_quality(&recipe(0.5, 1.5), &config), 0.4));
}

#[test]
fn quality_never_goes_negative() {
    let mut config = config();
    config.quality.recipe_penalty = 2.0;
    assert_eq!(base_quality(&recipe(0.5, 1.5), &config), 0.0);
}

#[test]
fn juicer_tiers_multiply_quality() {
    let config = config();
    let r = recipe(1.0, 1.0);
    assert!(approx(product_quality(&r, 0, &config), 1.0));
    assert!(approx(product_quality(&r, 1, &config), 1.2));
    assert!(approx(product_quality(&r, 2, &config), 1.5));
}

#[test]
fn premium_needs_more_than_the_threshold() {
    let config = config();
    assert!(!is_premium(1.2, &config), "exactly 1.2 is not premium");
    assert!(is_premium(1.21, &config));
    assert!(is_premium(product_quality(&recipe(1.0, 1.0), 2, &config), &config));
}
