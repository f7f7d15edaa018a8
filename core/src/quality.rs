//! Product quality from recipe and juicer.

use crate::{config::SimConfig, state::Recipe};

/// Base quality of a recipe: 1.0 at the optimal (1.0, 1.0) ratios,
/// falling off linearly and symmetrically with deviation in either ratio.
pub fn base_quality(recipe: &Recipe, config: &SimConfig) -> f64 {
    let deviation = (recipe.lemon_ratio - 1.0).abs() + (recipe.sugar_ratio - 1.0).abs();
    (1.0 - config.quality.recipe_penalty * deviation).max(0.0)
}

/// `base_quality × juicer multiplier` for the given juicer tier.
pub fn product_quality(recipe: &Recipe, juicer_tier: usize, config: &SimConfig) -> f64 {
    base_quality(recipe, config) * config.upgrades.juicer_quality(juicer_tier)
}

pub fn is_premium(quality: f64, config: &SimConfig) -> bool {
    quality > config.quality.premium_threshold
}
