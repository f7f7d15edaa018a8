use crate::types::{AchievementId, EventKind, SupplyKind, UpgradeTrack, Weather};
use serde::{Deserialize, Serialize};

// ── Supplies ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyCosts {
    pub lemons: f64,
    pub sugar: f64,
    pub cups: f64,
    pub ice: f64,
}

impl SupplyCosts {
    pub fn unit_cost(&self, item: SupplyKind) -> f64 {
        match item {
            SupplyKind::Lemons => self.lemons,
            SupplyKind::Sugar => self.sugar,
            SupplyKind::Cups => self.cups,
            SupplyKind::Ice => self.ice,
        }
    }

    /// Cost of the lemon, sugar and cup that go into every cup sold.
    pub fn cup_cost(&self) -> f64 {
        self.lemons + self.sugar + self.cups
    }
}

// ── Upgrades ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JuicerTier {
    pub name: String,
    pub cost: f64,
    /// Quality multiplier applied on top of the recipe's base quality.
    pub quality: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandTier {
    pub name: String,
    pub cost: f64,
    /// Reputation ceiling while this stand is in use.
    pub rep_cap: f64,
    pub appeal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FridgeTier {
    pub name: String,
    pub cost: f64,
    /// Fraction of leftover ice that survives the night.
    pub ice_save: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketingTier {
    pub name: String,
    pub cost: f64,
    /// Customer boost in percent.
    pub boost: f64,
}

/// Tier 0 of every track is the free starting equipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeCatalog {
    pub juicer: Vec<JuicerTier>,
    pub stand: Vec<StandTier>,
    pub fridge: Vec<FridgeTier>,
    pub marketing: Vec<MarketingTier>,
}

impl UpgradeCatalog {
    pub fn max_tier(&self, track: UpgradeTrack) -> usize {
        let len = match track {
            UpgradeTrack::Juicer => self.juicer.len(),
            UpgradeTrack::Stand => self.stand.len(),
            UpgradeTrack::Fridge => self.fridge.len(),
            UpgradeTrack::Marketing => self.marketing.len(),
        };
        len.saturating_sub(1)
    }

    /// Cost of buying `tier` on `track`, or None if the tier does not exist.
    pub fn tier_cost(&self, track: UpgradeTrack, tier: usize) -> Option<f64> {
        match track {
            UpgradeTrack::Juicer => self.juicer.get(tier).map(|t| t.cost),
            UpgradeTrack::Stand => self.stand.get(tier).map(|t| t.cost),
            UpgradeTrack::Fridge => self.fridge.get(tier).map(|t| t.cost),
            UpgradeTrack::Marketing => self.marketing.get(tier).map(|t| t.cost),
        }
    }

    pub fn tier_name(&self, track: UpgradeTrack, tier: usize) -> Option<&str> {
        match track {
            UpgradeTrack::Juicer => self.juicer.get(tier).map(|t| t.name.as_str()),
            UpgradeTrack::Stand => self.stand.get(tier).map(|t| t.name.as_str()),
            UpgradeTrack::Fridge => self.fridge.get(tier).map(|t| t.name.as_str()),
            UpgradeTrack::Marketing => self.marketing.get(tier).map(|t| t.name.as_str()),
        }
    }

    // Lookups below clamp to the top tier.

    pub fn juicer_quality(&self, tier: usize) -> f64 {
        self.juicer.get(tier.min(self.max_tier(UpgradeTrack::Juicer)))
            .map_or(1.0, |t| t.quality)
    }

    pub fn stand_appeal(&self, tier: usize) -> f64 {
        self.stand.get(tier.min(self.max_tier(UpgradeTrack::Stand)))
            .map_or(1.0, |t| t.appeal)
    }

    pub fn stand_rep_cap(&self, tier: usize) -> f64 {
        self.stand.get(tier.min(self.max_tier(UpgradeTrack::Stand)))
            .map_or(100.0, |t| t.rep_cap)
    }

    pub fn fridge_ice_save(&self, tier: usize) -> f64 {
        self.fridge.get(tier.min(self.max_tier(UpgradeTrack::Fridge)))
            .map_or(0.0, |t| t.ice_save)
    }

    pub fn marketing_boost(&self, tier: usize) -> f64 {
        self.marketing.get(tier.min(self.max_tier(UpgradeTrack::Marketing)))
            .map_or(0.0, |t| t.boost)
    }
}

// ── Events ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEffect {
    pub customer_multiplier: f64,
    pub price_multiplier: f64,
    pub cash_delta: f64,
    pub ice_loss: bool,
    pub reputation_delta: f64,
}

impl EventEffect {
    pub const NONE: EventEffect = EventEffect {
        customer_multiplier: 1.0,
        price_multiplier: 1.0,
        cash_delta: 0.0,
        ice_loss: false,
        reputation_delta: 0.0,
    };
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventConfig {
    pub kind: EventKind,
    pub name: String,
    /// Independent trigger probability, rolled in catalog order.
    pub chance: f64,
    pub message: String,
    pub effect: EventEffect,
}

#[derive(Debug, Clone, Deserialize)]
struct EventCatalogFile {
    events: Vec<EventConfig>,
}

// ── Achievements ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementConfig {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub reward: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct AchievementCatalogFile {
    achievements: Vec<AchievementConfig>,
}

// ── Tuning ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherProfile {
    pub kind: Weather,
    pub customer_multiplier: f64,
    /// Flat addition to every customer's price ceiling.
    pub price_bonus: f64,
    /// Every customer wants ice on this kind of day.
    pub forces_ice: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemandConfig {
    pub base_customers_min: u32,
    pub base_customers_max: u32,
    /// Reputation is divided by this before it scales demand.
    pub reputation_divisor: f64,
    /// Marketing boost is divided by this before it scales demand.
    pub marketing_divisor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerConfig {
    pub ice_preference_chance: f64,
    pub max_price_min: f64,
    pub max_price_max: f64,
    pub reputation_price_threshold: f64,
    pub reputation_price_bonus: f64,
    /// Price-ceiling bonus for premium quality, as a fraction.
    pub premium_tolerance_bonus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityConfig {
    /// Base quality lost per unit of total recipe deviation from 1.0.
    pub recipe_penalty: f64,
    pub premium_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReputationConfig {
    pub max_reputation: f64,
    pub perfect_gain_min: u32,
    pub perfect_gain_max: u32,
    pub strong_conversion: f64,
    pub strong_gain_min: u32,
    pub strong_gain_max: u32,
    pub weak_conversion: f64,
    pub weak_loss_min: u32,
    pub weak_loss_max: u32,
    pub high_quality: f64,
    pub low_quality: f64,
    pub quality_swing: f64,
    /// Stars = 1 + reputation / stars_divisor.
    pub stars_divisor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    pub price_min: f64,
    pub price_max: f64,
    pub recipe_min: f64,
    pub recipe_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartConfig {
    pub cash: f64,
    pub reputation: f64,
    pub price: f64,
    pub lemons: u32,
    pub sugar: u32,
    pub cups: u32,
    pub ice: u32,
    pub weather: Weather,
    pub next_weather: Weather,
}

#[derive(Debug, Clone, Deserialize)]
struct TuningFile {
    costs: SupplyCosts,
    weather: Vec<WeatherProfile>,
    demand: DemandConfig,
    customer: CustomerConfig,
    quality: QualityConfig,
    reputation: ReputationConfig,
    limits: LimitsConfig,
    start: StartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub costs: SupplyCosts,
    pub upgrades: UpgradeCatalog,
    pub events: Vec<EventConfig>,
    pub achievements: Vec<AchievementConfig>,
    pub weather: Vec<WeatherProfile>,
    pub demand: DemandConfig,
    pub customer: CustomerConfig,
    pub quality: QualityConfig,
    pub reputation: ReputationConfig,
    pub limits: LimitsConfig,
    pub start: StartConfig,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let upgrades: UpgradeCatalog = read_json(&format!("{data_dir}/upgrades.json"))?;
        let event_file: EventCatalogFile = read_json(&format!("{data_dir}/events.json"))?;
        let achievement_file: AchievementCatalogFile =
            read_json(&format!("{data_dir}/achievements.json"))?;
        let tuning: TuningFile = read_json(&format!("{data_dir}/tuning.json"))?;

        let config = Self {
            costs: tuning.costs,
            upgrades,
            events: event_file.events,
            achievements: achievement_file.achievements,
            weather: tuning.weather,
            demand: tuning.demand,
            customer: tuning.customer,
            quality: tuning.quality,
            reputation: tuning.reputation,
            limits: tuning.limits,
            start: tuning.start,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject catalogs the simulation cannot run on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.upgrades.juicer.is_empty()
            || self.upgrades.stand.is_empty()
            || self.upgrades.fridge.is_empty()
            || self.upgrades.marketing.is_empty()
        {
            anyhow::bail!("every upgrade track needs at least a starting tier");
        }
        for kind in Weather::ALL {
            if self.weather_profile(kind).is_none() {
                anyhow::bail!("missing weather profile for {}", kind.name());
            }
        }
        if self.demand.base_customers_min > self.demand.base_customers_max {
            anyhow::bail!("base customer range is empty");
        }
        if self.limits.price_min > self.limits.price_max
            || self.limits.recipe_min > self.limits.recipe_max
        {
            anyhow::bail!("player limits are inverted");
        }
        let rep = &self.reputation;
        if rep.perfect_gain_min > rep.perfect_gain_max
            || rep.strong_gain_min > rep.strong_gain_max
            || rep.weak_loss_min > rep.weak_loss_max
        {
            anyhow::bail!("reputation swing ranges are inverted");
        }
        if self.customer.max_price_min > self.customer.max_price_max {
            anyhow::bail!("customer price ceiling range is inverted");
        }
        Ok(())
    }

    pub fn event(&self, kind: EventKind) -> Option<&EventConfig> {
        self.events.iter().find(|e| e.kind == kind)
    }

    pub fn weather_profile(&self, kind: Weather) -> Option<&WeatherProfile> {
        self.weather.iter().find(|w| w.kind == kind)
    }

    /// The game's shipped catalog. Mirrors data/*.json.
    pub fn builtin() -> Self {
        Self {
            costs: SupplyCosts {
                lemons: 0.50,
                sugar: 0.20,
                cups: 0.10,
                ice: 0.05,
            },
            upgrades: UpgradeCatalog {
                juicer: vec![
                    juicer("Hand Squeezer", 0.0, 1.0),
                    juicer("Metal Press", 50.0, 1.2),
                    juicer("Industrial Juicer", 200.0, 1.5),
                ],
                stand: vec![
                    stand("Cardboard Box", 0.0, 30.0, 1.0),
                    stand("Wooden Stand", 100.0, 60.0, 1.3),
                    stand("Food Truck", 500.0, 100.0, 2.0),
                ],
                fridge: vec![
                    fridge("Cooler Box", 0.0, 0.0),
                    fridge("Mini Fridge", 150.0, 0.4),
                    fridge("Deep Freezer", 400.0, 0.8),
                ],
                marketing: vec![
                    marketing("Word of Mouth", 0.0, 0.0),
                    marketing("Flyers", 75.0, 5.0),
                    marketing("Social Media", 300.0, 15.0),
                    marketing("Billboard", 800.0, 30.0),
                ],
            },
            events: vec![
                event(EventKind::FoodCritic, "Food Critic Visit", 0.15,
                      "A food critic wrote about your stand!",
                      EventEffect { reputation_delta: 5.0, ..EventEffect::NONE }),
                event(EventKind::Celebrity, "Celebrity Spotted", 0.08,
                      "Celebrity bought your lemonade!",
                      EventEffect { cash_delta: 50.0, reputation_delta: 3.0, ..EventEffect::NONE }),
                event(EventKind::HealthInspector, "Health Inspector", 0.12,
                      "The health inspector charged a permit fee.",
                      EventEffect { cash_delta: -10.0, reputation_delta: -2.0, ..EventEffect::NONE }),
                event(EventKind::RivalStand, "Rival Stand Opens", 0.10,
                      "Rival stand stealing customers!",
                      EventEffect { customer_multiplier: 0.6, ..EventEffect::NONE }),
                event(EventKind::SchoolBus, "School Bus Arrives", 0.20,
                      "School bus brought tons of customers!",
                      EventEffect { customer_multiplier: 2.0, ..EventEffect::NONE }),
                event(EventKind::PowerOutage, "Power Outage", 0.08,
                      "Power outage! All ice melted!",
                      EventEffect { ice_loss: true, ..EventEffect::NONE }),
                event(EventKind::Festival, "Festival Nearby", 0.10,
                      "Festival crowd loves premium lemonade!",
                      EventEffect { customer_multiplier: 1.5, price_multiplier: 1.2, ..EventEffect::NONE }),
            ],
            achievements: vec![
                achievement(AchievementId::FirstSale, "First Sale!", "Sell your first lemonade", 5.0),
                achievement(AchievementId::HundredSales, "Century", "Make 100 sales", 50.0),
                achievement(AchievementId::ThousandSales, "Legendary", "Make 1000 sales", 200.0),
                achievement(AchievementId::ProfitMaster, "Profit Master", "Earn $100 in one day", 100.0),
                achievement(AchievementId::FiveStar, "Five Star", "Reach 100 reputation", 150.0),
                achievement(AchievementId::Tycoon, "Tycoon", "Accumulate $1000 cash", 300.0),
                achievement(AchievementId::PerfectDay, "Perfect Day", "100% conversion rate", 75.0),
                achievement(AchievementId::IceKing, "Ice King", "Never run out of ice in hot weather", 50.0),
            ],
            weather: vec![
                weather(Weather::Sunny, 1.0, 0.0, false),
                weather(Weather::Cloudy, 0.7, 0.0, false),
                weather(Weather::Rainy, 0.4, 0.0, false),
                weather(Weather::Hot, 1.8, 0.50, true),
            ],
            demand: DemandConfig {
                base_customers_min: 15,
                base_customers_max: 35,
                reputation_divisor: 100.0,
                marketing_divisor: 100.0,
            },
            customer: CustomerConfig {
                ice_preference_chance: 0.4,
                max_price_min: 0.80,
                max_price_max: 2.00,
                reputation_price_threshold: 60.0,
                reputation_price_bonus: 0.40,
                premium_tolerance_bonus: 0.10,
            },
            quality: QualityConfig {
                recipe_penalty: 0.6,
                premium_threshold: 1.2,
            },
            reputation: ReputationConfig {
                max_reputation: 100.0,
                perfect_gain_min: 8,
                perfect_gain_max: 12,
                strong_conversion: 0.75,
                strong_gain_min: 3,
                strong_gain_max: 6,
                weak_conversion: 0.4,
                weak_loss_min: 3,
                weak_loss_max: 8,
                high_quality: 1.3,
                low_quality: 0.8,
                quality_swing: 3.0,
                stars_divisor: 25.0,
            },
            limits: LimitsConfig {
                price_min: 0.25,
                price_max: 5.00,
                recipe_min: 0.5,
                recipe_max: 1.5,
            },
            start: StartConfig {
                cash: 25.0,
                reputation: 10.0,
                price: 1.00,
                lemons: 5,
                sugar: 5,
                cups: 10,
                ice: 0,
                weather: Weather::Sunny,
                next_weather: Weather::Cloudy,
            },
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}

fn juicer(name: &str, cost: f64, quality: f64) -> JuicerTier {
    JuicerTier { name: name.into(), cost, quality }
}

fn stand(name: &str, cost: f64, rep_cap: f64, appeal: f64) -> StandTier {
    StandTier { name: name.into(), cost, rep_cap, appeal }
}

fn fridge(name: &str, cost: f64, ice_save: f64) -> FridgeTier {
    FridgeTier { name: name.into(), cost, ice_save }
}

fn marketing(name: &str, cost: f64, boost: f64) -> MarketingTier {
    MarketingTier { name: name.into(), cost, boost }
}

fn event(kind: EventKind, name: &str, chance: f64, message: &str, effect: EventEffect) -> EventConfig {
    EventConfig {
        kind,
        name: name.into(),
        chance,
        message: message.into(),
        effect,
    }
}

fn achievement(id: AchievementId, name: &str, description: &str, reward: f64) -> AchievementConfig {
    AchievementConfig {
        id,
        name: name.into(),
        description: description.into(),
        reward,
    }
}

fn weather(kind: Weather, customer_multiplier: f64, price_bonus: f64, forces_ice: bool) -> WeatherProfile {
    WeatherProfile { kind, customer_multiplier, price_bonus, forces_ice }
}
