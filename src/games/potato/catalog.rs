//! Potato Land static tables: upgrades for sale and achievements to unlock.
//!
//! Definitions are plain data. The engine mutates `cost`, `owned` and
//! `unlocked` in place; `base_cost` is kept so a prestige can restore the
//! shop without re-reading anything.

/// Which progression field an upgrade feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Adds to click power.
    Click,
    /// Adds to potatoes per second.
    Auto,
    /// Adds to the global multiplier.
    Multiplier,
    /// Adds to critical chance.
    Critical,
    /// Adds to farm size.
    Farm,
    /// No field of its own (see `AUTO_CLICKER_ID`).
    Special,
}

/// The one upgrade whose purchase also raises the auto-clicker level.
pub const AUTO_CLICKER_ID: &str = "auto_clicker";

/// A purchasable upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    /// Price of the first unit; restored on prestige.
    pub base_cost: f64,
    /// Price of the next unit.
    pub cost: f64,
    pub cost_multiplier: f64,
    /// Amount added per unit owned.
    pub effect: f64,
    pub kind: UpgradeKind,
    pub owned: u32,
    pub max_owned: Option<u32>,
}

impl UpgradeDefinition {
    /// True once `max_owned` units have been bought.
    pub fn is_maxed(&self) -> bool {
        self.max_owned.map_or(false, |max| self.owned >= max)
    }
}

/// Progression metric an achievement is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AchievementMetric {
    /// Lifetime potatoes (`total_potatoes`).
    Potatoes,
    Clicks,
    /// Number of distinct upgrades with at least one unit owned.
    Upgrades,
    Golden,
    Level,
    /// Seconds played.
    Playtime,
    /// Resets performed. No shipped achievement uses it.
    Prestige,
}

/// Field a one-shot achievement reward is added to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardKind {
    ClickPower,
    Multiplier,
    CriticalChance,
    ResearchPoints,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reward {
    pub kind: RewardKind,
    pub value: f64,
}

impl Reward {
    pub fn describe(&self) -> String {
        match self.kind {
            RewardKind::ClickPower => format!("クリック +{}", self.value),
            RewardKind::Multiplier => format!("倍率 +{}", self.value),
            RewardKind::CriticalChance => format!("クリティカル +{:.0}%", self.value * 100.0),
            RewardKind::ResearchPoints => format!("研究 +{}", self.value),
        }
    }
}

/// An achievement definition.
#[derive(Clone, Debug, PartialEq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: f64,
    pub metric: AchievementMetric,
    /// Display flag; `ProgressionState::achievements` is authoritative.
    pub unlocked: bool,
    pub reward: Option<Reward>,
}

/// Upgrade shop and achievement list for one save.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub upgrades: Vec<UpgradeDefinition>,
    pub achievements: Vec<AchievementDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            upgrades: Self::create_upgrades(),
            achievements: Self::create_achievements(),
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_mut(&mut self, id: &str) -> Option<&mut UpgradeDefinition> {
        self.upgrades.iter_mut().find(|u| u.id == id)
    }

    /// Count of distinct upgrades with `owned > 0`.
    pub fn distinct_owned(&self) -> usize {
        self.upgrades.iter().filter(|u| u.owned > 0).count()
    }

    /// Put every upgrade back to owned = 0 at its base price.
    pub fn reset_upgrades(&mut self) {
        self.upgrades = Self::create_upgrades();
    }

    pub fn create_upgrades() -> Vec<UpgradeDefinition> {
        use UpgradeKind::*;
        vec![
            // Tools
            upgrade("better_shovel", "Better Shovel", "A sharper shovel for more efficient digging", "Tools", 15.0, 1.15, 1.0, Click, None),
            upgrade("steel_shovel", "Steel Shovel", "Industrial grade digging power", "Tools", 100.0, 1.15, 5.0, Click, None),
            upgrade("power_drill", "Power Drill", "Mechanized potato harvesting", "Tools", 1_000.0, 1.15, 25.0, Click, None),
            upgrade("laser_harvester", "Laser Harvester", "Space-age potato extraction technology", "Tools", 50_000.0, 1.15, 200.0, Click, None),
            upgrade("quantum_digger", "Quantum Digger", "Harvests potatoes from parallel dimensions", "Futuristic", 1_000_000.0, 1.2, 2_000.0, Click, None),
            // Workers and machines
            upgrade("farm_hand", "Farm Hand", "A helpful worker to dig potatoes automatically", "Workers", 100.0, 1.15, 1.0, Auto, None),
            upgrade("potato_dog", "Potato Dog", "Trained to sniff out the best potatoes", "Workers", 500.0, 1.15, 5.0, Auto, None),
            upgrade("tractor", "Tractor", "Heavy machinery for serious potato farming", "Machines", 2_000.0, 1.15, 20.0, Auto, None),
            upgrade("potato_factory", "Processing Plant", "Industrial scale potato production", "Machines", 15_000.0, 1.15, 100.0, Auto, None),
            upgrade("robot_farmer", "Robot Farmers", "AI-powered 24/7 potato harvesting", "Machines", 100_000.0, 1.15, 500.0, Auto, None),
            upgrade("satellite_farm", "Orbital Farm", "Zero-gravity potato cultivation in space", "Futuristic", 1_000_000.0, 1.15, 2_500.0, Auto, None),
            upgrade("time_farm", "Time Farm", "Harvests potatoes from the past and future", "Futuristic", 50_000_000.0, 1.2, 15_000.0, Auto, None),
            // Luck
            upgrade("lucky_charm", "Lucky Charm", "Increases critical hit chance", "Luck", 5_000.0, 2.0, 0.02, Critical, Some(10)),
            upgrade("precision_tools", "Precision Tools", "Better tools for more critical hits", "Tools", 25_000.0, 2.5, 0.05, Critical, Some(5)),
            // Multipliers
            upgrade("golden_seeds", "Golden Seeds", "Rare seeds that boost all production", "Special", 10_000.0, 2.0, 0.1, Multiplier, Some(10)),
            upgrade("fertilizer", "Super Fertilizer", "Boosts all potato production significantly", "Special", 50_000.0, 2.5, 0.25, Multiplier, Some(5)),
            upgrade("weather_control", "Weather Control", "Perfect growing conditions all year", "Special", 500_000.0, 3.0, 0.5, Multiplier, Some(1)),
            // Special
            upgrade(AUTO_CLICKER_ID, "Auto Clicker", "Automatically clicks the potato for you", "Automation", 100_000.0, 3.0, 1.0, Special, Some(10)),
            upgrade("farm_expansion", "Farm Expansion", "Increases farm size and capacity", "Infrastructure", 250_000.0, 2.0, 1.0, Farm, Some(20)),
            upgrade("potato_university", "Potato University", "Research facility for advanced potato science", "Research", 1_000_000.0, 5.0, 100.0, Special, Some(1)),
        ]
    }

    pub fn create_achievements() -> Vec<AchievementDefinition> {
        use AchievementMetric::*;
        use RewardKind::*;
        vec![
            // Potato milestones
            achievement("first_potato", "First Harvest", "Dig your very first potato", "🌱", 1.0, Potatoes, ClickPower, 1.0),
            achievement("hundred_potatoes", "Small Farm", "Harvest 100 potatoes", "🏡", 100.0, Potatoes, Multiplier, 0.1),
            achievement("thousand_potatoes", "Growing Business", "Harvest 1,000 potatoes", "📈", 1_000.0, Potatoes, ClickPower, 5.0),
            achievement("ten_thousand_potatoes", "Potato Magnate", "Harvest 10,000 potatoes", "💰", 10_000.0, Potatoes, Multiplier, 0.2),
            achievement("hundred_thousand_potatoes", "Potato Empire", "Harvest 100,000 potatoes", "🏰", 100_000.0, Potatoes, CriticalChance, 0.05),
            achievement("million_potatoes", "Potato Millionaire", "Harvest 1,000,000 potatoes", "👑", 1_000_000.0, Potatoes, Multiplier, 0.5),
            achievement("billion_potatoes", "Potato Billionaire", "Harvest 1,000,000,000 potatoes", "💎", 1_000_000_000.0, Potatoes, Multiplier, 1.0),
            // Clicks
            achievement("hundred_clicks", "Clicking Novice", "Click the potato 100 times", "👆", 100.0, Clicks, ClickPower, 2.0),
            achievement("thousand_clicks", "Click Master", "Click the potato 1,000 times", "⚡", 1_000.0, Clicks, CriticalChance, 0.02),
            achievement("ten_thousand_clicks", "Click Legend", "Click the potato 10,000 times", "🔥", 10_000.0, Clicks, ClickPower, 25.0),
            // Upgrades
            achievement("first_upgrade", "Getting Better", "Purchase your first upgrade", "⬆", 1.0, Upgrades, Multiplier, 0.05),
            achievement("five_upgrades", "Tool Collector", "Own 5 different upgrades", "🛠", 5.0, Upgrades, ClickPower, 10.0),
            achievement("ten_upgrades", "Master Farmer", "Own 10 different upgrades", "🎖", 10.0, Upgrades, Multiplier, 0.3),
            achievement("twenty_upgrades", "Upgrade Addict", "Own 20 different upgrades", "🏆", 20.0, Upgrades, Multiplier, 0.5),
            // Golden potatoes
            achievement("first_golden", "Golden Discovery", "Find your first golden potato", "🏆", 1.0, Golden, Multiplier, 0.1),
            achievement("ten_golden", "Golden Collector", "Find 10 golden potatoes", "✨", 10.0, Golden, CriticalChance, 0.03),
            achievement("hundred_golden", "Golden Master", "Find 100 golden potatoes", "👑", 100.0, Golden, Multiplier, 1.0),
            // Levels
            achievement("level_10", "Experienced Farmer", "Reach level 10", "🎯", 10.0, Level, ResearchPoints, 50.0),
            achievement("level_25", "Veteran Farmer", "Reach level 25", "🏅", 25.0, Level, Multiplier, 0.5),
            achievement("level_50", "Legendary Farmer", "Reach level 50", "⭐", 50.0, Level, Multiplier, 1.0),
            // Playtime
            achievement("one_hour", "Dedicated Farmer", "Play for 1 hour", "⏰", 3_600.0, Playtime, ClickPower, 10.0),
            achievement("ten_hours", "Potato Enthusiast", "Play for 10 hours", "🕐", 36_000.0, Playtime, Multiplier, 0.5),
            achievement("hundred_hours", "Potato Addict", "Play for 100 hours", "🏆", 360_000.0, Playtime, Multiplier, 2.0),
        ]
    }
}

#[allow(clippy::too_many_arguments)]
fn upgrade(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    cost: f64,
    cost_multiplier: f64,
    effect: f64,
    kind: UpgradeKind,
    max_owned: Option<u32>,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id,
        name,
        description,
        category,
        base_cost: cost,
        cost,
        cost_multiplier,
        effect,
        kind,
        owned: 0,
        max_owned,
    }
}

#[allow(clippy::too_many_arguments)]
fn achievement(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    requirement: f64,
    metric: AchievementMetric,
    reward_kind: RewardKind,
    reward_value: f64,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        name,
        description,
        icon,
        requirement,
        metric,
        unlocked: false,
        reward: Some(Reward {
            kind: reward_kind,
            value: reward_value,
        }),
    }
}
