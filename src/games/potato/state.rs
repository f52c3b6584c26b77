//! Potato Land progression state: the single record a save consists of.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const INITIAL_CRITICAL_CHANCE: f64 = 0.05;
pub const INITIAL_CRITICAL_MULTIPLIER: f64 = 2.0;
/// Feature flag every new save starts with.
pub const BASIC_CLICKING: &str = "basic_clicking";

/// One player's progress.
///
/// Field names serialize in camelCase so the JSON snapshot keeps the layout
/// older browser saves used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub potatoes: f64,
    /// Lifetime potatoes for the current run. Only prestige resets it.
    pub total_potatoes: f64,
    pub potatoes_per_second: f64,
    pub golden_potatoes: u64,
    pub diamond_potatoes: u64,
    pub rainbow_potatoes: u64,

    pub click_power: f64,
    pub multiplier: f64,
    /// Always within [0, 1].
    pub critical_chance: f64,
    pub critical_multiplier: f64,

    pub prestige: u64,
    pub prestige_bonus: f64,

    pub level: u32,
    pub experience: f64,

    pub auto_clicker_level: u32,

    pub farm_size: f64,
    pub weather_bonus: f64,
    pub season_bonus: f64,

    pub total_clicks: u64,
    /// Seconds played.
    pub playtime: u64,
    /// Unix milliseconds of the last save.
    pub last_save: u64,
    pub research_points: u64,
    pub unlocked_features: BTreeSet<String>,
    /// Ids of unlocked achievements. Membership means the reward was paid.
    pub achievements: BTreeSet<String>,
}

impl ProgressionState {
    pub fn new(now_ms: u64) -> Self {
        let mut unlocked_features = BTreeSet::new();
        unlocked_features.insert(BASIC_CLICKING.to_string());
        Self {
            potatoes: 0.0,
            total_potatoes: 0.0,
            potatoes_per_second: 0.0,
            golden_potatoes: 0,
            diamond_potatoes: 0,
            rainbow_potatoes: 0,
            click_power: 1.0,
            multiplier: 1.0,
            critical_chance: INITIAL_CRITICAL_CHANCE,
            critical_multiplier: INITIAL_CRITICAL_MULTIPLIER,
            prestige: 0,
            prestige_bonus: 1.0,
            level: 1,
            experience: 0.0,
            auto_clicker_level: 0,
            farm_size: 1.0,
            weather_bonus: 1.0,
            season_bonus: 1.0,
            total_clicks: 0,
            playtime: 0,
            last_save: now_ms,
            research_points: 0,
            unlocked_features,
            achievements: BTreeSet::new(),
        }
    }

    /// Experience needed to leave the current level.
    pub fn required_experience(&self) -> f64 {
        self.level as f64 * 1000.0
    }

    /// Potatoes a manual click yields before critical and rare bonuses.
    pub fn base_click_gain(&self) -> f64 {
        self.click_power * self.prestige_bonus * self.multiplier
    }

    /// Passive production per second after global modifiers.
    pub fn effective_production(&self) -> f64 {
        self.potatoes_per_second * self.weather_bonus * self.season_bonus * self.multiplier
    }

    /// Add to critical chance, keeping it inside [0, 1].
    pub fn add_critical_chance(&mut self, amount: f64) {
        self.critical_chance = (self.critical_chance + amount).clamp(0.0, 1.0);
    }

    /// Credit potatoes earned (click, production or offline catch-up).
    pub fn earn(&mut self, amount: f64) {
        self.potatoes += amount;
        self.total_potatoes += amount;
    }
}

/// Rare click outcomes, rarest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RareTier {
    Rainbow,
    Diamond,
    Golden,
}

impl RareTier {
    /// Evaluation order: the first tier whose roll hits wins.
    pub fn all() -> &'static [RareTier] {
        &[RareTier::Rainbow, RareTier::Diamond, RareTier::Golden]
    }

    pub fn probability(&self) -> f64 {
        match self {
            RareTier::Rainbow => 0.000_01,
            RareTier::Diamond => 0.000_1,
            RareTier::Golden => 0.001,
        }
    }

    /// Bonus as a multiple of the (possibly critical) click gain.
    pub fn bonus_factor(&self) -> f64 {
        match self {
            RareTier::Rainbow => 1000.0,
            RareTier::Diamond => 100.0,
            RareTier::Golden => 10.0,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RareTier::Rainbow => "レインボーポテト",
            RareTier::Diamond => "ダイヤモンドポテト",
            RareTier::Golden => "ゴールデンポテト",
        }
    }
}

/// What a single click produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickOutcome {
    pub total_gain: f64,
    pub is_critical: bool,
    pub tier: Option<RareTier>,
}

/// Transient notifications for the presentation layer. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LevelUp { level: u32 },
    AchievementUnlocked { id: &'static str, name: &'static str },
    CriticalHit { gain: f64 },
    RarePotato { tier: RareTier, gain: f64 },
    UpgradePurchased { id: &'static str, name: &'static str },
    Prestiged { gain: u64 },
    OfflineProgress { seconds: u64, gain: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_values() {
        let s = ProgressionState::new(1_000);
        assert!((s.click_power - 1.0).abs() < 0.001);
        assert!((s.prestige_bonus - 1.0).abs() < 0.001);
        assert!((s.critical_chance - 0.05).abs() < 0.001);
        assert!((s.critical_multiplier - 2.0).abs() < 0.001);
        assert_eq!(s.level, 1);
        assert_eq!(s.last_save, 1_000);
        assert!(s.unlocked_features.contains(BASIC_CLICKING));
        assert!(s.achievements.is_empty());
    }

    #[test]
    fn required_experience_scales_with_level() {
        let mut s = ProgressionState::new(0);
        assert!((s.required_experience() - 1000.0).abs() < 0.001);
        s.level = 7;
        assert!((s.required_experience() - 7000.0).abs() < 0.001);
    }

    #[test]
    fn base_click_gain_multiplies_modifiers() {
        let mut s = ProgressionState::new(0);
        s.click_power = 3.0;
        s.prestige_bonus = 1.5;
        s.multiplier = 2.0;
        assert!((s.base_click_gain() - 9.0).abs() < 0.001);
    }

    #[test]
    fn effective_production_ignores_prestige_bonus() {
        let mut s = ProgressionState::new(0);
        s.potatoes_per_second = 10.0;
        s.weather_bonus = 2.0;
        s.season_bonus = 1.5;
        s.multiplier = 2.0;
        s.prestige_bonus = 100.0;
        assert!((s.effective_production() - 60.0).abs() < 0.001);
    }

    #[test]
    fn critical_chance_is_clamped() {
        let mut s = ProgressionState::new(0);
        s.add_critical_chance(5.0);
        assert!((s.critical_chance - 1.0).abs() < f64::EPSILON);
        s.add_critical_chance(-7.0);
        assert!(s.critical_chance.abs() < f64::EPSILON);
    }

    #[test]
    fn rare_tiers_are_ordered_rarest_first() {
        let tiers = RareTier::all();
        for pair in tiers.windows(2) {
            assert!(pair[0].probability() < pair[1].probability());
            assert!(pair[0].bonus_factor() > pair[1].bonus_factor());
        }
    }

    #[test]
    fn json_uses_camel_case() {
        let s = ProgressionState::new(0);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"totalPotatoes\""));
        assert!(json.contains("\"criticalChance\""));
        assert!(json.contains("\"unlockedFeatures\":[\"basic_clicking\"]"));
    }
}
