//! The single writer: owns state, catalog and randomness, and turns intents
//! and ticks into state changes plus a queue of Effects.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::achievements;
use super::catalog::Catalog;
use super::logic::{self, Roller};
use super::state::{ClickOutcome, Effect, ProgressionState};

/// Simulation rate: one tick is 100 ms.
pub const TICKS_PER_SECOND: u32 = 10;
const MS_PER_TICK: u32 = 1000 / TICKS_PER_SECOND;

pub struct Farm<R: Roller = SmallRng> {
    pub state: ProgressionState,
    pub catalog: Catalog,
    roller: R,
    effects: Vec<Effect>,
    /// Ticks accumulated towards the next playtime second.
    playtime_ticks: u32,
    /// Milliseconds accumulated towards the next auto-click.
    auto_click_ms: u32,
}

impl Farm<SmallRng> {
    /// A fresh game, seeded from the clock.
    pub fn new(now_ms: u64) -> Self {
        Self::with_roller(
            ProgressionState::new(now_ms),
            Catalog::new(),
            SmallRng::seed_from_u64(now_ms),
        )
    }
}

impl<R: Roller> Farm<R> {
    pub fn with_roller(state: ProgressionState, catalog: Catalog, roller: R) -> Self {
        let mut farm = Self {
            state,
            catalog,
            roller,
            effects: Vec::new(),
            playtime_ticks: 0,
            auto_click_ms: 0,
        };
        achievements::sync_unlocked_flags(&farm.state, &mut farm.catalog);
        farm
    }

    /// Replace state and catalog wholesale (load, import, delete).
    pub fn restore(&mut self, state: ProgressionState, catalog: Catalog) {
        self.state = state;
        self.catalog = catalog;
        self.playtime_ticks = 0;
        self.auto_click_ms = 0;
        achievements::sync_unlocked_flags(&self.state, &mut self.catalog);
        self.settle();
    }

    /// Queue an Effect produced outside the engine (offline catch-up).
    pub fn push_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Take every Effect produced since the last drain.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Dig once. Automated clicks only report rare finds.
    pub fn click(&mut self, automated: bool) -> ClickOutcome {
        let outcome = logic::click(&mut self.state, &mut self.roller);
        if outcome.is_critical && !automated {
            self.effects.push(Effect::CriticalHit {
                gain: outcome.total_gain,
            });
        }
        if let Some(tier) = outcome.tier {
            self.effects.push(Effect::RarePotato {
                tier,
                gain: outcome.total_gain,
            });
        }
        self.settle();
        outcome
    }

    pub fn buy(&mut self, id: &str) -> bool {
        if !logic::buy_upgrade(&mut self.state, &mut self.catalog, id) {
            return false;
        }
        if let Some(upgrade) = self.catalog.upgrade(id) {
            self.effects.push(Effect::UpgradePurchased {
                id: upgrade.id,
                name: upgrade.name,
            });
        }
        self.settle();
        true
    }

    pub fn prestige(&mut self, now_ms: u64) -> Option<u64> {
        let gain = logic::prestige(&mut self.state, &mut self.catalog, now_ms)?;
        self.auto_click_ms = 0;
        log::info!("prestige: +{} (total {})", gain, self.state.prestige);
        self.effects.push(Effect::Prestiged { gain });
        self.settle();
        Some(gain)
    }

    /// Advance the simulation by `delta_ticks` ticks.
    pub fn tick(&mut self, delta_ticks: u32) {
        for _ in 0..delta_ticks {
            logic::produce(&mut self.state, 1.0 / TICKS_PER_SECOND as f64);

            self.playtime_ticks += 1;
            if self.playtime_ticks >= TICKS_PER_SECOND {
                self.playtime_ticks -= TICKS_PER_SECOND;
                self.state.playtime += 1;
            }

            match logic::auto_click_interval_ms(self.state.auto_clicker_level) {
                Some(interval) => {
                    self.auto_click_ms += MS_PER_TICK;
                    while self.auto_click_ms >= interval {
                        self.auto_click_ms -= interval;
                        self.click(true);
                    }
                }
                None => self.auto_click_ms = 0,
            }

            self.settle();
        }
    }

    /// Level-ups then achievements, after any change to the state.
    fn settle(&mut self) {
        let from = self.state.level;
        let gained = logic::apply_level_ups(&mut self.state);
        for level in from + 1..=from + gained {
            self.effects.push(Effect::LevelUp { level });
        }
        let unlocked = achievements::evaluate(&mut self.state, &mut self.catalog);
        self.effects.extend(unlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::potato::catalog::AUTO_CLICKER_ID;
    use crate::games::potato::logic::testing::ScriptedRolls;
    use crate::games::potato::state::RareTier;

    fn farm() -> Farm<ScriptedRolls> {
        Farm::with_roller(ProgressionState::new(0), Catalog::new(), ScriptedRolls::misses())
    }

    #[test]
    fn first_click_unlocks_first_harvest() {
        let mut f = farm();
        f.click(false);
        let effects = f.drain_effects();
        assert!(effects.contains(&Effect::AchievementUnlocked {
            id: "first_potato",
            name: "First Harvest"
        }));
        assert!(f.drain_effects().is_empty());
    }

    #[test]
    fn manual_critical_is_reported() {
        let mut f = Farm::with_roller(
            ProgressionState::new(0),
            Catalog::new(),
            ScriptedRolls::new(&[0.0]),
        );
        f.click(false);
        assert!(f
            .drain_effects()
            .contains(&Effect::CriticalHit { gain: 2.0 }));
    }

    #[test]
    fn automated_critical_is_silent_but_rare_is_not() {
        let mut f = Farm::with_roller(
            ProgressionState::new(0),
            Catalog::new(),
            ScriptedRolls::new(&[0.0, 0.5, 0.5, 0.0]),
        );
        f.click(true);
        let effects = f.drain_effects();
        assert!(!effects.iter().any(|e| matches!(e, Effect::CriticalHit { .. })));
        assert!(effects.contains(&Effect::RarePotato {
            tier: RareTier::Golden,
            gain: 22.0
        }));
    }

    #[test]
    fn tick_produces_and_counts_playtime() {
        let mut f = farm();
        f.state.potatoes_per_second = 10.0;
        f.tick(25);
        assert!((f.state.potatoes - 25.0).abs() < 0.001);
        assert_eq!(f.state.playtime, 2);
        f.tick(5);
        assert_eq!(f.state.playtime, 3);
    }

    #[test]
    fn zero_ticks_is_noop() {
        let mut f = farm();
        f.state.potatoes_per_second = 10.0;
        f.tick(0);
        assert!(f.state.potatoes.abs() < f64::EPSILON);
    }

    #[test]
    fn auto_clicker_fires_on_interval() {
        let mut f = farm();
        f.state.potatoes = 100_000.0;
        assert!(f.buy(AUTO_CLICKER_ID));
        // 950 ms interval: ten ticks is one auto-click
        f.tick(9);
        assert_eq!(f.state.total_clicks, 0);
        f.tick(1);
        assert_eq!(f.state.total_clicks, 1);
        f.tick(19);
        assert_eq!(f.state.total_clicks, 3);
    }

    #[test]
    fn buy_reports_purchase_and_first_upgrade() {
        let mut f = farm();
        f.state.potatoes = 15.0;
        assert!(f.buy("better_shovel"));
        let effects = f.drain_effects();
        assert!(effects.contains(&Effect::UpgradePurchased {
            id: "better_shovel",
            name: "Better Shovel"
        }));
        assert!(effects.contains(&Effect::AchievementUnlocked {
            id: "first_upgrade",
            name: "Getting Better"
        }));
        assert!(!f.buy("better_shovel"));
    }

    #[test]
    fn level_up_effects_per_level() {
        let mut f = farm();
        f.state.experience = 3500.0;
        f.tick(1);
        let levels: Vec<u32> = f
            .drain_effects()
            .into_iter()
            .filter_map(|e| match e {
                Effect::LevelUp { level } => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 3]);
    }

    #[test]
    fn prestige_emits_effect() {
        let mut f = farm();
        f.state.total_potatoes = 3_000_000.0;
        assert_eq!(f.prestige(99), Some(3));
        assert!(f.drain_effects().contains(&Effect::Prestiged { gain: 3 }));
        assert_eq!(f.prestige(100), None);
    }

    #[test]
    fn first_prestige_multiplier_is_fresh() {
        let mut f = farm();
        f.state.total_potatoes = 1_000_000.0;
        f.state.multiplier = 1.5;
        f.state.achievements.insert("million_potatoes".to_string());
        assert_eq!(f.prestige(1), Some(1));
        assert!((f.state.multiplier - 1.05).abs() < 0.001, "got {}", f.state.multiplier);
        assert!(!f
            .drain_effects()
            .iter()
            .any(|e| matches!(e, Effect::AchievementUnlocked { .. })));
    }

    #[test]
    fn restore_syncs_achievement_flags() {
        let mut f = farm();
        let mut s = ProgressionState::new(0);
        s.achievements.insert("hundred_clicks".to_string());
        s.total_clicks = 150;
        f.restore(s, Catalog::new());
        let flag = f
            .catalog
            .achievements
            .iter()
            .find(|a| a.id == "hundred_clicks")
            .unwrap()
            .unlocked;
        assert!(flag);
        // already rewarded, so no second payout
        assert!((f.state.click_power - 1.0).abs() < 0.001);
    }
}
