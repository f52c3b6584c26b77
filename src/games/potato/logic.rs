//! Potato Land economy engine: in-place transforms of `ProgressionState`.
//!
//! Every operation is total: a rejected intent leaves the state untouched
//! and reports `false` / `None`.

use rand::rngs::SmallRng;
use rand::Rng;

use super::catalog::{Catalog, UpgradeKind, AUTO_CLICKER_ID};
use super::state::{ClickOutcome, ProgressionState, RareTier, INITIAL_CRITICAL_CHANCE};

/// Lifetime potatoes needed before a prestige is allowed.
pub const PRESTIGE_THRESHOLD: f64 = 1_000_000.0;
/// Share of every gain that becomes experience.
const EXPERIENCE_RATE: f64 = 0.1;

/// Source of uniform draws in [0, 1).
pub trait Roller {
    fn roll(&mut self) -> f64;
}

impl Roller for SmallRng {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Resolve one click. Draws four rolls in order: critical, then one per rare
/// tier (rarest first). The first rare tier that hits wins.
pub fn click<R: Roller>(state: &mut ProgressionState, roller: &mut R) -> ClickOutcome {
    let base_gain = state.base_click_gain();
    let is_critical = roller.roll() < state.critical_chance;
    let gain = if is_critical {
        base_gain * state.critical_multiplier
    } else {
        base_gain
    };

    let mut tier = None;
    for candidate in RareTier::all() {
        let hit = roller.roll() < candidate.probability();
        if hit && tier.is_none() {
            tier = Some(*candidate);
        }
    }
    let bonus = tier.map_or(0.0, |t| gain * t.bonus_factor());
    let total_gain = gain + bonus;

    state.earn(total_gain);
    state.total_clicks += 1;
    state.experience += total_gain * EXPERIENCE_RATE;
    match tier {
        Some(RareTier::Rainbow) => state.rainbow_potatoes += 1,
        Some(RareTier::Diamond) => state.diamond_potatoes += 1,
        Some(RareTier::Golden) => state.golden_potatoes += 1,
        None => {}
    }

    ClickOutcome {
        total_gain,
        is_critical,
        tier,
    }
}

/// Passive production over `seconds`. Returns the amount produced.
pub fn produce(state: &mut ProgressionState, seconds: f64) -> f64 {
    if seconds <= 0.0 {
        return 0.0;
    }
    let production = state.effective_production() * seconds;
    if production > 0.0 {
        state.earn(production);
        state.experience += production * EXPERIENCE_RATE;
    }
    production
}

/// Consume experience into levels. Returns the number of levels gained.
pub fn apply_level_ups(state: &mut ProgressionState) -> u32 {
    let mut gained = 0;
    while state.experience >= state.required_experience() {
        let level = state.level;
        state.experience -= state.required_experience();
        state.research_points += level as u64;
        state.click_power += (level / 5) as f64;
        state.level = level + 1;
        gained += 1;
    }
    gained
}

/// True if `id` exists, is below its cap and is affordable.
pub fn can_buy(state: &ProgressionState, catalog: &Catalog, id: &str) -> bool {
    catalog
        .upgrade(id)
        .map_or(false, |u| !u.is_maxed() && state.potatoes >= u.cost)
}

/// Try to buy one unit of upgrade `id`. Returns true if successful.
pub fn buy_upgrade(state: &mut ProgressionState, catalog: &mut Catalog, id: &str) -> bool {
    if !can_buy(state, catalog, id) {
        return false;
    }
    let Some(upgrade) = catalog.upgrade_mut(id) else {
        return false;
    };

    state.potatoes -= upgrade.cost;
    match upgrade.kind {
        UpgradeKind::Click => state.click_power += upgrade.effect,
        UpgradeKind::Auto => state.potatoes_per_second += upgrade.effect,
        UpgradeKind::Multiplier => state.multiplier += upgrade.effect,
        UpgradeKind::Critical => state.add_critical_chance(upgrade.effect),
        UpgradeKind::Farm => state.farm_size += upgrade.effect,
        UpgradeKind::Special => {}
    }
    if upgrade.id == AUTO_CLICKER_ID {
        state.auto_clicker_level += 1;
    }
    upgrade.owned += 1;
    upgrade.cost = (upgrade.cost * upgrade.cost_multiplier).floor();
    true
}

/// Prestige points a reset would award right now.
pub fn pending_prestige(state: &ProgressionState) -> u64 {
    if state.total_potatoes < PRESTIGE_THRESHOLD {
        return 0;
    }
    (state.total_potatoes / PRESTIGE_THRESHOLD).floor() as u64
}

/// Perform a prestige reset. Returns the points gained, or None if the
/// threshold has not been reached.
pub fn prestige(state: &mut ProgressionState, catalog: &mut Catalog, now_ms: u64) -> Option<u64> {
    let gain = pending_prestige(state);
    if gain == 0 {
        return None;
    }
    let points = gain as f64;

    state.potatoes = 0.0;
    state.total_potatoes = 0.0;
    state.potatoes_per_second = 0.0;
    state.click_power = 1.0;
    state.golden_potatoes = 0;
    state.diamond_potatoes = 0;
    state.rainbow_potatoes = 0;
    state.experience = 0.0;
    state.auto_clicker_level = 0;
    state.farm_size = 1.0;
    state.weather_bonus = 1.0;
    state.season_bonus = 1.0;

    state.prestige += gain;
    state.prestige_bonus += points * 0.1;
    state.research_points += gain * 10;
    state.multiplier = 1.0 + points * 0.05;
    state.critical_chance = (INITIAL_CRITICAL_CHANCE + points * 0.01).clamp(0.0, 1.0);
    state.critical_multiplier = 2.0 + points * 0.1;
    state.level = (state.level / 2).max(1);
    state.last_save = now_ms;

    catalog.reset_upgrades();
    Some(gain)
}

/// Auto-clicker period in milliseconds; None while no auto-clicker is owned.
pub fn auto_click_interval_ms(level: u32) -> Option<u32> {
    if level == 0 {
        return None;
    }
    Some(1000u32.saturating_sub(level.saturating_mul(50)).max(100))
}

/// Format a number with comma separators.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0.05 && int_part < 1000 {
        format!("{}.{}", result, ((frac * 10.0).floor() as u8).min(9))
    } else {
        result
    }
}

/// Short form with a magnitude suffix: 1.2K, 3.4M, 5.6B, 7.8T.
pub fn format_compact(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_compact(-n));
    }
    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in SUFFIXES {
        if n >= scale {
            return format!("{:.1}{}", n / scale, suffix);
        }
    }
    format_number(n)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Roller;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of rolls; 1.0 (never a hit) once exhausted.
    pub struct ScriptedRolls(VecDeque<f64>);

    impl ScriptedRolls {
        pub fn new(rolls: &[f64]) -> Self {
            Self(rolls.iter().copied().collect())
        }

        /// Rolls that never hit anything.
        pub fn misses() -> Self {
            Self::new(&[])
        }
    }

    impl Roller for ScriptedRolls {
        fn roll(&mut self) -> f64 {
            self.0.pop_front().unwrap_or(1.0)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::testing::ScriptedRolls;
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Intent {
        Click(f64, f64),
        Produce(u32),
        Buy(usize),
        Prestige,
    }

    fn arb_intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            (0.0f64..1.0, 0.0f64..1.0).prop_map(|(a, b)| Intent::Click(a, b)),
            (1u32..600).prop_map(Intent::Produce),
            (0usize..20).prop_map(Intent::Buy),
            Just(Intent::Prestige),
        ]
    }

    proptest! {
        #[test]
        fn prop_format_number_commas(int_val in 0u64..1_000_000_000) {
            let s = format_number(int_val as f64);
            let stripped: String = s.chars().filter(|c| *c != ',').collect();
            prop_assert_eq!(stripped, int_val.to_string());
        }

        #[test]
        fn prop_buy_never_goes_negative(potatoes in 0.0f64..2e6, idx in 0usize..20) {
            let mut s = ProgressionState::new(0);
            let mut c = Catalog::new();
            s.potatoes = potatoes;
            let id = c.upgrades[idx].id;
            let cost = c.upgrades[idx].cost;
            let bought = buy_upgrade(&mut s, &mut c, id);
            prop_assert!(s.potatoes >= 0.0);
            prop_assert_eq!(bought, potatoes >= cost);
        }

        #[test]
        fn prop_prestige_iff_threshold(total in 0.0f64..5e6) {
            let mut s = ProgressionState::new(0);
            let mut c = Catalog::new();
            s.total_potatoes = total;
            let result = prestige(&mut s, &mut c, 0);
            prop_assert_eq!(result.is_some(), total >= PRESTIGE_THRESHOLD);
        }

        #[test]
        fn prop_counters_are_monotonic(
            intents in prop::collection::vec(arb_intent(), 1..80),
            start in 0.0f64..3e6,
        ) {
            let mut s = ProgressionState::new(0);
            let mut c = Catalog::new();
            s.potatoes = start;
            s.total_potatoes = start;
            s.potatoes_per_second = 50.0;
            for intent in intents {
                let before = s.clone();
                let mut prestiged = false;
                match intent {
                    Intent::Click(a, b) => {
                        click(&mut s, &mut ScriptedRolls::new(&[a, b, b, b]));
                    }
                    Intent::Produce(ticks) => {
                        produce(&mut s, ticks as f64 / 10.0);
                    }
                    Intent::Buy(idx) => {
                        let id = c.upgrades[idx].id;
                        buy_upgrade(&mut s, &mut c, id);
                    }
                    Intent::Prestige => {
                        prestiged = prestige(&mut s, &mut c, 0).is_some();
                    }
                }
                apply_level_ups(&mut s);
                prop_assert!(s.potatoes >= 0.0);
                prop_assert!(s.total_clicks >= before.total_clicks);
                prop_assert!(s.prestige >= before.prestige);
                prop_assert!(s.prestige_bonus >= before.prestige_bonus);
                prop_assert!((0.0..=1.0).contains(&s.critical_chance));
                if !prestiged {
                    prop_assert!(s.total_potatoes >= before.total_potatoes);
                    prop_assert!(s.level >= before.level);
                }
            }
        }
    }
}
