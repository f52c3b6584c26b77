//! Achievement evaluation: unlock, reward once, report.

use super::catalog::{AchievementDefinition, AchievementMetric, Catalog, Reward, RewardKind};
use super::state::{Effect, ProgressionState};

/// Current value of the metric an achievement is measured against.
pub fn metric_value(state: &ProgressionState, catalog: &Catalog, metric: AchievementMetric) -> f64 {
    match metric {
        AchievementMetric::Potatoes => state.total_potatoes,
        AchievementMetric::Clicks => state.total_clicks as f64,
        AchievementMetric::Upgrades => catalog.distinct_owned() as f64,
        AchievementMetric::Golden => state.golden_potatoes as f64,
        AchievementMetric::Level => state.level as f64,
        AchievementMetric::Playtime => state.playtime as f64,
        AchievementMetric::Prestige => state.prestige as f64,
    }
}

/// Progress towards `achievement` in [0, 1].
pub fn progress(state: &ProgressionState, catalog: &Catalog, achievement: &AchievementDefinition) -> f64 {
    if state.achievements.contains(achievement.id) {
        return 1.0;
    }
    if achievement.requirement <= 0.0 {
        return 1.0;
    }
    (metric_value(state, catalog, achievement.metric) / achievement.requirement).clamp(0.0, 1.0)
}

fn apply_reward(state: &mut ProgressionState, reward: &Reward) {
    match reward.kind {
        RewardKind::ClickPower => state.click_power += reward.value,
        RewardKind::Multiplier => state.multiplier += reward.value,
        RewardKind::CriticalChance => state.add_critical_chance(reward.value),
        RewardKind::ResearchPoints => state.research_points += reward.value.max(0.0) as u64,
    }
}

/// Unlock every achievement whose requirement is met for the first time.
///
/// The id goes into `state.achievements` in the same step the reward is
/// applied, so a second pass can never pay it again.
pub fn evaluate(state: &mut ProgressionState, catalog: &mut Catalog) -> Vec<Effect> {
    let mut effects = Vec::new();
    for idx in 0..catalog.achievements.len() {
        let (id, name, metric, requirement, reward) = {
            let a = &catalog.achievements[idx];
            (a.id, a.name, a.metric, a.requirement, a.reward)
        };
        if state.achievements.contains(id) {
            continue;
        }
        if metric_value(state, catalog, metric) < requirement {
            continue;
        }
        state.achievements.insert(id.to_string());
        catalog.achievements[idx].unlocked = true;
        if let Some(reward) = reward {
            apply_reward(state, &reward);
        }
        log::debug!("achievement unlocked: {}", id);
        effects.push(Effect::AchievementUnlocked { id, name });
    }
    effects
}

/// Copy unlock flags from the state's id set into the catalog.
pub fn sync_unlocked_flags(state: &ProgressionState, catalog: &mut Catalog) {
    for a in &mut catalog.achievements {
        a.unlocked = state.achievements.contains(a.id);
    }
}
