//! Potato Land: an incremental potato farming game.

pub mod achievements;
pub mod actions;
pub mod catalog;
pub mod farm;
pub mod logic;
pub mod render;
pub mod save;
pub mod settings;
pub mod simulator;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time;

use catalog::Catalog;
use farm::Farm;
use save::{SaveError, SaveStore};
use settings::Settings;
use state::{Effect, ProgressionState};

/// Log panel capacity.
pub const MAX_LOG: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Farm,
    Shop,
    Goals,
    Stats,
    Settings,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Farm, Tab::Shop, Tab::Goals, Tab::Stats, Tab::Settings]
    }

    fn next(self) -> Tab {
        let tabs = Self::all();
        let idx = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }
}

pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct PotatoGame {
    pub farm: Farm,
    pub settings: Settings,
    pub tab: Tab,
    pub log: Vec<LogEntry>,
    /// Ticks left on the dig button highlight.
    pub dig_flash: u32,
    autosave_ticks: u32,
    store: Box<dyn SaveStore>,
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> Box<dyn SaveStore> {
    Box::new(save::LocalStore)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> Box<dyn SaveStore> {
    Box::new(save::MemoryStore::default())
}

impl PotatoGame {
    pub fn new() -> Self {
        Self::with_store(default_store(), time::now_ms())
    }

    /// Start from whatever `store` holds, crediting offline progress.
    pub fn with_store(store: Box<dyn SaveStore>, now_ms: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let mut game = Self {
            farm: Farm::new(now_ms),
            settings,
            tab: Tab::Farm,
            log: Vec::new(),
            dig_flash: 0,
            autosave_ticks: 0,
            store,
        };
        match save::load_game(game.store.as_ref(), now_ms) {
            Some(loaded) => {
                game.farm.restore(loaded.state, loaded.catalog);
                if let Some(offline) = loaded.offline {
                    game.farm.push_effect(offline);
                }
                game.add_log("🥔 おかえりなさい！農場を再開します", false);
            }
            None => game.add_log("🥔 ポテトランドへようこそ！ [C] で掘ろう", false),
        }
        game.flush_effects();
        game
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    fn describe(&self, effect: &Effect) -> (String, bool) {
        let fmt = |n: f64| self.settings.format(n);
        match effect {
            Effect::LevelUp { level } => (format!("⬆ レベル {} に到達！", level), true),
            Effect::AchievementUnlocked { id, name } => {
                let reward = self
                    .farm
                    .catalog
                    .achievements
                    .iter()
                    .find(|a| a.id == *id)
                    .and_then(|a| a.reward)
                    .map(|r| format!(" ({})", r.describe()))
                    .unwrap_or_default();
                (format!("🏆 実績解除: {}{}", name, reward), true)
            }
            Effect::CriticalHit { gain } => (format!("💥 クリティカル！ +{}", fmt(*gain)), false),
            Effect::RarePotato { tier, gain } => {
                (format!("✨ {} を発見！ +{}", tier.name(), fmt(*gain)), true)
            }
            Effect::UpgradePurchased { id, name } => {
                let owned = self.farm.catalog.upgrade(id).map_or(0, |u| u.owned);
                (format!("{} を購入！ ({}個)", name, owned), false)
            }
            Effect::Prestiged { gain } => (
                format!("🌟 転生しました！ プレステージ +{} (合計 {})", gain, self.farm.state.prestige),
                true,
            ),
            Effect::OfflineProgress { seconds, gain } => (
                format!(
                    "💤 留守中に {} 個収穫しました ({}分)",
                    fmt(*gain),
                    seconds / 60
                ),
                true,
            ),
        }
    }

    /// Move queued Effects into the log panel.
    fn flush_effects(&mut self) {
        for effect in self.farm.drain_effects() {
            log::debug!("effect: {:?}", effect);
            let always = matches!(effect, Effect::Prestiged { .. } | Effect::OfflineProgress { .. });
            if !self.settings.notifications && !always {
                continue;
            }
            let (text, important) = self.describe(&effect);
            self.add_log(&text, important);
        }
    }

    fn dig(&mut self) {
        self.farm.click(false);
        self.dig_flash = 3;
    }

    fn buy_index(&mut self, idx: usize) {
        let Some(id) = self.farm.catalog.upgrades.get(idx).map(|u| u.id) else {
            return;
        };
        self.farm.buy(id);
    }

    fn try_prestige(&mut self) {
        let now = time::now_ms();
        if self.farm.prestige(now).is_some() {
            self.flush_effects();
            self.save_now(true);
        } else {
            self.add_log("⚠ 転生には累計 1,000,000 個の収穫が必要です", true);
        }
    }

    /// Write the save. `announce` adds a log line on success.
    pub fn save_now(&mut self, announce: bool) {
        let now = time::now_ms();
        let result = save::save_game(
            self.store.as_ref(),
            &mut self.farm.state,
            &self.farm.catalog,
            now,
        );
        match result {
            Ok(()) => {
                log::debug!("saved at {}", now);
                if announce {
                    self.add_log("💾 セーブしました", false);
                }
            }
            Err(e) => {
                log::warn!("Potato Land: セーブに失敗: {e}");
                self.add_log("⚠ セーブに失敗しました", true);
            }
        }
    }

    pub fn export_json(&self) -> Result<String, SaveError> {
        save::export_json(&self.farm.state, &self.farm.catalog)
    }

    /// Replace the current game with an exported one. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<(), SaveError> {
        let (state, catalog) = save::decode(json)?;
        self.farm.restore(state, catalog);
        self.farm.drain_effects();
        log::info!("Potato Land: インポート完了 (level {})", self.farm.state.level);
        self.add_log("📥 セーブデータを読み込みました", true);
        self.save_now(false);
        Ok(())
    }

    /// Remove the stored save and start over. Settings are kept.
    pub fn reset(&mut self) {
        if let Err(e) = save::delete_save(self.store.as_ref()) {
            log::warn!("Potato Land: セーブの削除に失敗: {e}");
        }
        self.farm
            .restore(ProgressionState::new(time::now_ms()), Catalog::new());
        self.farm.drain_effects();
        self.autosave_ticks = 0;
        self.add_log("🗑 セーブデータを削除しました", true);
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings.save(self.store.as_ref()) {
            log::warn!("Potato Land: 設定の保存に失敗: {e}");
        }
    }

    fn toggle(&mut self, action: u16) {
        match action {
            actions::TOGGLE_NOTIFICATIONS => {
                self.settings.notifications = !self.settings.notifications
            }
            actions::TOGGLE_COMPACT => self.settings.compact_numbers = !self.settings.compact_numbers,
            actions::TOGGLE_AUTOSAVE => self.settings.autosave = !self.settings.autosave,
            _ => return,
        }
        self.save_settings();
    }

    #[cfg(target_arch = "wasm32")]
    fn export_dialog(&mut self) {
        match self.export_json() {
            Ok(json) => {
                save::dialog::prompt("セーブデータをコピーしてください", &json);
                self.add_log("📤 セーブデータを書き出しました", false);
            }
            Err(e) => log::warn!("Potato Land: エクスポートに失敗: {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export_dialog(&mut self) {
        match self.export_json() {
            Ok(json) => log::info!("{}", json),
            Err(e) => log::warn!("Potato Land: エクスポートに失敗: {e}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn import_dialog(&mut self) {
        let Some(json) = save::dialog::prompt("セーブデータを貼り付けてください", "") else {
            return;
        };
        if let Err(e) = self.import_json(&json) {
            log::warn!("Potato Land: インポートに失敗: {e}");
            self.add_log(&format!("⚠ 読み込めませんでした: {e}"), true);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn import_dialog(&mut self) {}

    #[cfg(target_arch = "wasm32")]
    fn delete_dialog(&mut self) {
        if save::dialog::confirm("セーブデータを削除して最初からやり直しますか？") {
            self.reset();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn delete_dialog(&mut self) {
        self.reset();
    }

    fn handle_click(&mut self, id: u16) -> bool {
        match id {
            actions::DIG => self.dig(),
            actions::PRESTIGE => self.try_prestige(),
            actions::SAVE => self.save_now(true),
            actions::TAB_FARM => self.tab = Tab::Farm,
            actions::TAB_SHOP => self.tab = Tab::Shop,
            actions::TAB_GOALS => self.tab = Tab::Goals,
            actions::TAB_STATS => self.tab = Tab::Stats,
            actions::TAB_SETTINGS => self.tab = Tab::Settings,
            actions::TOGGLE_NOTIFICATIONS | actions::TOGGLE_COMPACT | actions::TOGGLE_AUTOSAVE => {
                self.toggle(id)
            }
            actions::EXPORT_SAVE => self.export_dialog(),
            actions::IMPORT_SAVE => self.import_dialog(),
            actions::DELETE_SAVE => self.delete_dialog(),
            id if id >= actions::BUY_UPGRADE_BASE
                && ((id - actions::BUY_UPGRADE_BASE) as usize) < self.farm.catalog.upgrades.len() =>
            {
                self.buy_index((id - actions::BUY_UPGRADE_BASE) as usize)
            }
            _ => return false,
        }
        true
    }

    fn handle_key(&mut self, key: char) -> bool {
        // Tab-local keys first: shop hotkeys shadow the dig key.
        match self.tab {
            Tab::Shop => {
                if let Some(idx) = actions::shop_index(key) {
                    if idx < self.farm.catalog.upgrades.len() {
                        self.buy_index(idx);
                        return true;
                    }
                }
            }
            Tab::Settings => {
                let action = match key {
                    'n' => Some(actions::TOGGLE_NOTIFICATIONS),
                    'm' => Some(actions::TOGGLE_COMPACT),
                    'o' => Some(actions::TOGGLE_AUTOSAVE),
                    'x' => Some(actions::EXPORT_SAVE),
                    'i' => Some(actions::IMPORT_SAVE),
                    'd' => Some(actions::DELETE_SAVE),
                    _ => None,
                };
                if let Some(action) = action {
                    return self.handle_click(action);
                }
            }
            _ => {}
        }
        match key {
            'c' | ' ' => self.dig(),
            'p' => self.try_prestige(),
            's' => self.save_now(true),
            '\t' => self.tab = self.tab.next(),
            _ => return false,
        }
        true
    }
}

impl Game for PotatoGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        self.flush_effects();
        consumed
    }

    fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        self.farm.tick(delta_ticks);
        self.flush_effects();
        self.dig_flash = self.dig_flash.saturating_sub(delta_ticks);

        if self.settings.autosave {
            self.autosave_ticks += delta_ticks;
            if self.autosave_ticks >= save::AUTOSAVE_INTERVAL {
                self.autosave_ticks = 0;
                self.save_now(false);
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
