//! Potato Land セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。
//! - `MIN_COMPATIBLE_VERSION`: 読み込める最小バージョン。破壊的変更のときだけ上げる。
//!
//! 読み込みはバージョン付きの形式に加えて、ラッパーなしの ProgressionState
//! (旧形式) とエクスポート形式 `{gameState, upgrades, timestamp, version}` も受け付ける。
//! どの形式でも検証を通ったものだけを反映する。

#[cfg(any(not(target_arch = "wasm32"), test))]
use std::cell::RefCell;
#[cfg(any(not(target_arch = "wasm32"), test))]
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::Catalog;
use super::state::{Effect, ProgressionState};

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
pub const STORAGE_KEY: &str = "potato_land_save";

/// オートセーブの間隔 (tick数)。10 ticks/sec × 10秒 = 100 ticks。
pub const AUTOSAVE_INTERVAL: u32 = 100;

/// オフライン進行の上限 (秒)。24時間。
pub const OFFLINE_CAP_SECONDS: u64 = 86_400;

/// 貯めておける経験値の上限 (現レベルの必要経験値の倍数)。
/// これを超えるとロード後のレベルアップ処理が終わらなくなる。
const MAX_BANKED_EXPERIENCE: f64 = 1_000_000.0;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save version {found} is older than the minimum supported {min}")]
    UnsupportedVersion { found: u32, min: u32 },
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Key-value backend the save lives in.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&self, key: &str) -> Result<(), SaveError>;
}

/// In-memory store for native builds and tests.
#[cfg(any(not(target_arch = "wasm32"), test))]
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

#[cfg(any(not(target_arch = "wasm32"), test))]
impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SaveError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser localStorage.
#[cfg(target_arch = "wasm32")]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or_else(|| SaveError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SaveError::Storage("localStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// 購入状況。定義そのものは保存しない。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    pub id: String,
    pub owned: u32,
    pub cost: f64,
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: ProgressionState,
    #[serde(default)]
    upgrades: Vec<UpgradeRecord>,
}

/// エクスポート形式。`version` は文字列 ("1.0.0")。
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportData {
    game_state: ProgressionState,
    #[serde(default)]
    upgrades: Vec<UpgradeRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnySave {
    Versioned(SaveData),
    Exported(ExportData),
    Legacy(ProgressionState),
}

fn extract_save(state: &ProgressionState, catalog: &Catalog) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: state.clone(),
        upgrades: catalog
            .upgrades
            .iter()
            .filter(|u| u.owned > 0)
            .map(|u| UpgradeRecord {
                id: u.id.to_string(),
                owned: u.owned,
                cost: u.cost,
            })
            .collect(),
    }
}

/// Compact JSON for storage.
pub fn to_json(state: &ProgressionState, catalog: &Catalog) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state, catalog))?)
}

/// Pretty JSON for the player to copy.
pub fn export_json(state: &ProgressionState, catalog: &Catalog) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(&extract_save(state, catalog))?)
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), SaveError> {
    if !value.is_finite() {
        return Err(SaveError::Invalid {
            field,
            reason: "not a finite number",
        });
    }
    if value < 0.0 {
        return Err(SaveError::Invalid {
            field,
            reason: "negative",
        });
    }
    Ok(())
}

/// Reject snapshots the engine could not have produced.
pub fn validate(state: &ProgressionState) -> Result<(), SaveError> {
    let fields = [
        ("potatoes", state.potatoes),
        ("totalPotatoes", state.total_potatoes),
        ("potatoesPerSecond", state.potatoes_per_second),
        ("clickPower", state.click_power),
        ("multiplier", state.multiplier),
        ("criticalChance", state.critical_chance),
        ("criticalMultiplier", state.critical_multiplier),
        ("prestigeBonus", state.prestige_bonus),
        ("experience", state.experience),
        ("farmSize", state.farm_size),
        ("weatherBonus", state.weather_bonus),
        ("seasonBonus", state.season_bonus),
    ];
    for (field, value) in fields {
        check_non_negative(field, value)?;
    }
    if state.level < 1 {
        return Err(SaveError::Invalid {
            field: "level",
            reason: "must be at least 1",
        });
    }
    if state.experience > state.required_experience() * MAX_BANKED_EXPERIENCE {
        return Err(SaveError::Invalid {
            field: "experience",
            reason: "too far beyond the current level",
        });
    }
    if state.prestige_bonus < 1.0 {
        return Err(SaveError::Invalid {
            field: "prestigeBonus",
            reason: "must be at least 1",
        });
    }
    if state.critical_chance > 1.0 {
        return Err(SaveError::Invalid {
            field: "criticalChance",
            reason: "must be within [0, 1]",
        });
    }
    if state.critical_multiplier < 1.0 {
        return Err(SaveError::Invalid {
            field: "criticalMultiplier",
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// Fresh catalog with saved ownership applied. Unknown ids are ignored and
/// owned counts are clamped to each upgrade's cap.
fn rebuild_catalog(records: &[UpgradeRecord]) -> Result<Catalog, SaveError> {
    let mut catalog = Catalog::new();
    for record in records {
        let Some(upgrade) = catalog.upgrade_mut(&record.id) else {
            log::warn!("ignoring unknown upgrade in save: {}", record.id);
            continue;
        };
        check_non_negative("upgrades.cost", record.cost)?;
        upgrade.owned = upgrade
            .max_owned
            .map_or(record.owned, |max| record.owned.min(max));
        upgrade.cost = record.cost.max(upgrade.base_cost);
    }
    Ok(catalog)
}

/// Parse and validate any accepted save shape. Nothing is committed here.
pub fn decode(json: &str) -> Result<(ProgressionState, Catalog), SaveError> {
    let (state, records) = match serde_json::from_str::<AnySave>(json)? {
        AnySave::Versioned(data) => {
            if data.version < MIN_COMPATIBLE_VERSION {
                return Err(SaveError::UnsupportedVersion {
                    found: data.version,
                    min: MIN_COMPATIBLE_VERSION,
                });
            }
            (data.game, data.upgrades)
        }
        AnySave::Exported(data) => (data.game_state, data.upgrades),
        AnySave::Legacy(state) => (state, Vec::new()),
    };
    validate(&state)?;
    let catalog = rebuild_catalog(&records)?;
    Ok((state, catalog))
}

/// Credit production for the time since `last_save`, capped at 24 hours.
pub fn apply_offline_progress(state: &mut ProgressionState, now_ms: u64) -> Option<Effect> {
    let elapsed_ms = now_ms.saturating_sub(state.last_save);
    let seconds = (elapsed_ms / 1000).min(OFFLINE_CAP_SECONDS);
    state.last_save = now_ms;
    let gain = state.potatoes_per_second * seconds as f64;
    if seconds == 0 || gain <= 0.0 {
        return None;
    }
    state.earn(gain);
    Some(Effect::OfflineProgress { seconds, gain })
}

/// Stamp `last_save` and write the blob.
pub fn save_game<S: SaveStore + ?Sized>(
    store: &S,
    state: &mut ProgressionState,
    catalog: &Catalog,
    now_ms: u64,
) -> Result<(), SaveError> {
    state.last_save = now_ms;
    let json = to_json(state, catalog)?;
    store.write(STORAGE_KEY, &json)
}

/// A save restored from storage, with offline progress already credited.
pub struct Loaded {
    pub state: ProgressionState,
    pub catalog: Catalog,
    pub offline: Option<Effect>,
}

/// ストレージからゲームを復元する。
/// 失敗時は None を返す（新規ゲームになる）。壊れたデータは削除する。
pub fn load_game<S: SaveStore + ?Sized>(store: &S, now_ms: u64) -> Option<Loaded> {
    let json = match store.read(STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Potato Land: セーブの読み込みに失敗: {e}");
            return None;
        }
    };
    let (mut state, catalog) = match decode(&json) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Potato Land: セーブデータが不正です（破棄します）: {e}");
            let _ = store.remove(STORAGE_KEY);
            return None;
        }
    };
    let offline = apply_offline_progress(&mut state, now_ms);
    log::info!(
        "Potato Land: セーブを読み込みました (level {}, {} potatoes)",
        state.level,
        state.potatoes.floor()
    );
    Some(Loaded {
        state,
        catalog,
        offline,
    })
}

/// セーブデータを削除する。
pub fn delete_save<S: SaveStore + ?Sized>(store: &S) -> Result<(), SaveError> {
    store.remove(STORAGE_KEY)
}

/// ブラウザのダイアログ。
#[cfg(target_arch = "wasm32")]
pub mod dialog {
    pub fn confirm(message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    /// 入力を求める。キャンセル時は None。
    pub fn prompt(message: &str, default: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(message, default)
            .ok()
            .flatten()
    }
}
