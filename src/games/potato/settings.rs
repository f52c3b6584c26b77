//! Player preferences. Presentation only; the engine never reads them.

use serde::{Deserialize, Serialize};

use super::logic::{format_compact, format_number};
use super::save::{SaveError, SaveStore};

/// Settings live under their own key so deleting a save keeps them.
pub const SETTINGS_KEY: &str = "potato_land_settings";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write Effects (criticals, rare finds, unlocks) to the log panel.
    pub notifications: bool,
    /// 1.2M instead of 1,200,000.
    pub compact_numbers: bool,
    /// Periodic save every `AUTOSAVE_INTERVAL` ticks.
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: true,
            compact_numbers: false,
            autosave: true,
        }
    }
}

impl Settings {
    pub fn format(&self, n: f64) -> String {
        if self.compact_numbers {
            format_compact(n)
        } else {
            format_number(n)
        }
    }

    /// Stored settings, or the defaults if none are stored or they are unreadable.
    pub fn load<S: SaveStore + ?Sized>(store: &S) -> Self {
        match store.read(SETTINGS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Potato Land: 設定の読み込みに失敗: {e}");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Potato Land: 設定の読み込みに失敗: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: SaveStore + ?Sized>(&self, store: &S) -> Result<(), SaveError> {
        store.write(SETTINGS_KEY, &serde_json::to_string(self)?)
    }
}
