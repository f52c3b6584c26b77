//! Semantic action IDs for Potato Land click targets.
//!
//! These IDs are registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const DIG: u16 = 0;
pub const PRESTIGE: u16 = 1;
pub const SAVE: u16 = 2;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_FARM: u16 = 10;
pub const TAB_SHOP: u16 = 11;
pub const TAB_GOALS: u16 = 12;
pub const TAB_STATS: u16 = 13;
pub const TAB_SETTINGS: u16 = 14;

// ── Upgrade purchase (base + catalog index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Settings ────────────────────────────────────────────────────
pub const TOGGLE_NOTIFICATIONS: u16 = 200;
pub const TOGGLE_COMPACT: u16 = 201;
pub const TOGGLE_AUTOSAVE: u16 = 202;
pub const EXPORT_SAVE: u16 = 210;
pub const IMPORT_SAVE: u16 = 211;
pub const DELETE_SAVE: u16 = 212;

/// Shop hotkeys: `1`–`9`, then `a`–`l`.
const SHOP_KEYS: &[u8] = b"123456789abcdefghijkl";

/// Hotkey shown next to the upgrade at catalog index `idx`.
pub fn shop_key(idx: usize) -> Option<char> {
    SHOP_KEYS.get(idx).map(|&b| b as char)
}

/// Catalog index bound to hotkey `key`.
pub fn shop_index(key: char) -> Option<usize> {
    SHOP_KEYS.iter().position(|&b| b as char == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_keys_cover_catalog() {
        assert_eq!(shop_key(0), Some('1'));
        assert_eq!(shop_key(8), Some('9'));
        assert_eq!(shop_key(9), Some('a'));
        assert_eq!(shop_key(19), Some('k'));
        assert_eq!(shop_key(20), Some('l'));
        assert_eq!(shop_key(21), None);
    }

    #[test]
    fn shop_index_inverts_shop_key() {
        for idx in 0..21 {
            let key = shop_key(idx).unwrap();
            assert_eq!(shop_index(key), Some(idx));
        }
        assert_eq!(shop_index('z'), None);
        assert_eq!(shop_index('0'), None);
    }
}
