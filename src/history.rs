//! Locally persisted history of generated plays.
//!
//! One JSON list per game variant, newest entry first. The store is an
//! opaque prepend-only log: it never deduplicates entries or validates
//! number ranges, and a corrupt stored value reads back as no history.

use crate::storage::{history_key, KeyValue};
use crate::{GameVariant, Play};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// Element whose `data-game` attribute names the active variant.
pub const HISTORY_ELEMENT_ID: &str = "historico";

/// Attribute on [`HISTORY_ELEMENT_ID`] carrying the variant key.
pub const GAME_ATTR: &str = "data-game";

/// One record of a past generation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub mode: String,
    pub source: String,
    pub plays: Vec<Play>,
}

impl HistoryEntry {
    /// Builds an entry stamped with the current local date and time.
    pub fn now(mode: impl Into<String>, source: impl Into<String>, plays: Vec<Play>) -> Self {
        let date = js_sys::Date::new_0()
            .to_locale_string("pt-BR", &JsValue::UNDEFINED)
            .into();
        HistoryEntry {
            date,
            mode: mode.into(),
            source: source.into(),
            plays,
        }
    }
}

/// Per-variant history over an injected key-value store.
pub struct HistoryStore<K> {
    kv: K,
}

impl<K: KeyValue> HistoryStore<K> {
    pub fn new(kv: K) -> Self {
        HistoryStore { kv }
    }

    /// Full ordered list for the variant; absent or malformed data is
    /// treated as empty, never as an error.
    pub fn read_all(&self, variant: GameVariant) -> Vec<HistoryEntry> {
        self.kv
            .get(&history_key(variant))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Prepends one entry and persists the whole list (last write wins).
    pub fn append(&self, variant: GameVariant, entry: HistoryEntry) {
        let mut entries = self.read_all(variant);
        entries.insert(0, entry);
        if let Ok(raw) = serde_json::to_string(&entries) {
            self.kv.set(&history_key(variant), &raw);
        }
    }

    /// Deletes the variant's stored list entirely.
    pub fn clear(&self, variant: GameVariant) {
        self.kv.remove(&history_key(variant));
    }
}

/// Reads the active variant off the render target's `data-game` attribute.
///
/// Re-derived on every store operation, so switching the attribute
/// transparently switches which history is read and written. Falls back
/// to the default variant when the element or attribute is missing.
pub fn active_variant() -> GameVariant {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(HISTORY_ELEMENT_ID))
        .and_then(|el| el.get_attribute(GAME_ATTR))
        .and_then(|key| GameVariant::from_key(&key))
        .unwrap_or(GameVariant::DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn entry(tag: &str) -> HistoryEntry {
        HistoryEntry {
            date: format!("01/01/2026 10:00:{tag}"),
            mode: "offline".into(),
            source: "statistical".into(),
            plays: vec![vec![1, 2, 3, 4, 5, 6]],
        }
    }

    #[test]
    fn appends_read_back_newest_first() {
        let store = HistoryStore::new(MemoryStore::new());
        for i in 0..5 {
            store.append(GameVariant::MegaSena, entry(&i.to_string()));
        }

        let entries = store.read_all(GameVariant::MegaSena);
        assert_eq!(entries.len(), 5);
        for (pos, e) in entries.iter().enumerate() {
            assert!(e.date.ends_with(&(4 - pos).to_string()));
        }
    }

    #[test]
    fn clear_empties_regardless_of_size() {
        let store = HistoryStore::new(MemoryStore::new());
        for i in 0..12 {
            store.append(GameVariant::Lotofacil, entry(&i.to_string()));
        }
        store.clear(GameVariant::Lotofacil);
        assert!(store.read_all(GameVariant::Lotofacil).is_empty());
    }

    #[test]
    fn variants_never_share_history() {
        let store = HistoryStore::new(MemoryStore::new());
        store.append(GameVariant::MegaSena, entry("a"));

        assert!(store.read_all(GameVariant::Lotofacil).is_empty());
        store.clear(GameVariant::Lotofacil);
        assert_eq!(store.read_all(GameVariant::MegaSena).len(), 1);
    }

    #[test]
    fn corrupt_stored_value_reads_as_empty() {
        let kv = MemoryStore::new();
        kv.set(&history_key(GameVariant::MegaSena), "not json {");
        let store = HistoryStore::new(kv);
        assert!(store.read_all(GameVariant::MegaSena).is_empty());
    }

    #[test]
    fn entry_shape_survives_persistence() {
        let store = HistoryStore::new(MemoryStore::new());
        let mut e = entry("x");
        e.plays = vec![vec![3, 11, 24, 35, 41, 58], vec![1, 2, 3, 4, 5, 6]];
        store.append(GameVariant::MegaSena, e.clone());
        assert_eq!(store.read_all(GameVariant::MegaSena)[0], e);
    }
}
