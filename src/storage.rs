//! Key-value persistence boundary.
//!
//! All page-side state lives in the browser's local storage behind the
//! small [`KeyValue`] interface, so the history and theme logic can be
//! exercised against an in-memory store on the host.

use crate::GameVariant;
use log::warn;

/// Prefix shared by every persisted key.
pub const APP_PREFIX: &str = "surpresinhas";

/// Key holding the theme marker (`dark`, or anything else meaning light).
pub const THEME_KEY: &str = "surpresinhas_theme";

/// Storage key for one variant's history list.
pub fn history_key(variant: GameVariant) -> String {
    format!("{}_{}_historico", APP_PREFIX, variant.key())
}

/// Storage key for one variant's cached draw pool.
pub fn pool_key(variant: GameVariant) -> String {
    format!("{}_{}_pool", APP_PREFIX, variant.key())
}

/// Minimal get/set/remove surface over a string key-value store.
///
/// Writes never surface errors to callers; a full or unavailable store
/// degrades to "nothing persisted", matching how reads treat corrupt data.
pub trait KeyValue {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `localStorage`-backed implementation used in the page context.
#[derive(Clone)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Option<BrowserStorage> {
        let window = web_sys::window()?;
        let inner = window.local_storage().ok().flatten()?;
        Some(BrowserStorage { inner })
    }
}

impl KeyValue for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.inner.set_item(key, value) {
            warn!("failed to persist {}: {:?}", key, err);
        }
    }

    fn remove(&self, key: &str) {
        let _ = self.inner.remove_item(key);
    }
}

/// In-memory store for host tests.
#[cfg(test)]
pub(crate) mod memory {
    use super::KeyValue;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryStore {
        map: RefCell<HashMap<String, String>>,
    }

    impl MemoryStore {
        pub fn new() -> MemoryStore {
            MemoryStore::default()
        }
    }

    impl KeyValue for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.map.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.map.borrow_mut().insert(key.to_owned(), value.to_owned());
        }

        fn remove(&self, key: &str) {
            self.map.borrow_mut().remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_embed_the_variant() {
        assert_eq!(
            history_key(GameVariant::MegaSena),
            "surpresinhas_megasena_historico"
        );
        assert_eq!(
            history_key(GameVariant::Lotofacil),
            "surpresinhas_lotofacil_historico"
        );
        assert_eq!(pool_key(GameVariant::MegaSena), "surpresinhas_megasena_pool");
    }
}
