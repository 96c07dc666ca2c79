//! Light/dark display preference.
//!
//! The persisted marker and the `data-theme` attribute on the document
//! root are kept in lockstep by every mutation path; they can diverge
//! only between page load and the initial [`apply`] call.

use crate::storage::{KeyValue, THEME_KEY};

pub const THEME_ATTR: &str = "data-theme";
pub const DARK_MARKER: &str = "dark";
pub const LIGHT_MARKER: &str = "light";

/// Optional elements advertising the *next* available action.
pub const THEME_ICON_ID: &str = "theme-icon";
pub const THEME_LABEL_ID: &str = "theme-label";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Anything other than the dark marker means light.
    pub fn from_marker(marker: Option<&str>) -> Theme {
        match marker {
            Some(DARK_MARKER) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Theme::Light => LIGHT_MARKER,
            Theme::Dark => DARK_MARKER,
        }
    }

    pub fn opposite(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the action that would switch away from this theme.
    pub fn next_action_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    pub fn next_action_label(self) -> &'static str {
        match self {
            Theme::Light => "Modo escuro",
            Theme::Dark => "Modo claro",
        }
    }
}

/// Persisted preference, defaulting to light.
pub fn saved<K: KeyValue>(kv: &K) -> Theme {
    Theme::from_marker(kv.get(THEME_KEY).as_deref())
}

/// Currently applied mode, read off the document root (not storage).
pub fn applied() -> Theme {
    let marker = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .and_then(|root| root.get_attribute(THEME_ATTR));
    Theme::from_marker(marker.as_deref())
}

/// Sets the display-mode attribute and opportunistically updates the
/// icon/label pair to offer the opposite switch.
pub fn apply(theme: Theme) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(root) = document.document_element() {
        let _ = root.set_attribute(THEME_ATTR, theme.marker());
    }
    if let Some(icon) = document.get_element_by_id(THEME_ICON_ID) {
        icon.set_text_content(Some(theme.next_action_icon()));
    }
    if let Some(label) = document.get_element_by_id(THEME_LABEL_ID) {
        label.set_text_content(Some(theme.next_action_label()));
    }
}

/// Flips the applied mode, persists the new marker, and re-applies.
pub fn toggle<K: KeyValue>(kv: &K) -> Theme {
    let next = applied().opposite();
    kv.set(THEME_KEY, next.marker());
    apply(next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    #[test]
    fn unknown_markers_mean_light() {
        assert_eq!(Theme::from_marker(None), Theme::Light);
        assert_eq!(Theme::from_marker(Some("light")), Theme::Light);
        assert_eq!(Theme::from_marker(Some("sepia")), Theme::Light);
        assert_eq!(Theme::from_marker(Some("dark")), Theme::Dark);
    }

    #[test]
    fn double_toggle_restores_mode_and_persisted_value() {
        let kv = MemoryStore::new();
        kv.set(THEME_KEY, Theme::Dark.marker());
        let start = saved(&kv);

        let once = start.opposite();
        kv.set(THEME_KEY, once.marker());
        let twice = saved(&kv).opposite();
        kv.set(THEME_KEY, twice.marker());

        assert_eq!(twice, start);
        assert_eq!(saved(&kv), start);
    }

    #[test]
    fn next_action_advertises_the_opposite_mode() {
        assert_eq!(Theme::Light.next_action_icon(), "🌙");
        assert_eq!(Theme::Dark.next_action_icon(), "☀️");
        assert_ne!(
            Theme::Light.next_action_label(),
            Theme::Dark.next_action_label()
        );
    }
}
