//! Request routing for the offline cache layer.
//!
//! The worker's fetch handler is a thin I/O shell around [`route`], a
//! pure function over (method, navigation flag, path). Keeping the
//! decision tree here lets it be tested without a cache or a network.

use serde::{Deserialize, Serialize};

/// Name of the current cache container. Bumped on each deployment;
/// activation evicts every container with a different name.
pub const CACHE_NAME: &str = "surpresinhas-v6";

/// Cache key navigation responses are stored under for offline fallback.
pub const ROOT_FALLBACK_KEY: &str = "/";

/// Path prefix identifying static-asset requests.
pub const STATIC_PREFIX: &str = "/static/";

/// Critical assets populated at install time.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/",
    "/static/manifest.webmanifest",
    "/static/surpresinhas.js",
    "/static/surpresinhas_bg.wasm",
    "/static/icons/icon-192.png",
    "/static/icons/icon-512.png",
];

/// How an intercepted request is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not intercepted at all; normal network handling applies.
    Bypass,
    /// Network first; success is copied under [`ROOT_FALLBACK_KEY`],
    /// failure is served from it.
    NetworkFirstWithRootFallback,
    /// Cached copy immediately, refreshed in the background.
    StaleWhileRevalidate,
    /// Network first, falling back to a cached copy of the same request;
    /// success never populates the cache.
    NetworkFirstWithRequestFallback,
}

/// Routing decision tree, evaluated once per intercepted request.
pub fn route(method: &str, is_navigation: bool, path: &str) -> Strategy {
    if !method.eq_ignore_ascii_case("GET") {
        return Strategy::Bypass;
    }
    if is_navigation {
        return Strategy::NetworkFirstWithRootFallback;
    }
    if path.starts_with(STATIC_PREFIX) {
        return Strategy::StaleWhileRevalidate;
    }
    Strategy::NetworkFirstWithRequestFallback
}

/// Containers to evict at activation: everything not named [`CACHE_NAME`].
pub fn stale_caches<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| *name != CACHE_NAME)
        .map(str::to_owned)
        .collect()
}

/// Message a page posts to a waiting worker to make it take over now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    pub kind: String,
}

pub const SKIP_WAITING: &str = "SKIP_WAITING";

impl ControlMessage {
    pub fn skip_waiting() -> ControlMessage {
        ControlMessage {
            kind: SKIP_WAITING.to_owned(),
        }
    }

    pub fn is_skip_waiting(&self) -> bool {
        self.kind == SKIP_WAITING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_get_requests_are_never_intercepted() {
        assert_eq!(route("POST", false, "/static/app.css"), Strategy::Bypass);
        assert_eq!(route("PUT", true, "/"), Strategy::Bypass);
        assert_eq!(route("HEAD", false, "/api/draws"), Strategy::Bypass);
    }

    #[test]
    fn navigations_go_network_first_with_root_fallback() {
        assert_eq!(
            route("GET", true, "/"),
            Strategy::NetworkFirstWithRootFallback
        );
        // navigation wins even for a static-looking path
        assert_eq!(
            route("GET", true, "/static/page.html"),
            Strategy::NetworkFirstWithRootFallback
        );
    }

    #[test]
    fn static_assets_are_served_stale_while_revalidate() {
        assert_eq!(
            route("GET", false, "/static/icons/icon-192.png"),
            Strategy::StaleWhileRevalidate
        );
        assert_eq!(
            route("get", false, "/static/surpresinhas.js"),
            Strategy::StaleWhileRevalidate
        );
    }

    #[test]
    fn everything_else_is_network_first_with_request_fallback() {
        assert_eq!(
            route("GET", false, "/api/draws/ultimo"),
            Strategy::NetworkFirstWithRequestFallback
        );
        assert_eq!(
            route("GET", false, "/favicon.ico"),
            Strategy::NetworkFirstWithRequestFallback
        );
    }

    #[test]
    fn activation_evicts_only_stale_containers() {
        let names = ["surpresinhas-v5", "surpresinhas-v6"];
        assert_eq!(stale_caches(names), vec!["surpresinhas-v5".to_owned()]);

        let only_current = ["surpresinhas-v6"];
        assert!(stale_caches(only_current).is_empty());
    }

    #[test]
    fn precache_manifest_covers_the_critical_assets() {
        assert!(PRECACHE_MANIFEST.contains(&ROOT_FALLBACK_KEY));
        assert!(PRECACHE_MANIFEST
            .iter()
            .any(|p| p.ends_with("manifest.webmanifest")));
        assert_eq!(
            PRECACHE_MANIFEST
                .iter()
                .filter(|p| p.contains("/icons/"))
                .count(),
            2
        );
    }

    #[test]
    fn control_message_round_trips_its_shape() {
        let msg = ControlMessage::skip_waiting();
        assert!(msg.is_skip_waiting());
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"SKIP_WAITING"}"#);
    }
}
