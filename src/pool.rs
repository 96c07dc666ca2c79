//! Draw-pool preparation.
//!
//! The pool the generator samples from is a multiset: every number drawn
//! in the recent contests appears once per occurrence, then the full
//! range is appended once so every number keeps a minimum chance.
//! Preparation degrades online → local cache → plain range, and reports
//! which of the three it ended up using; those labels are what the
//! history records as an entry's mode and source.

use crate::storage::{pool_key, KeyValue};
use crate::GameVariant;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

pub const DRAWS_API_BASE: &str = "https://api.guidi.dev.br/loteria";

pub const MODE_ONLINE: &str = "online";
pub const MODE_CACHE: &str = "cache";
pub const MODE_OFFLINE: &str = "offline";

pub const SOURCE_API: &str = "api";
pub const SOURCE_CACHE: &str = "cache";
pub const SOURCE_STATISTICAL: &str = "statistical";

/// Multiset of playable numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawPool {
    numbers: Vec<u8>,
}

impl DrawPool {
    /// Pool from recently drawn numbers plus the full range once.
    /// Numbers outside the variant's range are discarded.
    pub fn from_recent(recent: &[u8], variant: GameVariant) -> DrawPool {
        let range = variant.number_range();
        let mut numbers: Vec<u8> = recent
            .iter()
            .copied()
            .filter(|n| range.contains(n))
            .collect();
        numbers.extend(variant.number_range());
        DrawPool { numbers }
    }

    /// Plain full-range pool, every number equally likely.
    pub fn statistical(variant: GameVariant) -> DrawPool {
        DrawPool {
            numbers: variant.number_range().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Distinct numbers with their multiplicities, in ascending order.
    pub fn weighted(&self) -> (Vec<u8>, Vec<u32>) {
        let mut counts: BTreeMap<u8, u32> = BTreeMap::new();
        for &n in &self.numbers {
            *counts.entry(n).or_insert(0) += 1;
        }
        counts.into_iter().unzip()
    }
}

/// Raw recent-draw numbers persisted for offline reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPool {
    pub contest: u32,
    pub numbers: Vec<u8>,
}

/// Outcome of pool preparation: the pool plus where it came from.
pub struct PreparedPool {
    pub pool: DrawPool,
    pub mode: &'static str,
    pub source: &'static str,
    pub message: String,
}

impl PreparedPool {
    pub fn offline(variant: GameVariant) -> PreparedPool {
        PreparedPool {
            pool: DrawPool::statistical(variant),
            mode: MODE_OFFLINE,
            source: SOURCE_STATISTICAL,
            message: "Modo offline: gerador estatístico, sem internet e sem cache.".into(),
        }
    }
}

#[derive(Deserialize)]
struct DrawSummary {
    numero: u32,
}

#[derive(Deserialize)]
struct DrawDetail {
    #[serde(rename = "listaDezenas", default)]
    lista_dezenas: Vec<String>,
}

/// Prepares the pool for a variant, trying the draws API first, then the
/// locally cached pool, then the plain range. Never fails.
pub async fn prepare<K: KeyValue>(variant: GameVariant, kv: Option<&K>) -> PreparedPool {
    match collect_recent(variant).await {
        Ok((contest, recent)) => {
            if let Some(kv) = kv {
                let cached = CachedPool {
                    contest,
                    numbers: recent.clone(),
                };
                if let Ok(raw) = serde_json::to_string(&cached) {
                    kv.set(&pool_key(variant), &raw);
                }
            }
            info!(
                "{}: pool refreshed from the API at contest {}",
                variant.key(),
                contest
            );
            PreparedPool {
                pool: DrawPool::from_recent(&recent, variant),
                mode: MODE_ONLINE,
                source: SOURCE_API,
                message: "Dados atualizados pela internet. Cache local atualizado.".into(),
            }
        }
        Err(err) => {
            warn!("{}: pool refresh failed: {:?}", variant.key(), err);
            match kv.and_then(|kv| read_cached(variant, kv)) {
                Some(cached) => PreparedPool {
                    pool: DrawPool::from_recent(&cached.numbers, variant),
                    mode: MODE_CACHE,
                    source: SOURCE_CACHE,
                    message: "Sem conexão agora. Usando dados salvos localmente (cache).".into(),
                },
                None => PreparedPool::offline(variant),
            }
        }
    }
}

/// Cached pool for the variant, or `None` when absent, corrupt or empty.
pub fn read_cached<K: KeyValue>(variant: GameVariant, kv: &K) -> Option<CachedPool> {
    kv.get(&pool_key(variant))
        .and_then(|raw| serde_json::from_str::<CachedPool>(&raw).ok())
        .filter(|cached| !cached.numbers.is_empty())
}

/// Fetches the latest contest id, then that many recent contests' numbers.
async fn collect_recent(variant: GameVariant) -> Result<(u32, Vec<u8>), JsValue> {
    let latest = fetch_json(&format!("{}/{}/ultimo", DRAWS_API_BASE, variant.key())).await?;
    let latest: DrawSummary =
        serde_wasm_bindgen::from_value(latest).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let window = variant.draw_window();
    let first = latest.numero.saturating_sub(window.saturating_sub(1));
    let mut numbers = Vec::new();

    for contest in (first..=latest.numero).rev() {
        let detail =
            fetch_json(&format!("{}/{}/{}", DRAWS_API_BASE, variant.key(), contest)).await?;
        let detail: DrawDetail = serde_wasm_bindgen::from_value(detail)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        numbers.extend(detail.lista_dezenas.iter().filter_map(|d| d.parse::<u8>().ok()));
    }

    if numbers.is_empty() {
        return Err(JsValue::from_str("no draw numbers collected"));
    }
    Ok((latest.numero, numbers))
}

async fn fetch_json(url: &str) -> Result<JsValue, JsValue> {
    let headers = Headers::new()?;
    headers.append("Accept", "application/json, text/plain, */*")?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_headers(&headers);

    let request = Request::new_with_str_and_init(url, &init)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .unchecked_into();

    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "request to {} failed with status {}",
            url,
            response.status()
        )));
    }
    JsFuture::from(response.json()?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    #[test]
    fn recent_pool_always_contains_the_full_range() {
        let pool = DrawPool::from_recent(&[4, 4, 58], GameVariant::MegaSena);
        let (numbers, _) = pool.weighted();
        assert_eq!(numbers, (1..=60).collect::<Vec<u8>>());
        assert_eq!(pool.len(), 63);
    }

    #[test]
    fn weights_equal_multiplicities() {
        let pool = DrawPool::from_recent(&[7, 7, 7, 25], GameVariant::Lotofacil);
        let (numbers, weights) = pool.weighted();

        let weight_of = |n: u8| weights[numbers.iter().position(|&x| x == n).unwrap()];
        assert_eq!(weight_of(7), 4); // three draws + the range pass
        assert_eq!(weight_of(25), 2);
        assert_eq!(weight_of(1), 1);
    }

    #[test]
    fn out_of_range_draws_are_discarded() {
        let pool = DrawPool::from_recent(&[0, 26, 200, 13], GameVariant::Lotofacil);
        assert_eq!(pool.len(), 26); // 25-number range + the one valid draw
    }

    #[test]
    fn statistical_pool_is_the_plain_range() {
        assert_eq!(DrawPool::statistical(GameVariant::MegaSena).len(), 60);
        assert_eq!(DrawPool::statistical(GameVariant::Lotofacil).len(), 25);
    }

    #[test]
    fn cached_pool_rejects_corrupt_or_empty_values() {
        let kv = MemoryStore::new();
        assert!(read_cached(GameVariant::MegaSena, &kv).is_none());

        kv.set(&pool_key(GameVariant::MegaSena), "{broken");
        assert!(read_cached(GameVariant::MegaSena, &kv).is_none());

        kv.set(
            &pool_key(GameVariant::MegaSena),
            r#"{"contest":100,"numbers":[]}"#,
        );
        assert!(read_cached(GameVariant::MegaSena, &kv).is_none());

        kv.set(
            &pool_key(GameVariant::MegaSena),
            r#"{"contest":100,"numbers":[4,8,15]}"#,
        );
        let cached = read_cached(GameVariant::MegaSena, &kv).unwrap();
        assert_eq!(cached.contest, 100);
        assert_eq!(cached.numbers, vec![4, 8, 15]);
    }

    #[test]
    fn offline_fallback_labels_itself() {
        let prepared = PreparedPool::offline(GameVariant::MegaSena);
        assert_eq!(prepared.mode, MODE_OFFLINE);
        assert_eq!(prepared.source, SOURCE_STATISTICAL);
        assert_eq!(prepared.pool.len(), 60);
    }
}
