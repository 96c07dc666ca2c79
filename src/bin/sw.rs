//! Service worker binary: the offline cache dispatcher.
//!
//! Runs in its own worker context and never calls into the page. Each
//! intercepted request is routed by `dispatch::route` and satisfied by
//! one of the strategy handlers below against the single versioned
//! cache container.

use surpresinhas::dispatch::{
    self, ControlMessage, Strategy, CACHE_NAME, PRECACHE_MANIFEST, ROOT_FALLBACK_KEY,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{
    Cache, ExtendableEvent, ExtendableMessageEvent, FetchEvent, Request, RequestMode, Response,
    ServiceWorkerGlobalScope, Url,
};

fn scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let sw = scope();

    let on_install = Closure::wrap(Box::new(move |event: ExtendableEvent| {
        let _ = event.wait_until(&future_to_promise(install()));
    }) as Box<dyn FnMut(ExtendableEvent)>);
    sw.set_oninstall(Some(on_install.as_ref().unchecked_ref()));
    on_install.forget();

    let on_activate = Closure::wrap(Box::new(move |event: ExtendableEvent| {
        let _ = event.wait_until(&future_to_promise(activate()));
    }) as Box<dyn FnMut(ExtendableEvent)>);
    sw.set_onactivate(Some(on_activate.as_ref().unchecked_ref()));
    on_activate.forget();

    let on_fetch = Closure::wrap(Box::new(move |event: FetchEvent| {
        let request = event.request();
        let strategy = dispatch::route(
            &request.method(),
            request.mode() == RequestMode::Navigate,
            &request_path(&request),
        );

        let promise = match strategy {
            Strategy::Bypass => return,
            Strategy::NetworkFirstWithRootFallback => future_to_promise(navigate(request)),
            Strategy::StaleWhileRevalidate => future_to_promise(stale_while_revalidate(request)),
            Strategy::NetworkFirstWithRequestFallback => future_to_promise(network_first(request)),
        };
        let _ = event.respond_with(&promise);
    }) as Box<dyn FnMut(FetchEvent)>);
    sw.set_onfetch(Some(on_fetch.as_ref().unchecked_ref()));
    on_fetch.forget();

    let on_message = Closure::wrap(Box::new(move |event: ExtendableMessageEvent| {
        let Ok(msg) = serde_wasm_bindgen::from_value::<ControlMessage>(event.data()) else {
            return;
        };
        if msg.is_skip_waiting() {
            if let Ok(promise) = scope().skip_waiting() {
                let _ = event.wait_until(&promise);
            }
        }
    }) as Box<dyn FnMut(ExtendableMessageEvent)>);
    sw.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();
}

fn request_path(request: &Request) -> String {
    Url::new(&request.url())
        .map(|url| url.pathname())
        .unwrap_or_else(|_| request.url())
}

async fn open_cache() -> Result<Cache, JsValue> {
    let caches = scope().caches()?;
    Ok(JsFuture::from(caches.open(CACHE_NAME)).await?.unchecked_into())
}

/// Precaches the critical assets, then takes over from the previous
/// worker generation without waiting for it to finish.
async fn install() -> Result<JsValue, JsValue> {
    let cache = open_cache().await?;
    let assets = js_sys::Array::new();
    for path in PRECACHE_MANIFEST {
        assets.push(&JsValue::from_str(path));
    }
    JsFuture::from(cache.add_all_with_str_sequence(&assets)).await?;
    JsFuture::from(scope().skip_waiting()?).await?;
    Ok(JsValue::UNDEFINED)
}

/// Evicts every stale-version container, then claims open pages
/// immediately instead of waiting for a reload.
async fn activate() -> Result<JsValue, JsValue> {
    let caches = scope().caches()?;
    let keys: js_sys::Array = JsFuture::from(caches.keys()).await?.unchecked_into();
    let names: Vec<String> = keys.iter().filter_map(|key| key.as_string()).collect();

    for stale in dispatch::stale_caches(names.iter().map(String::as_str)) {
        JsFuture::from(caches.delete(&stale)).await?;
    }
    JsFuture::from(scope().clients().claim()).await?;
    Ok(JsValue::UNDEFINED)
}

/// Navigation requests: network first. A successful response is copied
/// under the root key without blocking the reply; failure serves the
/// root copy, and the request fails if none was ever stored.
async fn navigate(request: Request) -> Result<JsValue, JsValue> {
    match JsFuture::from(scope().fetch_with_request(&request)).await {
        Ok(response) => {
            let response: Response = response.unchecked_into();
            if let Ok(copy) = response.clone() {
                spawn_local(async move {
                    if let Ok(cache) = open_cache().await {
                        let _ = JsFuture::from(cache.put_with_str(ROOT_FALLBACK_KEY, &copy)).await;
                    }
                });
            }
            Ok(response.into())
        }
        Err(err) => {
            let caches = scope().caches()?;
            let cached = JsFuture::from(caches.match_with_str(ROOT_FALLBACK_KEY)).await?;
            if cached.is_undefined() {
                Err(err)
            } else {
                Ok(cached)
            }
        }
    }
}

/// Static assets: cached copy immediately, while exactly one background
/// fetch replaces the entry for next time. A cache miss waits on that
/// same fetch instead.
async fn stale_while_revalidate(request: Request) -> Result<JsValue, JsValue> {
    let cache = open_cache().await?;
    let cached = JsFuture::from(cache.match_with_request(&request))
        .await
        .unwrap_or(JsValue::UNDEFINED);
    let network = scope().fetch_with_request(&request);

    if !cached.is_undefined() {
        spawn_local(async move {
            if let Ok(response) = JsFuture::from(network).await {
                let response: Response = response.unchecked_into();
                if response.ok() {
                    let _ = JsFuture::from(cache.put_with_request(&request, &response)).await;
                }
            }
        });
        return Ok(cached);
    }

    let response: Response = JsFuture::from(network).await?.unchecked_into();
    if response.ok() {
        if let Ok(copy) = response.clone() {
            spawn_local(async move {
                let _ = JsFuture::from(cache.put_with_request(&request, &copy)).await;
            });
        }
    }
    Ok(response.into())
}

/// Everything else: network first with a same-request cache fallback;
/// success never populates the cache.
async fn network_first(request: Request) -> Result<JsValue, JsValue> {
    match JsFuture::from(scope().fetch_with_request(&request)).await {
        Ok(response) => Ok(response),
        Err(err) => {
            let caches = scope().caches()?;
            let cached = JsFuture::from(caches.match_with_request(&request)).await?;
            if cached.is_undefined() {
                Err(err)
            } else {
                Ok(cached)
            }
        }
    }
}
