//! Service worker registration and update handoff (page side).

use crate::config::SW_SCRIPT_PATH;
use log::{info, warn};
use surpresinhas::dispatch::ControlMessage;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::ServiceWorkerRegistration;

/// Registers the worker script. Failure is logged and never retried; the
/// app simply runs without offline support.
pub fn register() {
    let container = gloo_utils::window().navigator().service_worker();

    // A new worker generation taking control means a new deployment went
    // live: reload so the page runs the matching assets.
    let on_controller_change = Closure::wrap(Box::new(move || {
        let _ = gloo_utils::window().location().reload();
    }) as Box<dyn FnMut()>);
    container.set_oncontrollerchange(Some(on_controller_change.as_ref().unchecked_ref()));
    on_controller_change.forget();

    let promise = container.register(SW_SCRIPT_PATH);
    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(registration) => {
                let registration: ServiceWorkerRegistration = registration.unchecked_into();
                if let Some(waiting) = registration.waiting() {
                    if let Ok(msg) = serde_wasm_bindgen::to_value(&ControlMessage::skip_waiting()) {
                        let _ = waiting.post_message(&msg);
                    }
                }
                info!("service worker registered at {}", SW_SCRIPT_PATH);
            }
            Err(err) => warn!("service worker registration failed: {:?}", err),
        }
    });
}
