//! Main module for the Surpresinhas page application using Yew.
//! Wires UI components, state, and side-effect logic.

use gloo_timers::callback::Timeout;
use surpresinhas::history::{self, HistoryEntry, HistoryStore};
use surpresinhas::pool;
use surpresinhas::storage::BrowserStorage;
use surpresinhas::theme::{self, Theme};
use surpresinhas::{defaults, generate_batch, GameVariant};
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;
mod registration;
mod utils;

use components::{render_history, render_latest};
use config::*;
use utils::{parse_seed, validate_pick_count, validate_play_count};

/// Primary application component wiring state, effects, and UI elements.
#[function_component(Main)]
fn main_component() -> Html {
    let variant = use_state(|| GameVariant::DEFAULT);

    let play_count = use_state(|| defaults::PLAY_COUNT);
    let pick_count = use_state(|| GameVariant::DEFAULT.default_pick_count());

    // Text states for input fields
    let play_count_text = use_state(|| defaults::PLAY_COUNT.to_string());
    let pick_count_text = use_state(|| GameVariant::DEFAULT.default_pick_count().to_string());
    let seed_text = use_state(String::new);

    // Validation error states
    let play_count_error = use_state(|| None::<String>);
    let pick_count_error = use_state(|| None::<String>);
    let seed_error = use_state(|| None::<String>);

    let latest = use_state(|| None::<HistoryEntry>);
    let error_message = use_state(|| None::<String>);
    let status = use_state(|| None::<String>);
    // Replacing the handle cancels the previous dismissal timer
    let status_timer = use_state(|| None::<Timeout>);
    let is_generating = use_state(|| false);
    // Bumped after every store write so the history list re-renders
    let history_version = use_state(|| 0usize);

    // Apply the saved theme and register the worker on mount
    use_effect_with((), move |_| {
        match BrowserStorage::local() {
            Some(kv) => theme::apply(theme::saved(&kv)),
            None => theme::apply(Theme::Light),
        }
        registration::register();
    });

    // --- OnInput handlers for text states ---
    let play_count_text_oninput = {
        let play_count_text_setter = play_count_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            play_count_text_setter.set(input.value());
        })
    };
    let pick_count_text_oninput = {
        let pick_count_text_setter = pick_count_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            pick_count_text_setter.set(input.value());
        })
    };
    let seed_text_oninput = {
        let seed_text_setter = seed_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            seed_text_setter.set(input.value());
        })
    };

    // --- Commit handlers (onchange / Enter) ---
    let handle_play_count_input = {
        let play_count_text_handle = play_count_text.clone();
        let play_count_num_handle = play_count.clone();
        let play_count_err_handle = play_count_error.clone();
        Callback::from(move |_: ()| {
            let text_val = (*play_count_text_handle).clone();
            match validate_play_count(&text_val) {
                Ok(valid) => {
                    play_count_err_handle.set(None);
                    play_count_num_handle.set(valid);
                    play_count_text_handle.set(valid.to_string());
                }
                Err(e) => play_count_err_handle.set(Some(e)),
            }
        })
    };
    let handle_pick_count_input = {
        let pick_count_text_handle = pick_count_text.clone();
        let pick_count_num_handle = pick_count.clone();
        let pick_count_err_handle = pick_count_error.clone();
        let variant_handle = variant.clone();
        Callback::from(move |_: ()| {
            let text_val = (*pick_count_text_handle).clone();
            match validate_pick_count(&text_val, *variant_handle) {
                Ok(valid) => {
                    pick_count_err_handle.set(None);
                    pick_count_num_handle.set(valid);
                    pick_count_text_handle.set(valid.to_string());
                }
                Err(e) => pick_count_err_handle.set(Some(e)),
            }
        })
    };
    let handle_seed_input = {
        let seed_text_handle = seed_text.clone();
        let seed_err_handle = seed_error.clone();
        Callback::from(move |_: ()| {
            let text_val = (*seed_text_handle).clone();
            match parse_seed(&text_val) {
                Ok(_) => seed_err_handle.set(None),
                Err(e) => seed_err_handle.set(Some(e)),
            }
        })
    };

    // --- KeyDown handlers for Enter key ---
    let play_count_onkeydown = {
        let commit_handler = handle_play_count_input.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit_handler.emit(());
            }
        })
    };
    let pick_count_onkeydown = {
        let commit_handler = handle_pick_count_input.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit_handler.emit(());
            }
        })
    };
    let seed_onkeydown = {
        let commit_handler = handle_seed_input.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit_handler.emit(());
            }
        })
    };

    // Generation: prepare the pool, generate, persist, show the result
    let on_generate = {
        let play_count = play_count.clone();
        let pick_count = pick_count.clone();
        let seed_text = seed_text.clone();
        let seed_error = seed_error.clone();
        let latest = latest.clone();
        let error_message = error_message.clone();
        let status = status.clone();
        let status_timer = status_timer.clone();
        let is_generating = is_generating.clone();
        let history_version = history_version.clone();
        Callback::from(move |_: MouseEvent| {
            if *is_generating {
                return;
            }
            let seed = match parse_seed(&seed_text) {
                Ok(seed) => {
                    seed_error.set(None);
                    seed
                }
                Err(e) => {
                    seed_error.set(Some(e));
                    return;
                }
            };

            // The active variant is re-derived from the render target's
            // data attribute, the same way every store operation does it.
            let variant = history::active_variant();
            let play_count = *play_count;
            let pick_count = *pick_count;

            is_generating.set(true);
            error_message.set(None);

            let latest = latest.clone();
            let error_message = error_message.clone();
            let status = status.clone();
            let status_timer = status_timer.clone();
            let is_generating = is_generating.clone();
            let history_version = history_version.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let kv = BrowserStorage::local();
                let prepared = pool::prepare(variant, kv.as_ref()).await;

                match generate_batch(variant, &prepared.pool, play_count, pick_count, seed) {
                    Ok(plays) => {
                        let entry = HistoryEntry::now(prepared.mode, prepared.source, plays);
                        if let Some(kv) = kv {
                            HistoryStore::new(kv).append(variant, entry.clone());
                        }
                        latest.set(Some(entry));
                        history_version.set(history_version.wrapping_add(1));

                        status.set(Some(prepared.message));
                        let status_clear = status.clone();
                        let handle = Timeout::new(STATUS_DISMISS_MS, move || {
                            status_clear.set(None);
                        });
                        status_timer.set(Some(handle));
                    }
                    Err(err) => error_message.set(Some(err.to_string())),
                }
                is_generating.set(false);
            });
        })
    };

    // Clear history: confirm, delete, acknowledge
    let on_clear = {
        let latest = latest.clone();
        let history_version = history_version.clone();
        Callback::from(move |_: MouseEvent| {
            let variant = history::active_variant();
            let window = gloo_utils::window();
            let confirmed = window
                .confirm_with_message(CLEAR_CONFIRM_PROMPT)
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            if let Some(kv) = BrowserStorage::local() {
                HistoryStore::new(kv).clear(variant);
            }
            latest.set(None);
            history_version.set(history_version.wrapping_add(1));
            let _ = window.alert_with_message(CLEAR_DONE_NOTICE);
        })
    };

    let on_theme_toggle = Callback::from(move |_: MouseEvent| {
        if let Some(kv) = BrowserStorage::local() {
            theme::toggle(&kv);
        }
    });

    // Variant tabs; switching also resets the pick count to the
    // variant's minimum
    let tabs: Html = GameVariant::ALL
        .iter()
        .map(|&v| {
            let is_active = *variant == v;
            let onclick = {
                let variant = variant.clone();
                let pick_count = pick_count.clone();
                let pick_count_text = pick_count_text.clone();
                let pick_count_error = pick_count_error.clone();
                Callback::from(move |_: MouseEvent| {
                    variant.set(v);
                    pick_count.set(v.default_pick_count());
                    pick_count_text.set(v.default_pick_count().to_string());
                    pick_count_error.set(None);
                })
            };
            html! {
                <button class={if is_active { "tab active" } else { "tab" }} onclick={onclick}>
                    { v.label() }
                </button>
            }
        })
        .collect();

    // Ensure re-render on store writes by reading history_version
    let _ = *history_version;
    let entries = BrowserStorage::local()
        .map(|kv| HistoryStore::new(kv).read_all(*variant))
        .unwrap_or_default();
    let saved_theme = BrowserStorage::local()
        .map(|kv| theme::saved(&kv))
        .unwrap_or(Theme::Light);

    let pick_bounds = variant.pick_bounds();

    html! {
        <div class="container">
            <header class="app-header">
                <h1>{ "Surpresinhas" }</h1>
                <button class="theme-toggle" onclick={on_theme_toggle}>
                    <span id={theme::THEME_ICON_ID}>{ saved_theme.next_action_icon() }</span>
                    <span id={theme::THEME_LABEL_ID}>{ saved_theme.next_action_label() }</span>
                </button>
            </header>

            <div class="tabs">
                { tabs }
            </div>

            <div class="box generator">
                <div class="form-row">
                    <div class="form-group">
                        <label for="play_count_input">
                            { format!("Qtd. de surpresinhas ({}–{}):",
                                      defaults::MIN_PLAY_COUNT, defaults::MAX_PLAY_COUNT) }
                        </label>
                        <input
                            type="number"
                            id="play_count_input"
                            min={defaults::MIN_PLAY_COUNT.to_string()}
                            max={defaults::MAX_PLAY_COUNT.to_string()}
                            value={(*play_count_text).clone()}
                            class={if (*play_count_error).is_some() { "invalid" } else { "" }}
                            oninput={play_count_text_oninput}
                            onchange={handle_play_count_input.reform(|_| ())}
                            onkeydown={play_count_onkeydown}
                        />
                        if let Some(ref err) = *play_count_error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>

                    <div class="form-group">
                        <label for="pick_count_input">
                            { format!("Qtd. de dezenas ({}–{}):",
                                      pick_bounds.start(), pick_bounds.end()) }
                        </label>
                        <input
                            type="number"
                            id="pick_count_input"
                            min={pick_bounds.start().to_string()}
                            max={pick_bounds.end().to_string()}
                            value={(*pick_count_text).clone()}
                            class={if (*pick_count_error).is_some() { "invalid" } else { "" }}
                            oninput={pick_count_text_oninput}
                            onchange={handle_pick_count_input.reform(|_| ())}
                            onkeydown={pick_count_onkeydown}
                        />
                        if let Some(ref err) = *pick_count_error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>

                    <div class="form-group">
                        <label for="seed_input">{ "Seed (opcional):" }</label>
                        <input
                            type="number"
                            id="seed_input"
                            placeholder="vazio = aleatória"
                            value={(*seed_text).clone()}
                            class={if (*seed_error).is_some() { "invalid" } else { "" }}
                            oninput={seed_text_oninput}
                            onchange={handle_seed_input.reform(|_| ())}
                            onkeydown={seed_onkeydown}
                        />
                        if let Some(ref err) = *seed_error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>
                </div>

                <button class="btn-primary" onclick={on_generate} disabled={*is_generating}>
                    { if *is_generating { "Gerando..." } else { "Gerar e salvar histórico" } }
                </button>

                if let Some(ref err) = *error_message {
                    <div class="current-error">{ err }</div>
                }
                if let Some(ref msg) = *status {
                    <div class="status-line small">{ msg }</div>
                }
            </div>

            if let Some(ref entry) = *latest {
                { render_latest(entry, *variant) }
            }

            <div class="box history-section">
                <div class="history-header">
                    <h3>{ "Últimos históricos" }</h3>
                    <button class="btn-secondary small" onclick={on_clear}>
                        { "Limpar histórico" }
                    </button>
                </div>
                <div id={history::HISTORY_ELEMENT_ID} data-game={variant.key()}>
                    { render_history(&entries, *variant) }
                </div>
            </div>
        </div>
    }
}

/// Entry point: initializes logging and the Yew renderer.
fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    yew::Renderer::<Main>::new().render();
}
