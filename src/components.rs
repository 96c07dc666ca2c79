//! Pure Yew view components for the history and results UI.
//!
//! This module contains stateless render functions that build Html from
//! plain data, keeping the formatting rules easy to test and reuse.

use surpresinhas::history::HistoryEntry;
use surpresinhas::{format_play_row, grid_rows, pad2, GameVariant, Play, GRID_WIDTH, PLAY_GROUP_SIZE};
use yew::prelude::*;

/// Whether a group break belongs before the play at `index`.
fn needs_group_break(index: usize) -> bool {
    index > 0 && index % PLAY_GROUP_SIZE == 0
}

/// Renders one play in the variant's layout: a dash-joined row for
/// Mega-Sena, a five-column grid for Lotofácil.
fn render_play(variant: GameVariant, play: &Play) -> Html {
    match variant {
        GameVariant::MegaSena => html! {
            <div class="play-row">{ format_play_row(play) }</div>
        },
        GameVariant::Lotofacil => html! {
            <div class="play-grid">
                { grid_rows(play, GRID_WIDTH).into_iter().map(|row| html! {
                    <div class="grid-row">
                        { row.into_iter().map(|n| html! {
                            <span class="grid-cell">{ pad2(n) }</span>
                        }).collect::<Html>() }
                    </div>
                }).collect::<Html>() }
            </div>
        },
    }
}

/// Renders all plays of one entry, with a visual break after every
/// third play for readability.
pub fn render_plays(variant: GameVariant, plays: &[Play]) -> Html {
    html! {
        <div class="plays">
            { plays.iter().enumerate().map(|(idx, play)| html! {
                <>
                    if needs_group_break(idx) {
                        <div class="play-group-break"></div>
                    }
                    { render_play(variant, play) }
                </>
            }).collect::<Html>() }
        </div>
    }
}

fn render_entry(index: usize, entry: &HistoryEntry, variant: GameVariant) -> Html {
    html! {
        <div class="history-entry">
            <div class="entry-meta">
                <span class="pill">{ index + 1 }</span>
                <span class="entry-date">{ &entry.date }</span>
                <span class="entry-mode">{ &entry.mode }</span>
                <span class="entry-source">{ &entry.source }</span>
            </div>
            { render_plays(variant, &entry.plays) }
        </div>
    }
}

/// Renders the persisted history, newest entry first.
pub fn render_history(entries: &[HistoryEntry], variant: GameVariant) -> Html {
    if entries.is_empty() {
        return html! {
            <div class="small">{ "Nenhum histórico salvo ainda." }</div>
        };
    }

    html! {
        <div class="history-entries">
            { entries.iter().enumerate().map(|(idx, entry)| {
                render_entry(idx, entry, variant)
            }).collect::<Html>() }
        </div>
    }
}

/// Panel showing the most recent generation result.
pub fn render_latest(entry: &HistoryEntry, variant: GameVariant) -> Html {
    html! {
        <div class="box latest-result">
            <h3>{ "Resultado gerado" }</h3>
            <div class="entry-meta">
                <span class="entry-date">{ &entry.date }</span>
                <span class="entry-mode">{ &entry.mode }</span>
                <span class="entry-source">{ &entry.source }</span>
            </div>
            { render_plays(variant, &entry.plays) }
        </div>
    }
}
