use crate::{
    core::{format, storage::SessionRecord},
    results::{format_date_badge, format_time_badge, level_label, parse_timestamp, ResultsState},
};
use dioxus::prelude::*;

#[component]
pub fn ResultsList(results: Signal<ResultsState>, selected_id: Signal<Option<String>>) -> Element {
    let state = results();
    let active_id = selected_id();

    let entries: Vec<ListEntry> = state
        .records
        .iter()
        .map(|record| {
            let id = record.id.clone();
            let is_active = active_id
                .as_ref()
                .map(|selected| selected == &id)
                .unwrap_or(false);

            ListEntry {
                id,
                is_active,
                timestamp: timestamp_label(record),
                level: level_label(record.nback),
                score: record.score,
                accuracy: format::format_percent(record.accuracy),
            }
        })
        .collect();

    rsx! {
        section { class: "results-card results-list",
            div { class: "results-card__header",
                h2 { "Recent sessions" }
                if !state.records.is_empty() {
                    span { class: "results-card__meta", "{state.records.len()} recorded" }
                }
            }

            if state.records.is_empty() {
                p { class: "results-card__placeholder",
                    "Completed sessions will appear here once a timed session runs out."
                }
            } else {
                ul { class: "results-list__items",
                    for entry in entries.into_iter() {
                        {render_list_entry(entry, selected_id)}
                    }
                }
            }
        }
    }
}

#[derive(Clone)]
struct ListEntry {
    id: String,
    is_active: bool,
    timestamp: String,
    level: String,
    score: i64,
    accuracy: String,
}

fn render_list_entry(entry: ListEntry, mut selected_id: Signal<Option<String>>) -> Element {
    let ListEntry {
        id,
        is_active,
        timestamp,
        level,
        score,
        accuracy,
    } = entry;

    let button_id = id.clone();

    rsx! {
        li { class: format!(
                "results-list__item {}",
                if is_active { "results-list__item--active" } else { "" }
            ),
            button {
                r#type: "button",
                class: "results-list__button",
                onclick: move |_| selected_id.set(Some(button_id.clone())),

                span { class: "results-list__heading",
                    span { class: "results-list__level", "{level}" }
                    span { class: "results-list__timestamp", "{timestamp}" }
                }

                div { class: "results-list__metrics",
                    span { class: "results-list__metric",
                        span { class: "results-list__metric-label", "Score" }
                        span { class: "results-list__metric-value", "{score}" }
                    }
                    span { class: "results-list__metric",
                        span { class: "results-list__metric-label", "Accuracy" }
                        span { class: "results-list__metric-value", "{accuracy}" }
                    }
                }
            }
        }
    }
}

/// Prefers the raw millisecond timestamp; falls back to the stored display
/// string when the timestamp is out of range.
fn timestamp_label(record: &SessionRecord) -> String {
    parse_timestamp(record)
        .map(|at| format!("{} · {}", format_date_badge(at), format_time_badge(at)))
        .unwrap_or_else(|| record.date.clone())
}
