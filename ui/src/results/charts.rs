use dioxus::prelude::*;

use crate::{
    core::{format, storage::SessionRecord},
    results::level_label,
};

#[component]
pub fn ResultsHighlights(records: Vec<SessionRecord>) -> Element {
    let total_sessions = records.len();
    let latest_meta = records
        .first()
        .map(|record| record.date.clone())
        .unwrap_or_default();

    let best_score = records.iter().map(|record| record.score).max();
    let accuracies: Vec<f64> = records
        .iter()
        .map(|record| record.accuracy)
        .filter(|accuracy| accuracy.is_finite())
        .collect();
    let mean_accuracy = average(&accuracies);
    let latest_level = records.first().map(|record| level_label(record.nback));

    let best_score_label = best_score
        .map(|score| score.to_string())
        .unwrap_or_else(|| "—".to_string());
    let latest_level_label = latest_level.unwrap_or_else(|| "—".to_string());

    let accuracy_meta = if accuracies.is_empty() {
        "Complete a timed session"
    } else {
        "Mean across all sessions"
    };

    rsx! {
        section { class: "results-card results-charts",
            div { class: "results-card__header",
                h2 { "Highlights" }
                if total_sessions > 0 {
                    span { class: "results-card__meta", "Latest session {latest_meta}" }
                }
            }

            if total_sessions == 0 {
                p { class: "results-card__placeholder", "Once you complete sessions, quick stats show up here." }
            } else {
                div { class: "results-highlights",
                    div { class: "results-highlight",
                        span { class: "results-highlight__label", "Total sessions" }
                        strong { class: "results-highlight__value", "{total_sessions}" }
                        span { class: "results-highlight__meta", "Recorded on this device" }
                    }
                    div { class: "results-highlight",
                        span { class: "results-highlight__label", "Best score" }
                        strong { class: "results-highlight__value", "{best_score_label}" }
                        span { class: "results-highlight__meta", "Highest single session" }
                    }
                    div { class: "results-highlight",
                        span { class: "results-highlight__label", "Accuracy" }
                        strong { class: "results-highlight__value", "{format::format_percent(mean_accuracy)}" }
                        span { class: "results-highlight__meta", "{accuracy_meta}" }
                    }
                    div { class: "results-highlight",
                        span { class: "results-highlight__label", "Latest level" }
                        strong { class: "results-highlight__value", "{latest_level_label}" }
                        span { class: "results-highlight__meta", "From the most recent session" }
                    }
                }
            }
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().copied().sum::<f64>() / values.len() as f64
    }
}
