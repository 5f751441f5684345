use dioxus::prelude::*;

use crate::{
    core::{format, storage::SessionRecord},
    results::level_label,
};

#[component]
pub fn ResultsDetailPanel(record: Option<SessionRecord>) -> Element {
    rsx! {
        section { class: "results-card results-detail",
            div { class: "results-card__header",
                h2 { "Details" }
            }

            match record {
                Some(record) => render_record(&record),
                None => rsx! {
                    p { class: "results-card__placeholder",
                        "Select a session to review its score and accuracy."
                    }
                },
            }
        }
    }
}

fn render_record(record: &SessionRecord) -> Element {
    let level = level_label(record.nback);
    let accuracy = format::format_percent(record.accuracy);

    rsx! {
        div { class: "results-detail__summary",
            h3 { "{level} session" }
            span { class: "results-detail__timestamp", "{record.date}" }
        }

        ul { class: "results-detail__grid",
            li {
                span { class: "results-detail__metric-label", "Score" }
                span { class: "results-detail__metric-value", "{record.score}" }
            }
            li {
                span { class: "results-detail__metric-label", "Accuracy" }
                span { class: "results-detail__metric-value", "{accuracy}" }
            }
            li {
                span { class: "results-detail__metric-label", "Level" }
                span { class: "results-detail__metric-value", "{level}" }
            }
        }
    }
}
