use dioxus::prelude::*;

use crate::results::{ResultsDetailPanel, ResultsHighlights, ResultsList, ResultsState};

#[component]
pub fn Results() -> Element {
    let results = use_signal(ResultsState::load);
    let selected_id = use_signal(|| Option::<String>::None);

    let state = results();
    let selected_record = selected_id().and_then(|id| {
        state
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    });

    rsx! {
        section { class: "page page-results",
            h1 { "Results" }
            p { "Review scores and accuracy from your recent timed sessions." }

            if let Some(err) = state.error.as_ref() {
                div { class: "results__error", "⚠️ {err}" }
            }

            div { class: "results__panels",
                ResultsList { results, selected_id }
                ResultsDetailPanel { record: selected_record }
            }

            ResultsHighlights { records: state.records.clone() }
        }
    }
}
