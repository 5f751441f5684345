use dioxus::prelude::*;

use crate::tasks::nback::TrainerView;

#[component]
pub fn Trainer() -> Element {
    rsx! {
        section { class: "page page-trainer",
            h1 { "Trainer" }
            p { "Respond with the left and right arrow keys or the buttons below the stage." }
            TrainerView {}
        }
    }
}
