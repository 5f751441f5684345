use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    rsx! {
        section { class: "page page-home",
            h1 { "Vantage" }
            p { "Working-memory training with a perspective twist." }
            p {
                "Each trial shows a colored shape. Decide whether the trained attribute "
                "matches what appeared n trials ago — sometimes as seen through someone "
                "else's eyes."
            }

            ul { class: "page-home__features",
                li { "Classic n-back over color, shape, size, and position" }
                li { "Symbolic and spatial perspective-taking modes" }
                li { "Scores and history stay on this device" }
            }
            p { class: "page-home__cta",
                "Head to the trainer to start a session, or tune the rules in settings."
            }
        }
    }
}
