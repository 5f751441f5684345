use dioxus::prelude::*;
use once_cell::sync::OnceCell;

// Navbar stylesheet, also inlined for release native builds where the asset
// pipeline isn't available.
const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Platforms register a `NavBuilder` providing fully constructed `Link`
/// elements, so `ui` does not need to know each platform's `Route` enum.
/// Each closure receives the label and returns a link that contains it.
///
/// If no builder is registered, any raw `children` passed to `AppNavbar` are
/// rendered instead.
pub struct NavBuilder {
    pub home: fn(label: &str) -> Element,
    pub trainer: fn(label: &str) -> Element,
    pub settings: fn(label: &str) -> Element,
    pub results: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let internal_nav: Option<VNode> = NAV_BUILDER.get().map(|b| {
        let home = (b.home)("Home");
        let trainer = (b.trainer)("Trainer");
        let settings = (b.settings)("Settings");
        let results = (b.results)("Results");

        rsx! {
            nav { class: "navbar__links",
                {home}
                {trainer}
                {settings}
                {results}
            }
        }
        .expect("AppNavbar: rsx render failed")
    });

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header {
            id: "navbar",
            class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Vantage" }
                    }
                    span { class: "navbar__brand-subtitle", "perspective n-back" }
                }

                if let Some(nav) = internal_nav {
                    {nav}
                } else {
                    nav { class: "navbar__links", {children} }
                }
            }
        }
    }
}
