use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Home, Results, Settings, Trainer};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/train")]
    Trainer {},
    #[route("/settings")]
    Settings {},
    #[route("/results")]
    Results {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const THEME_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_trainer(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Trainer {},
        "{label}"
    })
}
fn nav_settings(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Settings {},
        "{label}"
    })
}
fn nav_results(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Results {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        trainer: nav_trainer,
        settings: nav_settings,
        results: nav_results,
    });

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Style { "{THEME_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// A web-specific router layout around the shared navbar, so the shared crate
/// never needs to know this crate's `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar {}
        Outlet::<Route> {}
    }
}
