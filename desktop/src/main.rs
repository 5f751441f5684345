#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Home, Results, Settings, Trainer};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Home {},
    #[route("/train")]
    Trainer {},
    #[route("/settings")]
    Settings {},
    #[route("/results")]
    Results {},
}

// Embedded shared theme (ui/assets/theme/main.css); no separate desktop
// /assets directory needed.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Vantage – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn nav_trainer(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Trainer {}, "{label}" })
}
fn nav_settings(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Settings {}, "{label}" })
}
fn nav_results(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Results {}, "{label}" })
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        trainer: nav_trainer,
        settings: nav_settings,
        results: nav_results,
    });

    // Runtime maximize fallback in case the initial builder flag is ignored
    // by the window manager.
    #[cfg(feature = "desktop")]
    {
        let win = dioxus::desktop::use_window();
        use_effect(move || {
            win.set_maximized(true);
        });
    }

    rsx! {
        // Always inline the embedded CSS; desktop builds carry no external
        // asset files.
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// A desktop-specific router layout around the shared navbar, so the shared
/// crate never needs to know this crate's `Route` enum.
#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar {}

        Outlet::<Route> {}
    }
}
