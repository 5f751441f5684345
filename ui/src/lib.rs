//! Shared UI crate for Vantage. Most cross-platform logic and views live here.

pub mod core;
pub mod results;
pub mod tasks;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
