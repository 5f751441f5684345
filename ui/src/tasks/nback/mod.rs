//! Perspective n-back trainer: configuration, stimulus generation,
//! perspective transform, the trial state machine, and the interactive view.

pub mod config;
pub mod engine;
pub mod metrics;
pub mod perspective;
pub mod stimulus;
pub mod view;

pub use config::TrainerConfig;
pub use engine::NBackEngine;
pub use metrics::SessionSummary;
pub use view::TrainerView;
