mod home;
pub use home::Home;

mod trainer;
pub use trainer::Trainer;

mod settings;
pub use settings::Settings;

mod results;
pub use results::Results;
