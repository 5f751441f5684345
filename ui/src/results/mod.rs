mod list;
pub use list::ResultsList;

mod detail;
pub use detail::ResultsDetailPanel;

mod charts;
pub use charts::ResultsHighlights;

mod utils;
pub(crate) use utils::*;

use crate::core::storage::{self, SessionRecord};

/// Shared state for the results view aggregating stored sessions or load errors.
#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    pub records: Vec<SessionRecord>,
    pub error: Option<String>,
}

impl ResultsState {
    pub fn load() -> Self {
        match storage::load_sessions() {
            Ok(mut records) => {
                records.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
                Self {
                    records,
                    error: None,
                }
            }
            Err(err) => Self {
                records: Vec::new(),
                error: Some(format!("Couldn't load sessions: {err}")),
            },
        }
    }
}
