//! Session summary aggregation and conversion to persisted records.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

use super::engine::SessionState;
use crate::core::storage::SessionRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub score: i64,
    pub trials: u32,
    pub mistakes: u32,
    /// Whole-session accuracy in percent; 0 when no trial occurred.
    pub accuracy: f64,
    /// n-back level as it was during play.
    pub level: u32,
}

impl SessionSummary {
    pub fn from_session(session: &SessionState) -> Self {
        let accuracy = if session.trials > 0 {
            (session.trials - session.mistakes) as f64 / session.trials as f64 * 100.0
        } else {
            0.0
        };
        Self {
            score: session.score,
            trials: session.trials,
            mistakes: session.mistakes,
            accuracy,
            level: session.level,
        }
    }

    pub fn to_record(&self, completed_at: OffsetDateTime) -> SessionRecord {
        let date = completed_at
            .format(&format_description!(
                "[year]-[month]-[day] · [hour]:[minute]"
            ))
            .unwrap_or_else(|_| "—".to_string());

        SessionRecord {
            id: Uuid::new_v4().to_string(),
            date,
            timestamp_ms: (completed_at.unix_timestamp_nanos() / 1_000_000) as i64,
            score: self.score,
            accuracy: self.accuracy,
            nback: self.level,
        }
    }
}
