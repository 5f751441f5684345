use crate::core::storage::SessionRecord;
use time::{macros::format_description, OffsetDateTime};

pub(crate) fn parse_timestamp(record: &SessionRecord) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(record.timestamp_ms) * 1_000_000).ok()
}

pub(crate) fn format_date_badge(date: OffsetDateTime) -> String {
    date.format(&format_description!(
        "[month repr:short] [day padding:none]"
    ))
    .unwrap_or_else(|_| "—".to_string())
}

pub(crate) fn format_time_badge(date: OffsetDateTime) -> String {
    date.format(&format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| "—".to_string())
}

pub(crate) fn level_label(nback: u32) -> String {
    format!("{nback}-back")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp_ms: i64) -> SessionRecord {
        SessionRecord {
            id: "r".into(),
            date: "2026-08-30 · 14:05".into(),
            timestamp_ms,
            score: 10,
            accuracy: 50.0,
            nback: 1,
        }
    }

    #[test]
    fn timestamp_round_trips_through_badges() {
        let at = parse_timestamp(&record(1_787_000_000_000)).expect("valid timestamp");
        assert_eq!(at.unix_timestamp(), 1_787_000_000);
        assert!(!format_date_badge(at).is_empty());
        assert_eq!(format_time_badge(at).len(), 5);
    }

    #[test]
    fn level_label_is_human_readable() {
        assert_eq!(level_label(3), "3-back");
    }
}
