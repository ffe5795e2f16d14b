//! Event rows for a Flux object

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::duration::time_ago;

/// One row of an events table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub event_type: String,
    pub reason: String,
    /// Reporting component (`source.component`)
    pub from: String,
    pub message: String,
    pub age: String,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Build rows from raw `Event` objects, newest first
pub fn event_rows(events: &[Value], now: DateTime<Utc>) -> Vec<EventRow> {
    let mut rows: Vec<EventRow> = events.iter().map(|event| event_row(event, now)).collect();
    // Events without any timestamp sink to the bottom
    rows.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    rows
}

fn event_row(event: &Value, now: DateTime<Utc>) -> EventRow {
    let text = |pointer: &str| {
        event
            .pointer(pointer)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let last_seen = timestamp(event, "/lastTimestamp")
        .or_else(|| timestamp(event, "/eventTime"))
        .or_else(|| timestamp(event, "/metadata/creationTimestamp"));
    let first_seen = timestamp(event, "/firstTimestamp").or(last_seen);
    let count = event.get("count").and_then(|c| c.as_u64()).unwrap_or(1);

    let age = match last_seen {
        Some(last) => {
            let ago = time_ago(last, now);
            match first_seen {
                Some(first) if count > 1 => {
                    format!("{} ({} times over {})", ago, count, time_ago(first, now))
                }
                _ => ago,
            }
        }
        None => "-".to_string(),
    };

    EventRow {
        event_type: text("/type"),
        reason: text("/reason"),
        from: text("/source/component"),
        message: text("/message"),
        age,
        last_seen,
    }
}

fn timestamp(event: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    event
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
}
