//! Ledger entries and the line parser.
//!
//! A ledger line records the moment a task *ended*:
//!
//! ```text
//! 2025-10-17 13:30 +0530: Workin on ttimelog
//! ```
//!
//! Durations are never stored. They are derived from the previous entry while
//! parsing, and reset at every calendar date change so overnight gaps are
//! never counted.

use chrono::{DateTime, Duration, FixedOffset};
use thiserror::Error;

use crate::period::{Classification, classify};

/// Canonical timestamp layout of a ledger line, e.g. `2025-10-17 13:30 +0530`.
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M %z";

/// Marker that turns an entry into slack (non-work) time.
pub const SLACK_MARKER: &str = "**";

/// Descriptions that mark the first arrival of the day.
const ARRIVAL_MARKERS: [&str; 2] = ["**arrived", "arrived**"];

/// Errors produced while parsing a single ledger line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line does not contain a timestamp and a description.
    #[error("expected `YYYY-MM-DD HH:MM +HHMM: description`, got {line:?}")]
    MissingFields { line: String },

    /// The timestamp lacks one of its date, time or offset parts.
    #[error("incomplete timestamp {value:?}")]
    IncompleteTimestamp { value: String },

    /// The timestamp does not match the canonical layout.
    #[error("invalid timestamp {value:?}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One logged task boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// When the described task ended.
    pub end_time: DateTime<FixedOffset>,
    /// Free-form description, trimmed.
    pub description: String,
    /// Time attributed to this entry. Computed, never persisted.
    pub duration: Duration,
    /// Position of `end_time` relative to the reference instant.
    pub classification: Classification,
}

impl Entry {
    /// Creates an entry, classifying it against `now`.
    pub fn new(
        end_time: DateTime<FixedOffset>,
        description: impl Into<String>,
        duration: Duration,
        now: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            end_time,
            description: description.into(),
            duration,
            classification: classify(end_time, now),
        }
    }

    pub fn is_slack(&self) -> bool {
        is_slack(&self.description)
    }

    pub fn is_arrival(&self) -> bool {
        is_arrival_marker(&self.description)
    }

    /// Formats the entry as a ledger line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.end_time.format(TIME_LAYOUT), self.description)
    }
}

/// Returns true if the description denotes slack time.
pub fn is_slack(description: &str) -> bool {
    description.contains(SLACK_MARKER)
}

/// Returns true if the description is exactly an arrival marker.
pub fn is_arrival_marker(description: &str) -> bool {
    ARRIVAL_MARKERS.contains(&description)
}

/// Time elapsed between two boundaries, or zero if they fall on different dates.
///
/// Dates are compared in each timestamp's own offset, the way they read in
/// the ledger.
pub fn elapsed_same_day(
    previous: DateTime<FixedOffset>,
    current: DateTime<FixedOffset>,
) -> Duration {
    if previous.date_naive() == current.date_naive() {
        current - previous
    } else {
        Duration::zero()
    }
}

/// Parses one trimmed, non-blank ledger line.
///
/// Only the first two colons belong to the timestamp; everything after the
/// second colon is the description, which may contain colons of its own.
pub fn parse_line(
    line: &str,
    previous: Option<&Entry>,
    now: DateTime<FixedOffset>,
) -> Result<Entry, ParseError> {
    let mut fields = line.splitn(3, ':');
    let (Some(date_hour), Some(minute_offset), Some(description)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(ParseError::MissingFields {
            line: line.to_string(),
        });
    };

    let stamp = format!("{date_hour}:{minute_offset}");
    if stamp.split(' ').count() < 3 {
        return Err(ParseError::IncompleteTimestamp { value: stamp });
    }

    let end_time = DateTime::parse_from_str(&stamp, TIME_LAYOUT)
        .map_err(|source| ParseError::Timestamp {
            value: stamp.clone(),
            source,
        })?;

    let duration = previous.map_or_else(Duration::zero, |prev| {
        elapsed_same_day(prev.end_time, end_time)
    });

    Ok(Entry::new(end_time, description.trim_matches(' '), duration, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_str(s, TIME_LAYOUT).unwrap()
    }

    #[test]
    fn parses_canonical_line() {
        let now = at("2025-10-17 18:00 +0530");
        let entry = parse_line("2025-10-17 13:30 +0530: Workin on ttimelog", None, now).unwrap();

        assert_eq!(entry.end_time, at("2025-10-17 13:30 +0530"));
        assert_eq!(entry.description, "Workin on ttimelog");
        assert_eq!(entry.duration, Duration::zero());
        assert!(entry.classification.today);
    }

    #[test]
    fn description_keeps_its_colons() {
        let now = at("2025-10-17 18:00 +0530");
        let entry = parse_line(
            "2025-10-17 13:30 +0530: Project: Sub: write parser ",
            None,
            now,
        )
        .unwrap();

        assert_eq!(entry.description, "Project: Sub: write parser");
    }

    #[test]
    fn duration_is_gap_to_previous_on_same_date() {
        let now = at("2025-10-17 18:00 +0530");
        let first = parse_line("2025-10-17 09:41 +0530: **arrived", None, now).unwrap();
        let second = parse_line("2025-10-17 13:30 +0530: Task", Some(&first), now).unwrap();

        assert_eq!(second.duration, Duration::minutes(229));
    }

    #[test]
    fn duration_resets_across_dates() {
        let now = at("2025-10-17 18:00 +0530");
        let late = parse_line("2025-10-16 23:50 +0530: late", None, now).unwrap();
        let early = parse_line("2025-10-17 00:10 +0530: early", Some(&late), now).unwrap();

        assert_eq!(early.duration, Duration::zero());
    }

    #[test]
    fn rejects_line_without_description() {
        let now = at("2025-10-17 18:00 +0530");
        let err = parse_line("not-a-valid-line", None, now).unwrap_err();
        assert!(matches!(err, ParseError::MissingFields { .. }));

        let err = parse_line("2025-10-17 13:30 +0530", None, now).unwrap_err();
        assert!(matches!(err, ParseError::MissingFields { .. }));
    }

    #[test]
    fn rejects_timestamp_without_offset() {
        let now = at("2025-10-17 18:00 +0530");
        let err = parse_line("2025-10-17 13:30: task", None, now).unwrap_err();
        assert!(matches!(err, ParseError::IncompleteTimestamp { .. }));
    }

    #[test]
    fn rejects_unparsable_timestamp() {
        let now = at("2025-10-17 18:00 +0530");
        let err = parse_line("2025-13-17 13:30 +0530: task", None, now).unwrap_err();
        assert!(matches!(err, ParseError::Timestamp { .. }));
        assert!(err.to_string().contains("2025-13-17 13:30 +0530"));
    }

    #[test]
    fn slack_and_arrival_markers() {
        assert!(is_slack("lunch **"));
        assert!(is_slack("**arrived"));
        assert!(!is_slack("deep work"));

        assert!(is_arrival_marker("**arrived"));
        assert!(is_arrival_marker("arrived**"));
        assert!(!is_arrival_marker("**arrived late"));
        assert!(!is_arrival_marker("arrived"));
    }

    #[test]
    fn to_line_uses_canonical_layout() {
        let now = at("2025-10-17 18:00 +0530");
        let entry = Entry::new(at("2025-10-17 13:30 +0530"), "Task: one", Duration::zero(), now);
        assert_eq!(entry.to_line(), "2025-10-17 13:30 +0530: Task: one");
    }
}
