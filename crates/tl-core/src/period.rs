//! Calendar classification of timestamps against a reference instant.

use chrono::{DateTime, Datelike, FixedOffset};

/// Which reporting periods a timestamp falls into.
///
/// `today` implies `current_month`. Nothing matches across a year boundary,
/// even when week or month numbers coincide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub today: bool,
    pub current_week: bool,
    pub current_month: bool,
}

/// Classifies `timestamp` relative to `now`.
///
/// Each side is read in its own UTC offset, so the calendar date of a ledger
/// line is the date written on it.
pub fn classify(timestamp: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Classification {
    if timestamp.year() != now.year() {
        return Classification::default();
    }

    let current_week = timestamp.iso_week().week() == now.iso_week().week();
    let current_month = timestamp.month() == now.month();
    let today = current_month && timestamp.day() == now.day();

    Classification {
        today,
        current_week,
        current_month,
    }
}
