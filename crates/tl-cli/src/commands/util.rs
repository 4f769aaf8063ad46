//! Shared utilities for CLI commands.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, FixedOffset, Local};
use regex::Regex;
use tl_core::{Journal, JournalError, TIME_LAYOUT};

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Returns the reference time for a command: `--now` if given, else the clock.
pub fn resolve_now(arg: Option<&str>) -> anyhow::Result<DateTime<FixedOffset>> {
    let clock = Local::now().fixed_offset();
    match arg {
        Some(s) => parse_datetime(s, clock),
        None => Ok(clock),
    }
}

/// Parse a datetime string as ISO 8601, journal format, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00+05:30"
/// - Journal format: "2026-01-15 10:30 +0530"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(
    s: &str,
    clock: DateTime<FixedOffset>,
) -> anyhow::Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, TIME_LAYOUT) {
        return Ok(dt);
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00+05:30), \
             journal format (e.g., '2026-01-15 10:30 +0530') or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(clock - Duration::minutes(n * minutes_per_unit))
}

/// Loads the journal, carrying on with whatever was read before a bad line.
///
/// A journal that cannot be read at all is an error.
pub fn open_journal(path: &Path, now: DateTime<FixedOffset>) -> anyhow::Result<Journal> {
    match tl_core::load(path, now) {
        Ok(journal) => Ok(journal),
        Err(partial) => match partial.error {
            JournalError::Read { .. } if partial.journal.entries().is_empty() => {
                Err(partial.error).context("cannot open journal (run 'tl init' to create it)")
            }
            error => {
                let error = anyhow::Error::from(error);
                tracing::warn!(
                    error = %format!("{error:#}"),
                    entries = partial.journal.entries().len(),
                    "journal loaded partially"
                );
                Ok(partial.journal)
            }
        },
    }
}

/// Formats a duration as "X h Y min", truncated to whole minutes.
pub fn format_duration(duration: Duration) -> String {
    let (sign, minutes) = split_minutes(duration);
    format!("{sign}{} h {} min", minutes / 60, minutes % 60)
}

/// Formats a duration compactly as "XhYm", truncated to whole minutes.
pub fn format_stat_duration(duration: Duration) -> String {
    let (sign, minutes) = split_minutes(duration);
    format!("{sign}{}h{}m", minutes / 60, minutes % 60)
}

fn split_minutes(duration: Duration) -> (&'static str, i64) {
    let minutes = duration.num_minutes();
    if minutes < 0 {
        ("-", -minutes)
    } else {
        ("", minutes)
    }
}

/// Formats a time of day as "09h41m".
pub fn format_clock(time: DateTime<FixedOffset>) -> String {
    time.format("%Hh%Mm").to_string()
}
