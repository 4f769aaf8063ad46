//! Entries command: today's tasks with their time ranges.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use tl_core::{Entry, Journal};

use super::util::{format_duration, open_journal};
use crate::Config;

/// One row of the entries table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub duration: String,
    pub time_range: String,
    pub description: String,
}

impl EntryRow {
    fn new(entry: &Entry) -> Self {
        // The first entry of a day has no duration, so it starts where it ends.
        let start = entry.end_time - entry.duration;
        Self {
            duration: format_duration(entry.duration),
            time_range: format!(
                "{} - {}",
                start.format("%H:%M"),
                entry.end_time.format("%H:%M")
            ),
            description: entry.description.clone(),
        }
    }
}

/// Rows for the entries classified as today.
pub fn today_rows(journal: &Journal) -> Vec<EntryRow> {
    journal.today().map(EntryRow::new).collect()
}

pub fn run<W: Write>(writer: &mut W, config: &Config, now: DateTime<FixedOffset>) -> Result<()> {
    let journal = open_journal(&config.journal_path, now)?;
    let rows = today_rows(&journal);

    if rows.is_empty() {
        writeln!(writer, "No entries today.")?;
        return Ok(());
    }

    writeln!(writer, "{:<12}{:<15}Task", "Duration", "Time Range")?;
    for row in rows {
        writeln!(
            writer,
            "{:<12}{:<15}{}",
            row.duration, row.time_range, row.description
        )?;
    }
    Ok(())
}
